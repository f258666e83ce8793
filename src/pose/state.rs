use glam::{Quat, Vec3};
use serde::Serialize;
use smallvec::SmallVec;

use crate::catalog::{ControlDefinition, ControlKind, ValueRange};

/// Concrete target a bound control drives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BindingTarget<H> {
    /// Morph target weight slot `slot` on `mesh`.
    Morph { mesh: H, slot: usize },
    /// Rotation of `joint` about the normalized local `axis`.
    Joint { joint: H, axis: Vec3 },
}

/// A catalog definition resolved against a specific model.
#[derive(Debug, Clone)]
pub struct BoundControl<H> {
    pub definition: ControlDefinition,
    pub target: BindingTarget<H>,
    /// Current value, always within the definition's range.
    pub value: f32,
}

impl<H> BoundControl<H> {
    #[must_use]
    pub fn new(definition: ControlDefinition, target: BindingTarget<H>) -> Self {
        let value = definition.range().default;
        Self {
            definition,
            target,
            value,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.definition.id
    }

    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.definition.label
    }

    #[inline]
    #[must_use]
    pub fn group(&self) -> &str {
        &self.definition.group
    }

    #[inline]
    #[must_use]
    pub fn range(&self) -> &ValueRange {
        self.definition.range()
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ControlKind {
        self.definition.kind()
    }

    /// Slider metadata for the HUD.
    #[must_use]
    pub fn info(&self) -> ControlInfo {
        let range = self.range();
        ControlInfo {
            id: self.definition.id.clone(),
            label: self.definition.label.clone(),
            group: self.definition.group.clone(),
            kind: self.kind(),
            min: range.min,
            max: range.max,
            step: range.step,
            default: range.default,
        }
    }
}

/// Display metadata of a bound control, without its current value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlInfo {
    pub id: String,
    pub label: String,
    pub group: String,
    pub kind: ControlKind,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

/// All controls bound to one joint, plus the orientations they layer onto.
#[derive(Debug, Clone)]
pub struct JointBindingGroup<H> {
    pub joint: H,
    /// Indices into the bound control list, in catalog order.
    pub controls: SmallVec<[usize; 4]>,
    /// Captured once at bind time.
    pub rest_orientation: Quat,
    /// Orientation before this pass's offsets; `None` until the first pass.
    pub base_orientation: Option<Quat>,
    /// Last orientation the engine wrote to the joint.
    pub(crate) applied_orientation: Option<Quat>,
}

impl<H> JointBindingGroup<H> {
    #[must_use]
    pub fn new(joint: H, rest_orientation: Quat) -> Self {
        Self {
            joint,
            controls: SmallVec::new(),
            rest_orientation,
            base_orientation: None,
            applied_orientation: None,
        }
    }

    /// Orientation the joint returns to at the start of a frame.
    #[inline]
    #[must_use]
    pub fn frame_orientation(&self) -> Quat {
        self.base_orientation.unwrap_or(self.rest_orientation)
    }
}

/// One entry of a value snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlValue {
    pub id: String,
    pub label: String,
    pub value: f32,
}

/// Snapshot of every bound control's value, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PoseValues {
    entries: Vec<ControlValue>,
}

impl PoseValues {
    pub(crate) fn new(entries: Vec<ControlValue>) -> Self {
        Self { entries }
    }

    /// Value of the control with `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<f32> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.value)
    }

    /// Value of the control labelled `label`.
    #[must_use]
    pub fn get_by_label(&self, label: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControlValue> {
        self.entries.iter()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a PoseValues {
    type Item = &'a ControlValue;
    type IntoIter = std::slice::Iter<'a, ControlValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
