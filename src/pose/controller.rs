use std::hash::Hash;
use std::sync::Arc;

use glam::Quat;
use rustc_hash::FxHashMap;

use crate::catalog::ControlCatalog;
use crate::pose::binder::ControlBinder;
use crate::pose::state::{
    BindingTarget, BoundControl, ControlInfo, ControlValue, JointBindingGroup, PoseValues,
};
use crate::rig::{RigInventory, RigModel, RigScanner};

/// Values closer than this count as unchanged / neutral.
pub const VALUE_EPSILON: f32 = 1e-4;

/// Tolerance when checking whether a joint still holds what we wrote.
const ORIENTATION_EPSILON: f32 = 1e-6;

/// Everything derived from one bound model.
#[derive(Debug)]
struct BoundRig<H> {
    root: H,
    inventory: RigInventory<H>,
    /// Catalog order.
    controls: Vec<BoundControl<H>>,
    /// Indices into `controls`, in display order.
    display_order: Vec<usize>,
    by_id: FxHashMap<String, usize>,
    joint_groups: Vec<JointBindingGroup<H>>,
}

/// Pose-control engine for one model.
///
/// Lifecycle: [`new`](Self::new) yields an unbound controller,
/// [`bind`](Self::bind) scans a model and binds the catalog, and
/// [`dispose`](Self::dispose) forgets the model again. Binding a new model
/// replaces the previous rig state.
///
/// The controller never owns the model. Every call that touches it takes
/// the model by reference, so the embedding renderer keeps full ownership
/// between calls.
///
/// # Frame protocol
///
/// ```rust,ignore
/// // UI events
/// controller.set_value(&mut scene, "headPitch", 0.3);
/// controller.apply_pose_adjustments(&mut scene);
///
/// // Each tick, before procedural motion and rendering
/// controller.prepare_frame(&mut scene);
/// ```
#[derive(Debug)]
pub struct PoseController<H> {
    catalog: Arc<ControlCatalog>,
    rig: Option<BoundRig<H>>,
}

impl<H: Copy + Eq + Hash + std::fmt::Debug> PoseController<H> {
    /// Creates an unbound controller.
    #[must_use]
    pub fn new(catalog: Arc<ControlCatalog>) -> Self {
        Self { catalog, rig: None }
    }

    /// Creates a controller and binds it to `root` of `model`.
    pub fn with_model<M: RigModel<Handle = H>>(
        catalog: Arc<ControlCatalog>,
        model: &mut M,
        root: H,
    ) -> Self {
        let mut controller = Self::new(catalog);
        controller.bind(model, root);
        controller
    }

    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &Arc<ControlCatalog> {
        &self.catalog
    }

    #[inline]
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.rig.is_some()
    }

    /// Root of the bound model.
    #[must_use]
    pub fn root(&self) -> Option<H> {
        self.rig.as_ref().map(|rig| rig.root)
    }

    /// Scan result of the bound model.
    #[must_use]
    pub fn inventory(&self) -> Option<&RigInventory<H>> {
        self.rig.as_ref().map(|rig| &rig.inventory)
    }

    /// Per-joint binding groups, in first-bound order.
    #[must_use]
    pub fn joint_groups(&self) -> &[JointBindingGroup<H>] {
        self.rig
            .as_ref()
            .map(|rig| rig.joint_groups.as_slice())
            .unwrap_or_default()
    }

    // ========================================================================
    // Binding
    // ========================================================================

    /// Scans `model` under `root`, binds the catalog and applies the default
    /// pose. Returns the number of bound controls.
    ///
    /// A model without poseable joints or targets binds successfully with
    /// zero controls.
    pub fn bind<M: RigModel<Handle = H>>(&mut self, model: &mut M, root: H) -> usize {
        if let Some(previous) = self.rig.take() {
            log::debug!("Rebinding pose controller");
            // Rest orientations are captured on first bind only; put the
            // same model back to rest before it is captured again.
            if previous.root == root {
                for group in &previous.joint_groups {
                    model.set_joint_rotation(group.joint, group.rest_orientation);
                    model.mark_world_dirty(group.joint);
                }
            }
        }

        let inventory = RigScanner::scan(model, root);
        if inventory.is_empty() {
            log::debug!("Model has no poseable joints or morph targets");
        }
        let controls = ControlBinder::bind(&self.catalog, &inventory);
        let joint_groups = build_joint_groups(model, &controls);
        let display_order = display_order(&self.catalog, &controls);
        let by_id = controls
            .iter()
            .enumerate()
            .map(|(index, control)| (control.id().to_string(), index))
            .collect();

        log::debug!(
            "Bound {} of {} controls ({} joints driven)",
            controls.len(),
            self.catalog.len(),
            joint_groups.len()
        );

        let count = controls.len();
        self.rig = Some(BoundRig {
            root,
            inventory,
            controls,
            display_order,
            by_id,
            joint_groups,
        });

        self.write_morph_values(model);
        self.apply_pose_adjustments(model);
        count
    }

    /// Releases all bindings. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.rig.take().is_some() {
            log::debug!("Pose controller disposed");
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Slider metadata for every bound control, in display order.
    #[must_use]
    pub fn controls(&self) -> Vec<ControlInfo> {
        self.iter_display().map(BoundControl::info).collect()
    }

    /// Slider metadata bucketed by group, groups in display order.
    #[must_use]
    pub fn controls_by_group(&self) -> Vec<(String, Vec<ControlInfo>)> {
        let mut groups: Vec<(String, Vec<ControlInfo>)> = Vec::new();
        for control in self.iter_display() {
            match groups.last_mut() {
                Some((group, infos)) if group.as_str() == control.group() => {
                    infos.push(control.info());
                }
                _ => groups.push((control.group().to_string(), vec![control.info()])),
            }
        }
        groups
    }

    /// Snapshot of all current values, in display order.
    #[must_use]
    pub fn values(&self) -> PoseValues {
        PoseValues::new(
            self.iter_display()
                .map(|control| ControlValue {
                    id: control.id().to_string(),
                    label: control.label().to_string(),
                    value: control.value,
                })
                .collect(),
        )
    }

    /// Current value of one control.
    #[must_use]
    pub fn value(&self, id: &str) -> Option<f32> {
        self.control(id).map(|control| control.value)
    }

    /// Target a control was bound to.
    #[must_use]
    pub fn binding_of(&self, id: &str) -> Option<BindingTarget<H>> {
        self.control(id).map(|control| control.target)
    }

    fn control(&self, id: &str) -> Option<&BoundControl<H>> {
        let rig = self.rig.as_ref()?;
        rig.by_id.get(id).map(|&index| &rig.controls[index])
    }

    fn iter_display(&self) -> impl Iterator<Item = &BoundControl<H>> {
        self.rig.iter().flat_map(|rig| {
            rig.display_order
                .iter()
                .map(move |&index| &rig.controls[index])
        })
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Clamps and stores a control value.
    ///
    /// Morph targets are written immediately; joint controls take effect on
    /// the next [`apply_pose_adjustments`](Self::apply_pose_adjustments).
    /// Returns the stored value, or `None` when the id is unknown or the
    /// value did not change.
    pub fn set_value<M: RigModel<Handle = H>>(
        &mut self,
        model: &mut M,
        id: &str,
        raw: f32,
    ) -> Option<f32> {
        let rig = self.rig.as_mut()?;
        let &index = rig.by_id.get(id)?;
        let control = &mut rig.controls[index];

        let value = control.range().clamp(raw);
        if (value - control.value).abs() <= VALUE_EPSILON {
            return None;
        }
        control.value = value;

        if let BindingTarget::Morph { mesh, slot } = control.target {
            model.set_morph_weight(mesh, slot, value);
        }

        Some(value)
    }

    /// [`set_value`](Self::set_value) for raw slider text. Text that does not
    /// parse as a number stores the control's minimum.
    pub fn set_value_text<M: RigModel<Handle = H>>(
        &mut self,
        model: &mut M,
        id: &str,
        raw: &str,
    ) -> Option<f32> {
        let value = raw.trim().parse::<f32>().unwrap_or(f32::NAN);
        self.set_value(model, id, value)
    }

    // ========================================================================
    // Pose application
    // ========================================================================

    /// Returns every driven joint to its base orientation (rest orientation
    /// before the first pass). Call once per tick before procedural motion.
    pub fn prepare_frame<M: RigModel<Handle = H>>(&mut self, model: &mut M) {
        let Some(rig) = self.rig.as_ref() else {
            return;
        };

        for group in &rig.joint_groups {
            model.set_joint_rotation(group.joint, group.frame_orientation());
            model.mark_world_dirty(group.joint);
        }
    }

    /// Recomposes every driven joint from its base orientation.
    ///
    /// The base is recaptured from the live joint unless the joint still
    /// holds the orientation this controller last wrote, so redundant calls
    /// never stack offsets. Controls sharing a joint compose in catalog
    /// order: `base * R(a) * R(b) * ...`.
    pub fn apply_pose_adjustments<M: RigModel<Handle = H>>(&mut self, model: &mut M) {
        let Some(rig) = self.rig.as_mut() else {
            return;
        };
        let BoundRig {
            controls,
            joint_groups,
            ..
        } = rig;

        for group in joint_groups.iter_mut() {
            let Some(live) = model.joint_rotation(group.joint) else {
                continue;
            };

            let base = match (group.applied_orientation, group.base_orientation) {
                (Some(applied), Some(base)) if applied.abs_diff_eq(live, ORIENTATION_EPSILON) => {
                    base
                }
                _ => live,
            };
            group.base_orientation = Some(base);

            let mut rotation = base;
            for &index in &group.controls {
                let control = &controls[index];
                let BindingTarget::Joint { axis, .. } = control.target else {
                    continue;
                };
                if control.value.abs() > VALUE_EPSILON {
                    rotation *= Quat::from_axis_angle(axis, control.value);
                }
            }
            let rotation = rotation.normalize();

            model.set_joint_rotation(group.joint, rotation);
            model.mark_world_dirty(group.joint);
            group.applied_orientation = Some(rotation);
        }

        log::trace!("Applied pose to {} joints", joint_groups.len());
    }

    /// Restores rest orientations and default values, then reapplies the
    /// default pose. Returns the resulting values.
    pub fn reset_pose<M: RigModel<Handle = H>>(&mut self, model: &mut M) -> PoseValues {
        let Some(rig) = self.rig.as_mut() else {
            return PoseValues::default();
        };

        for group in &mut rig.joint_groups {
            model.set_joint_rotation(group.joint, group.rest_orientation);
            model.mark_world_dirty(group.joint);
            group.base_orientation = None;
            group.applied_orientation = None;
        }
        for control in &mut rig.controls {
            control.value = control.range().default;
        }

        self.write_morph_values(model);
        self.apply_pose_adjustments(model);
        self.values()
    }

    fn write_morph_values<M: RigModel<Handle = H>>(&self, model: &mut M) {
        let Some(rig) = self.rig.as_ref() else {
            return;
        };

        for control in &rig.controls {
            if let BindingTarget::Morph { mesh, slot } = control.target {
                model.set_morph_weight(mesh, slot, control.value);
            }
        }
    }
}

/// Groups joint controls by joint, in first-encountered order, capturing
/// each joint's rest orientation.
fn build_joint_groups<H, M>(model: &M, controls: &[BoundControl<H>]) -> Vec<JointBindingGroup<H>>
where
    H: Copy + Eq + Hash,
    M: RigModel<Handle = H>,
{
    let mut groups: Vec<JointBindingGroup<H>> = Vec::new();
    let mut slots: FxHashMap<H, usize> = FxHashMap::default();

    for (index, control) in controls.iter().enumerate() {
        let BindingTarget::Joint { joint, .. } = control.target else {
            continue;
        };
        let slot = *slots.entry(joint).or_insert_with(|| {
            let rest = model.joint_rotation(joint).unwrap_or(Quat::IDENTITY);
            groups.push(JointBindingGroup::new(joint, rest));
            groups.len() - 1
        });
        groups[slot].controls.push(index);
    }

    groups
}

/// Display order: group rank, then `order`, then label.
fn display_order<H>(catalog: &ControlCatalog, controls: &[BoundControl<H>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..controls.len()).collect();
    order.sort_by(|&a, &b| {
        let (a, b) = (&controls[a], &controls[b]);
        catalog
            .group_rank(a.group())
            .cmp(&catalog.group_rank(b.group()))
            .then_with(|| a.definition.order.cmp(&b.definition.order))
            .then_with(|| a.label().cmp(b.label()))
    });
    order
}
