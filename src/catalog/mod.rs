//! Control Catalog
//!
//! The catalog is the static configuration of the pose engine: an ordered
//! list of [`ControlDefinition`]s plus the display order of their groups.
//! It is an immutable value, validated once and then shared (usually via
//! `Arc`) by every engine instance that poses a model.
//!
//! Catalogs can be built in code or loaded from JSON:
//!
//! ```rust,ignore
//! let catalog = ControlCatalog::from_json_str(r#"{
//!     "group_order": ["Head"],
//!     "controls": [{
//!         "id": "headPitch", "label": "Head Pitch", "group": "Head",
//!         "binding": {
//!             "kind": "joint", "axis": [1.0, 0.0, 0.0], "keywords": ["head"],
//!             "range": { "min": -0.7, "max": 0.7, "step": 0.01 }
//!         }
//!     }]
//! }"#)?;
//! ```

pub mod creature;
pub mod definition;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, RigPoseError};

pub use definition::{
    BindingSpec, ControlDefinition, ControlKind, JointSpec, MorphSpec, Side, ValueRange,
};

/// Validated, ordered set of control definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlCatalog {
    #[serde(default)]
    group_order: Vec<String>,
    controls: Vec<ControlDefinition>,
}

impl ControlCatalog {
    /// Validates `controls` and builds a catalog.
    ///
    /// Joint axes are normalized. Groups missing from `group_order` are
    /// accepted and sort after every known group.
    pub fn new(controls: Vec<ControlDefinition>, group_order: Vec<String>) -> Result<Self> {
        let mut controls = controls;
        for def in &mut controls {
            validate_definition(def)?;
        }

        let mut ids: FxHashSet<&str> = FxHashSet::default();
        for def in &controls {
            if !ids.insert(def.id.as_str()) {
                return Err(RigPoseError::DuplicateControlId(def.id.clone()));
            }
        }

        let catalog = Self {
            group_order,
            controls,
        };
        catalog.warn_unknown_groups();
        Ok(catalog)
    }

    /// Parses and validates a JSON catalog.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: ControlCatalog = serde_json::from_str(json)?;
        Self::new(raw.controls, raw.group_order)
    }

    /// Built-in catalog for creature and character rigs.
    #[must_use]
    pub fn creature() -> Self {
        creature::creature_catalog()
    }

    /// Definitions in catalog (binding) order.
    #[inline]
    #[must_use]
    pub fn definitions(&self) -> &[ControlDefinition] {
        &self.controls
    }

    #[inline]
    #[must_use]
    pub fn group_order(&self) -> &[String] {
        &self.group_order
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ControlDefinition> {
        self.controls.iter().find(|def| def.id == id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Display rank of a group; unknown groups rank after all known ones.
    #[must_use]
    pub fn group_rank(&self, group: &str) -> usize {
        self.group_order
            .iter()
            .position(|g| g == group)
            .unwrap_or(self.group_order.len())
    }

    fn warn_unknown_groups(&self) {
        let mut reported: FxHashSet<&str> = FxHashSet::default();
        for def in &self.controls {
            let known = self.group_order.iter().any(|g| *g == def.group);
            if !known && reported.insert(def.group.as_str()) {
                log::warn!(
                    "Control group '{}' is not in the group order; its controls sort last",
                    def.group
                );
            }
        }
    }
}

impl Default for ControlCatalog {
    fn default() -> Self {
        Self::creature()
    }
}

fn validate_definition(def: &mut ControlDefinition) -> Result<()> {
    if def.id.is_empty() {
        return Err(RigPoseError::EmptyControlId(def.label.clone()));
    }

    validate_range(&def.id, def.range())?;

    if let BindingSpec::Joint(spec) = &mut def.binding {
        if spec.keywords.is_empty() {
            return Err(RigPoseError::EmptyJointKeywords(def.id.clone()));
        }
        spec.axis = spec
            .axis
            .try_normalize()
            .ok_or_else(|| RigPoseError::ZeroAxis(def.id.clone()))?;
    }

    Ok(())
}

fn validate_range(id: &str, range: &ValueRange) -> Result<()> {
    let invalid = |reason| RigPoseError::InvalidRange {
        id: id.to_string(),
        reason,
    };

    if !range.min.is_finite() || !range.max.is_finite() {
        return Err(invalid("bounds must be finite"));
    }
    if range.min > range.max {
        return Err(invalid("min is greater than max"));
    }
    if range.step.is_nan() || range.step <= 0.0 {
        return Err(invalid("step must be positive"));
    }
    if !(range.min..=range.max).contains(&range.default) {
        return Err(invalid("default lies outside [min, max]"));
    }
    Ok(())
}
