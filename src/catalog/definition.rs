use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Numeric slider range of a control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    #[serde(default)]
    pub default: f32,
}

impl ValueRange {
    #[must_use]
    pub const fn new(min: f32, max: f32, step: f32, default: f32) -> Self {
        Self {
            min,
            max,
            step,
            default,
        }
    }

    /// Symmetric range around a neutral default of zero.
    #[must_use]
    pub const fn symmetric(limit: f32, step: f32) -> Self {
        Self::new(-limit, limit, step, 0.0)
    }

    /// Clamps `raw` into `[min, max]`. `NaN` maps to `min`.
    #[inline]
    #[must_use]
    pub fn clamp(&self, raw: f32) -> f32 {
        if raw.is_nan() {
            self.min
        } else {
            raw.max(self.min).min(self.max)
        }
    }
}

/// Which side of a bilateral rig a joint control is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Full word and single-letter token used in joint names.
    #[inline]
    #[must_use]
    pub const fn tokens(self) -> (&'static str, &'static str) {
        match self {
            Side::Left => ("left", "l"),
            Side::Right => ("right", "r"),
        }
    }

    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Drives one morph target weight slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphSpec {
    /// Substrings searched in target names. Empty matches every target.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Subset of keywords that wins when any candidate contains one.
    #[serde(default)]
    pub preferred: Vec<String>,
    pub range: ValueRange,
}

impl MorphSpec {
    #[must_use]
    pub fn new(keywords: &[&str], range: ValueRange) -> Self {
        Self {
            keywords: to_owned_list(keywords),
            preferred: Vec::new(),
            range,
        }
    }

    #[must_use]
    pub fn with_preferred(mut self, preferred: &[&str]) -> Self {
        self.preferred = to_owned_list(preferred);
        self
    }
}

/// Rotates one joint about a fixed local axis; the value is in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSpec {
    pub axis: Vec3,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub preferred: Vec<String>,
    #[serde(default)]
    pub side: Option<Side>,
    pub range: ValueRange,
}

impl JointSpec {
    #[must_use]
    pub fn new(axis: Vec3, keywords: &[&str], range: ValueRange) -> Self {
        Self {
            axis,
            keywords: to_owned_list(keywords),
            preferred: Vec::new(),
            side: None,
            range,
        }
    }

    #[must_use]
    pub fn with_preferred(mut self, preferred: &[&str]) -> Self {
        self.preferred = to_owned_list(preferred);
        self
    }

    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }
}

/// How a definition finds its target. A definition carries exactly one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindingSpec {
    Morph(MorphSpec),
    Joint(JointSpec),
}

/// Kind of target a control drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Morph,
    Joint,
}

/// One semantic pose slider and the rules used to find its target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlDefinition {
    pub id: String,
    pub label: String,
    pub group: String,
    /// Tie-break within the group.
    #[serde(default)]
    pub order: i32,
    pub binding: BindingSpec,
}

impl ControlDefinition {
    #[must_use]
    pub fn joint(id: &str, label: &str, group: &str, order: i32, spec: JointSpec) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            group: group.to_string(),
            order,
            binding: BindingSpec::Joint(spec),
        }
    }

    #[must_use]
    pub fn morph(id: &str, label: &str, group: &str, order: i32, spec: MorphSpec) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            group: group.to_string(),
            order,
            binding: BindingSpec::Morph(spec),
        }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ControlKind {
        match self.binding {
            BindingSpec::Morph(_) => ControlKind::Morph,
            BindingSpec::Joint(_) => ControlKind::Joint,
        }
    }

    #[inline]
    #[must_use]
    pub fn range(&self) -> &ValueRange {
        match &self.binding {
            BindingSpec::Morph(spec) => &spec.range,
            BindingSpec::Joint(spec) => &spec.range,
        }
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
