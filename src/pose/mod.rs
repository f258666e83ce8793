//! Pose Control
//!
//! Binds a [`ControlCatalog`](crate::catalog::ControlCatalog) to a scanned
//! rig and keeps the model in sync with slider values:
//!
//! - [`binder`]: pure matching of definitions against the rig inventory
//! - [`state`]: bound controls, joint binding groups and value snapshots
//! - [`controller`]: [`PoseController`], lifecycle, mutation and the
//!   per-joint recomposition pass

pub mod binder;
pub mod controller;
pub mod state;

pub use binder::{ControlBinder, match_joint, match_morph_target, matches_side};
pub use controller::{PoseController, VALUE_EPSILON};
pub use state::{
    BindingTarget, BoundControl, ControlInfo, ControlValue, JointBindingGroup, PoseValues,
};
