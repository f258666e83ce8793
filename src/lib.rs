#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Rig introspection and pose control for skinned models.
//!
//! A [`PoseController`] scans a loaded model for joints and morph targets,
//! binds the semantic sliders of a [`ControlCatalog`] to them by name, and
//! keeps the model posed as slider values change.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rigpose::{ControlCatalog, PoseController};
//!
//! let catalog = Arc::new(ControlCatalog::creature());
//! let mut pose = PoseController::with_model(catalog, &mut scene, model_root);
//!
//! for control in pose.controls() {
//!     println!("{} [{}..{}]", control.label, control.min, control.max);
//! }
//!
//! pose.set_value(&mut scene, "headPitch", 0.4);
//! pose.apply_pose_adjustments(&mut scene);
//! ```

pub mod catalog;
pub mod errors;
pub mod pose;
pub mod rig;
pub mod scene;

pub use catalog::{
    BindingSpec, ControlCatalog, ControlDefinition, ControlKind, JointSpec, MorphSpec, Side,
    ValueRange,
};
pub use errors::{Result, RigPoseError};
pub use pose::{BindingTarget, ControlInfo, PoseController, PoseValues};
pub use rig::{RigInventory, RigModel, RigScanner};
pub use scene::{MorphTargets, Node, NodeHandle, Scene, Skeleton};
