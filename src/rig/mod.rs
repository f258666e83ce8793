//! Rig Capability Interface
//!
//! The pose engine never sees a concrete scene or renderer type. Everything
//! it needs from a loaded model goes through [`RigModel`]:
//!
//! - list the children of a node (for traversal)
//! - read a node's name, parent link and joint flag
//! - list the joints referenced by a skinned mesh
//! - list, read and write named morph target weight slots
//! - read and write a joint's local rotation
//!
//! [`crate::scene::Scene`] is the in-crate implementation; an embedding
//! renderer implements the trait for its own object model.

pub mod scanner;

use std::fmt::Debug;
use std::hash::Hash;

use glam::Quat;

pub use scanner::{JointEntry, MorphTargetEntry, RigInventory, RigScanner};

/// Narrow view of a loaded skinned model.
///
/// Handles are plain copyable ids; the engine stores them but never owns
/// the model. A handle that no longer resolves must make reads return
/// `None` (or an empty list) and writes do nothing.
pub trait RigModel {
    /// Identifies any node of the model (meshes and joints alike).
    type Handle: Copy + Eq + Hash + Debug;

    /// Direct children of `node`, in authoring order.
    fn children(&self, node: Self::Handle) -> Vec<Self::Handle>;

    /// Authored name of `node`.
    fn name(&self, node: Self::Handle) -> Option<&str>;

    /// Parent link of `node`, if it has one.
    fn parent(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// Whether `node` is a skeletal joint.
    fn is_joint(&self, node: Self::Handle) -> bool;

    /// Joints of the skeleton bound to `node`.
    ///
    /// Returns `Some` if and only if `node` is a skinned mesh.
    fn skin_joints(&self, node: Self::Handle) -> Option<Vec<Self::Handle>>;

    /// Named morph target slots of `node` as `(name, slot index)` pairs.
    fn morph_targets(&self, node: Self::Handle) -> Vec<(String, usize)>;

    /// Current weight of a morph target slot.
    fn morph_weight(&self, node: Self::Handle, slot: usize) -> Option<f32>;

    /// Overwrites the weight of a morph target slot.
    fn set_morph_weight(&mut self, node: Self::Handle, slot: usize, weight: f32);

    /// Local rotation of a joint.
    fn joint_rotation(&self, joint: Self::Handle) -> Option<Quat>;

    /// Overwrites the local rotation of a joint.
    fn set_joint_rotation(&mut self, joint: Self::Handle, rotation: Quat);

    /// Flags the joint's world transform for recomputation.
    fn mark_world_dirty(&mut self, joint: Self::Handle);
}
