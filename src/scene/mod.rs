//! Scene Graph
//!
//! A small hierarchical scene that implements [`RigModel`](crate::rig::RigModel):
//! - Node: hierarchy, transform, joint flag, skin and morph components
//! - Transform: TRS with cached local/world matrices and dirty tracking
//! - Skeleton: ordered joint list shared by skinned meshes
//! - Scene: node and skeleton storage
//! - transform_system: world matrix propagation

pub mod node;
pub mod scene;
pub mod skeleton;
pub mod transform;
pub mod transform_system;

pub use node::{MorphTargets, Node};
pub use scene::Scene;
pub use skeleton::Skeleton;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct SkeletonKey;
}
