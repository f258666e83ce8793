use glam::Vec3;
use slotmap::SlotMap;

use crate::scene::{Node, NodeHandle};

/// Joint list shared by skinned meshes.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub name: String,

    /// Ordered joint list; `bones[i]` is joint `i` of the skin.
    pub bones: Vec<NodeHandle>,

    /// Root bone index (usually `bones[0]`)
    pub(crate) root_bone_index: usize,
}

impl Skeleton {
    #[must_use]
    pub fn new(name: &str, bones: Vec<NodeHandle>, root_bone_index: usize) -> Self {
        Self {
            name: name.to_string(),
            bones,
            root_bone_index,
        }
    }

    /// Gets the root bone node handle
    #[inline]
    #[must_use]
    pub fn root_bone(&self) -> Option<NodeHandle> {
        self.bones.get(self.root_bone_index).copied()
    }

    /// World-space positions of all bones that still exist.
    #[must_use]
    pub fn bone_world_positions(&self, nodes: &SlotMap<NodeHandle, Node>) -> Vec<Vec3> {
        self.bones
            .iter()
            .filter_map(|&bone| nodes.get(bone))
            .map(|node| node.transform.world_matrix.translation.into())
            .collect()
    }
}
