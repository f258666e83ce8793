use glam::Quat;
use slotmap::SlotMap;

use crate::rig::RigModel;
use crate::scene::node::{MorphTargets, Node};
use crate::scene::skeleton::Skeleton;
use crate::scene::transform_system;
use crate::scene::{NodeHandle, SkeletonKey};

/// Scene graph
///
/// Owns nodes and skeletons. Nodes reference skeletons through
/// [`SkeletonKey`]; skeletons reference their joints through
/// [`NodeHandle`]s.
#[derive(Debug, Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,
    pub skins: SlotMap<SkeletonKey, Skeleton>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            skins: SlotMap::with_key(),
        }
    }

    // ========================================================================
    // Node management
    // ========================================================================

    /// Adds a node as a scene root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Adds a node under `parent`.
    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.nodes.insert(child);
        self.attach(handle, parent);
        handle
    }

    /// Adds a joint node, under `parent` or as a root.
    pub fn add_joint(&mut self, name: &str, parent: Option<NodeHandle>) -> NodeHandle {
        match parent {
            Some(parent) => self.add_to_parent(Node::joint(name), parent),
            None => self.add_node(Node::joint(name)),
        }
    }

    /// Moves `child` under `parent`, detaching it from its old parent.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent || !self.nodes.contains_key(parent) || self.is_ancestor(child, parent) {
            return;
        }
        let Some(old_parent) = self.nodes.get(child).map(Node::parent) else {
            return;
        };

        match old_parent {
            Some(old) => {
                if let Some(node) = self.nodes.get_mut(old) {
                    node.children.retain(|&c| c != child);
                }
            }
            None => self.root_nodes.retain(|&r| r != child),
        }

        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
            node.transform.mark_dirty();
        }
    }

    /// Whether `ancestor` lies on the parent chain of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(Node::parent);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(Node::parent);
        }
        false
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// First node named `name` in the subtree under `root` (pre-order).
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let node = self.nodes.get(root)?;
        if node.name == name {
            return Some(root);
        }
        node.children
            .iter()
            .find_map(|&child| self.find_node_by_name(child, name))
    }

    // ========================================================================
    // Components
    // ========================================================================

    pub fn add_skeleton(&mut self, skeleton: Skeleton) -> SkeletonKey {
        self.skins.insert(skeleton)
    }

    /// Binds a skeleton to `node`, making it a skinned mesh.
    pub fn bind_skin(&mut self, node: NodeHandle, skeleton: SkeletonKey) {
        if let Some(node) = self.nodes.get_mut(node) {
            node.skin = Some(skeleton);
        }
    }

    pub fn set_morph_targets(&mut self, node: NodeHandle, targets: MorphTargets) {
        if let Some(node) = self.nodes.get_mut(node) {
            node.morph = Some(targets);
        }
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Recomputes world matrices of all dirty subtrees.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy(&mut self.nodes, &self.root_nodes);
    }
}

impl RigModel for Scene {
    type Handle = NodeHandle;

    fn children(&self, node: NodeHandle) -> Vec<NodeHandle> {
        self.nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn name(&self, node: NodeHandle) -> Option<&str> {
        self.nodes.get(node).map(|n| n.name.as_str())
    }

    fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(node).and_then(Node::parent)
    }

    fn is_joint(&self, node: NodeHandle) -> bool {
        self.nodes.get(node).is_some_and(|n| n.joint)
    }

    fn skin_joints(&self, node: NodeHandle) -> Option<Vec<NodeHandle>> {
        let key = self.nodes.get(node)?.skin?;
        Some(
            self.skins
                .get(key)
                .map(|skeleton| skeleton.bones.clone())
                .unwrap_or_default(),
        )
    }

    fn morph_targets(&self, node: NodeHandle) -> Vec<(String, usize)> {
        self.nodes
            .get(node)
            .and_then(|n| n.morph.as_ref())
            .map(|morph| {
                morph
                    .names()
                    .iter()
                    .enumerate()
                    .filter(|(_, name)| !name.is_empty())
                    .map(|(slot, name)| (name.clone(), slot))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn morph_weight(&self, node: NodeHandle, slot: usize) -> Option<f32> {
        self.nodes.get(node)?.morph.as_ref()?.weight(slot)
    }

    fn set_morph_weight(&mut self, node: NodeHandle, slot: usize, weight: f32) {
        if let Some(morph) = self.nodes.get_mut(node).and_then(|n| n.morph.as_mut()) {
            morph.set_weight(slot, weight);
        }
    }

    fn joint_rotation(&self, joint: NodeHandle) -> Option<Quat> {
        self.nodes.get(joint).map(|n| n.transform.rotation)
    }

    fn set_joint_rotation(&mut self, joint: NodeHandle, rotation: Quat) {
        if let Some(node) = self.nodes.get_mut(joint) {
            node.transform.rotation = rotation;
        }
    }

    fn mark_world_dirty(&mut self, joint: NodeHandle) {
        if let Some(node) = self.nodes.get_mut(joint) {
            node.transform.mark_dirty();
        }
    }
}
