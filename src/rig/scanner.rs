//! Rig Scanner
//!
//! Walks a model once and records what can be posed: every skinned mesh,
//! every distinct joint referenced by those meshes (with hierarchy depth)
//! and every named morph target slot.

use rustc_hash::FxHashSet;

use crate::rig::RigModel;

/// A joint discovered on a skinned mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointEntry<H> {
    pub handle: H,
    /// Lowercase joint name.
    pub name: String,
    /// Distance from the top of the joint chain (top joint = 1).
    pub depth: u32,
}

/// A named morph target weight slot on a skinned mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorphTargetEntry<H> {
    pub mesh: H,
    pub slot: usize,
    /// Lowercase target name.
    pub name: String,
}

/// Result of a scan. Entries are kept in encounter order.
#[derive(Debug, Clone)]
pub struct RigInventory<H> {
    pub skinned_meshes: Vec<H>,
    pub joints: Vec<JointEntry<H>>,
    pub morph_targets: Vec<MorphTargetEntry<H>>,
}

impl<H> Default for RigInventory<H> {
    fn default() -> Self {
        Self {
            skinned_meshes: Vec::new(),
            joints: Vec::new(),
            morph_targets: Vec::new(),
        }
    }
}

impl<H> RigInventory<H> {
    /// True when nothing poseable was found.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty() && self.morph_targets.is_empty()
    }
}

pub struct RigScanner;

impl RigScanner {
    /// Scans the subtree under `root`. Read-only.
    pub fn scan<M: RigModel>(model: &M, root: M::Handle) -> RigInventory<M::Handle> {
        let mut inventory = RigInventory::default();
        let mut seen_joints: FxHashSet<M::Handle> = FxHashSet::default();

        for node in Self::collect_nodes(model, root) {
            let Some(joints) = model.skin_joints(node) else {
                continue;
            };
            inventory.skinned_meshes.push(node);

            for joint in joints {
                // Handles key the dedup; two joints may share a name.
                if !seen_joints.insert(joint) {
                    continue;
                }
                inventory.joints.push(JointEntry {
                    handle: joint,
                    name: lowercase_name(model, joint),
                    depth: joint_depth(model, joint),
                });
            }

            for (name, slot) in model.morph_targets(node) {
                inventory.morph_targets.push(MorphTargetEntry {
                    mesh: node,
                    slot,
                    name: name.to_lowercase(),
                });
            }
        }

        log::debug!(
            "Rig scan: {} skinned meshes, {} joints, {} morph targets",
            inventory.skinned_meshes.len(),
            inventory.joints.len(),
            inventory.morph_targets.len()
        );

        inventory
    }

    /// Depth-first pre-order walk; each node is visited once even if the
    /// model links it from several parents.
    fn collect_nodes<M: RigModel>(model: &M, root: M::Handle) -> Vec<M::Handle> {
        let mut visited: FxHashSet<M::Handle> = FxHashSet::default();
        let mut order = Vec::new();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            order.push(node);
            for child in model.children(node).into_iter().rev() {
                stack.push(child);
            }
        }

        order
    }
}

fn lowercase_name<M: RigModel>(model: &M, node: M::Handle) -> String {
    model.name(node).unwrap_or_default().to_lowercase()
}

/// Walks parent links until the first non-joint ancestor.
fn joint_depth<M: RigModel>(model: &M, joint: M::Handle) -> u32 {
    let mut depth = 1;
    let mut visited: FxHashSet<M::Handle> = FxHashSet::default();
    visited.insert(joint);

    let mut current = model.parent(joint);
    while let Some(parent) = current {
        // Cyclic parent links would otherwise never terminate.
        if !model.is_joint(parent) || !visited.insert(parent) {
            break;
        }
        depth += 1;
        current = model.parent(parent);
    }

    depth
}
