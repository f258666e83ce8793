use glam::Affine3A;

use crate::scene::transform::Transform;
use crate::scene::{NodeHandle, SkeletonKey};

/// A scene node.
///
/// # Hierarchy
///
/// - `parent`: optional parent handle (`None` for root nodes)
/// - `children`: child handles in insertion order
///
/// # Components
///
/// - `joint`: marks the node as a skeleton joint (bone)
/// - `skin`: skeleton bound to this node, making it a skinned mesh
/// - `morph`: named morph target weights
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    // === Core Spatial Data ===
    pub transform: Transform,

    // === Components ===
    pub joint: bool,
    pub skin: Option<SkeletonKey>,
    pub morph: Option<MorphTargets>,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            joint: false,
            skin: None,
            morph: None,
        }
    }

    /// Creates a node flagged as a skeleton joint.
    #[must_use]
    pub fn joint(name: &str) -> Self {
        Self {
            joint: true,
            ..Self::new(name)
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("Node")
    }
}

/// Named morph target weights of a mesh.
///
/// `names[i]` labels weight slot `i`. Names may repeat; lookups return the
/// first slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MorphTargets {
    names: Vec<String>,
    weights: Vec<f32>,
}

impl MorphTargets {
    /// Creates targets with all weights at zero.
    #[must_use]
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| (*n).to_string()).collect(),
            weights: vec![0.0; names.len()],
        }
    }

    #[inline]
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[inline]
    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    #[must_use]
    pub fn slot(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    #[must_use]
    pub fn weight(&self, slot: usize) -> Option<f32> {
        self.weights.get(slot).copied()
    }

    pub fn set_weight(&mut self, slot: usize, weight: f32) {
        if let Some(w) = self.weights.get_mut(slot) {
            *w = weight;
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
