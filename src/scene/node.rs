use crate::scene::{Camera, Mesh, Pivot};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Mesh(Mesh),
    Pivot(Pivot),
    Camera(Camera),
}

impl Node {
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Mesh(_) => "Mesh",
            Node::Pivot(_) => "Pivot",
            Node::Camera(_) => "Camera",
        }
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self {
            Node::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}

/// Handle into a [`Scene`](crate::scene::Scene) store.
///
/// Handles carry a generation so a handle to a purged node never aliases a
/// node that later reuses the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(super) index: usize,
    pub(super) generation: u32,
}

impl NodeId {
    pub(super) fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }
}
