use crate::scene::{Geometry, Node};

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
}

impl Mesh {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }
}

impl From<Mesh> for Node {
    fn from(value: Mesh) -> Node {
        Node::Mesh(value)
    }
}
