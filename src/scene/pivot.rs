use crate::scene::Node;

/// Empty grouping node; only carries a transform and children.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pivot {}

impl Pivot {
    pub fn new() -> Self {
        Self {}
    }
}

impl From<Pivot> for Node {
    fn from(value: Pivot) -> Node {
        Node::Pivot(value)
    }
}
