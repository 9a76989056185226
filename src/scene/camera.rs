use crate::scene::Node;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Camera {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new() -> Self {
        Camera {
            fov: 75.0,
            near: 0.1,
            far: 2000.0,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Camera> for Node {
    fn from(value: Camera) -> Node {
        Node::Camera(value)
    }
}
