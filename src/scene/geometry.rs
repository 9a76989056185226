use glam::Vec3;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryShape {
    /// Axis-aligned box centred on the origin; buffers are generated.
    Box { width: f32, height: f32, depth: f32 },
    /// Raw vertex/index buffers.
    Buffer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub uuid: Uuid,
    shape: GeometryShape,
    positions: Vec<f32>,
    indices: Option<Vec<u32>>,
}

impl Geometry {
    pub fn new_box(width: f32, height: f32, depth: f32) -> Self {
        Self::box_with_uuid(Uuid::new_v4(), width, height, depth)
    }

    pub fn box_with_uuid(uuid: Uuid, width: f32, height: f32, depth: f32) -> Self {
        let (positions, indices) = box_buffers(Vec3::new(width, height, depth) * 0.5);

        Self {
            uuid,
            shape: GeometryShape::Box {
                width,
                height,
                depth,
            },
            positions,
            indices: Some(indices),
        }
    }

    pub fn from_buffers(positions: Vec<f32>, indices: Option<Vec<u32>>) -> Self {
        Self::buffers_with_uuid(Uuid::new_v4(), positions, indices)
    }

    pub fn buffers_with_uuid(uuid: Uuid, positions: Vec<f32>, indices: Option<Vec<u32>>) -> Self {
        Self {
            uuid,
            shape: GeometryShape::Buffer,
            positions,
            indices,
        }
    }

    pub fn shape(&self) -> GeometryShape {
        self.shape
    }

    /// Flat xyz triples.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

fn box_buffers(half: Vec3) -> (Vec<f32>, Vec<u32>) {
    // (normal, u, v) with u x v == normal so every face winds counter-clockwise
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut positions = Vec::with_capacity(faces.len() * 4 * 3);
    let mut indices = Vec::with_capacity(faces.len() * 6);

    for (normal, u, v) in faces {
        let base = (positions.len() / 3) as u32;

        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner = (normal + u * su + v * sv) * half;
            positions.extend_from_slice(&corner.to_array());
        }

        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (positions, indices)
}
