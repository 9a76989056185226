//! Structured (JSON-shaped) representation of scene objects.
//!
//! [`to_structured`] captures a node and its whole subtree, with the
//! geometries it references listed once each. [`from_structured`] rebuilds an
//! equivalent detached subtree in a scene store.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::scene::{
    Camera, Geometry, GeometryShape, Mesh, Node, NodeId, Pivot, Scene, Spatial, Transform,
};

pub const OBJECT_DATA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub version: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub generator: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            version: OBJECT_DATA_VERSION,
            kind: "Object".to_owned(),
            generator: env!("CARGO_PKG_NAME").to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectData {
    pub metadata: Metadata,
    #[serde(default)]
    pub geometries: Vec<GeometryData>,
    pub object: ObjectRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeometryData {
    BoxGeometry {
        uuid: Uuid,
        width: f32,
        height: f32,
        depth: f32,
    },
    BufferGeometry {
        uuid: Uuid,
        positions: Vec<f32>,
        #[serde(default)]
        indices: Option<Vec<u32>>,
    },
}

impl GeometryData {
    pub fn uuid(&self) -> Uuid {
        match self {
            GeometryData::BoxGeometry { uuid, .. } | GeometryData::BufferGeometry { uuid, .. } => {
                *uuid
            }
        }
    }

    fn from_geometry(geometry: &Geometry) -> Self {
        match geometry.shape() {
            GeometryShape::Box {
                width,
                height,
                depth,
            } => GeometryData::BoxGeometry {
                uuid: geometry.uuid,
                width,
                height,
                depth,
            },
            GeometryShape::Buffer => GeometryData::BufferGeometry {
                uuid: geometry.uuid,
                positions: geometry.positions().to_vec(),
                indices: geometry.indices().map(<[u32]>::to_vec),
            },
        }
    }

    fn to_geometry(&self) -> Geometry {
        match self {
            GeometryData::BoxGeometry {
                uuid,
                width,
                height,
                depth,
            } => Geometry::box_with_uuid(*uuid, *width, *height, *depth),
            GeometryData::BufferGeometry {
                uuid,
                positions,
                indices,
            } => Geometry::buffers_with_uuid(*uuid, positions.clone(), indices.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(flatten)]
    pub node: NodeRecord,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ObjectRecord>,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeRecord {
    Mesh { geometry: Uuid },
    Pivot,
    Camera { fov: f32, near: f32, far: f32 },
}

/// Serializes `id` and its subtree.
pub fn to_structured(scene: &Scene, id: NodeId) -> Result<ObjectData> {
    let mut geometries = Vec::new();
    let mut seen = AHashSet::new();

    let object = record(scene, id, &mut geometries, &mut seen)?;

    Ok(ObjectData {
        metadata: Metadata::default(),
        geometries,
        object,
    })
}

fn record(
    scene: &Scene,
    id: NodeId,
    geometries: &mut Vec<GeometryData>,
    seen: &mut AHashSet<Uuid>,
) -> Result<ObjectRecord> {
    let spatial = scene.spatial(id).ok_or(Error::UnknownNode(id))?;

    let node = match &spatial.node {
        Node::Mesh(mesh) => {
            if seen.insert(mesh.geometry.uuid) {
                geometries.push(GeometryData::from_geometry(&mesh.geometry));
            }

            NodeRecord::Mesh {
                geometry: mesh.geometry.uuid,
            }
        }
        Node::Pivot(_) => NodeRecord::Pivot,
        Node::Camera(camera) => NodeRecord::Camera {
            fov: camera.fov,
            near: camera.near,
            far: camera.far,
        },
    };

    let children = spatial
        .children()
        .iter()
        .map(|child| record(scene, *child, geometries, seen))
        .collect::<Result<Vec<_>>>()?;

    Ok(ObjectRecord {
        uuid: spatial.uuid,
        name: spatial.name.clone(),
        transform: spatial.transform,
        visible: spatial.visible,
        node,
        children,
    })
}

/// Rebuilds the object described by `data` as a detached subtree and returns
/// its root. Nothing is left in the store when this fails.
pub fn from_structured(scene: &mut Scene, data: &ObjectData) -> Result<NodeId> {
    if data.metadata.version != OBJECT_DATA_VERSION {
        return Err(Error::UnsupportedVersion(data.metadata.version));
    }

    let geometries: AHashMap<Uuid, &GeometryData> = data
        .geometries
        .iter()
        .map(|geometry| (geometry.uuid(), geometry))
        .collect();

    let id = build(scene, &data.object, &geometries)?;

    tracing::debug!(uuid = %data.object.uuid, name = %data.object.name, "rebuilt object from structured data");

    Ok(id)
}

fn build(
    scene: &mut Scene,
    record: &ObjectRecord,
    geometries: &AHashMap<Uuid, &GeometryData>,
) -> Result<NodeId> {
    let node = match &record.node {
        NodeRecord::Mesh { geometry } => {
            let data = geometries.get(geometry).ok_or(Error::MissingGeometry {
                geometry: *geometry,
                object: record.uuid,
            })?;

            Node::from(Mesh::new(data.to_geometry()))
        }
        NodeRecord::Pivot => Node::from(Pivot::new()),
        NodeRecord::Camera { fov, near, far } => Node::from(Camera {
            fov: *fov,
            near: *near,
            far: *far,
        }),
    };

    let id = scene.insert(
        Spatial::new(record.name.clone(), node)
            .with_uuid(record.uuid)
            .with_transform(record.transform)
            .with_visible(record.visible),
    );

    for child in &record.children {
        match build(scene, child, geometries) {
            Ok(child_id) => {
                scene.attach(child_id, Some(id), None);
            }
            Err(err) => {
                scene.purge(id);
                return Err(err);
            }
        }
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::*;

    fn box_mesh(scene: &mut Scene, name: &str) -> NodeId {
        scene.insert(Spatial::new(name, Mesh::new(Geometry::new_box(1.0, 1.0, 1.0))))
    }

    #[test]
    fn envelope_layout() {
        let mut scene = Scene::new();
        let id = box_mesh(&mut scene, "Cube");
        let data = to_structured(&scene, id).unwrap();

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["metadata"]["version"], 1);
        assert_eq!(json["metadata"]["type"], "Object");
        assert_eq!(json["geometries"][0]["type"], "BoxGeometry");
        assert_eq!(json["object"]["type"], "Mesh");
        assert_eq!(json["object"]["name"], "Cube");
        assert_eq!(
            json["object"]["uuid"],
            scene.spatial(id).unwrap().uuid.to_string()
        );
        assert!(json["object"].get("children").is_none());
    }

    #[test]
    fn rebuild_matches_original() {
        let mut scene = Scene::new();
        let parent = scene.insert(
            Spatial::new("rig", Pivot::new()).with_transform(Transform {
                position: Vec3::new(1.0, 2.0, 3.0),
                rotation: Quat::from_rotation_y(0.5),
                scale: Vec3::splat(2.0),
            }),
        );
        let child = box_mesh(&mut scene, "body");
        let camera = scene.insert(Spatial::new("eye", Camera::new()).with_visible(false));
        scene.attach(child, Some(parent), None);
        scene.attach(camera, Some(parent), None);

        let data = to_structured(&scene, parent).unwrap();
        let json = serde_json::to_string(&data).unwrap();
        let parsed: ObjectData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, data);

        let mut fresh = Scene::new();
        let rebuilt = from_structured(&mut fresh, &parsed).unwrap();

        assert!(!fresh.is_attached(rebuilt));
        assert_eq!(fresh.subtree(rebuilt).len(), 3);
        assert_eq!(to_structured(&fresh, rebuilt).unwrap(), data);

        let original_body = scene.spatial(child).unwrap();
        let rebuilt_body = fresh
            .spatial(fresh.spatial(rebuilt).unwrap().children()[0])
            .unwrap();
        assert_eq!(rebuilt_body.uuid, original_body.uuid);
        assert_eq!(rebuilt_body.node, original_body.node);
    }

    #[test]
    fn shared_geometry_is_listed_once() {
        let mut scene = Scene::new();
        let geometry = Geometry::new_box(1.0, 1.0, 1.0);
        let parent = scene.insert(Spatial::new("group", Pivot::new()));
        for name in ["a", "b"] {
            let id = scene.insert(Spatial::new(name, Mesh::new(geometry.clone())));
            scene.attach(id, Some(parent), None);
        }

        let data = to_structured(&scene, parent).unwrap();
        assert_eq!(data.geometries.len(), 1);
    }

    #[test]
    fn buffer_geometry_survives() {
        let mut scene = Scene::new();
        let geometry = Geometry::from_buffers(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            Some(vec![0, 1, 2]),
        );
        let id = scene.insert(Spatial::new("tri", Mesh::new(geometry.clone())));

        let data = to_structured(&scene, id).unwrap();
        let mut fresh = Scene::new();
        let rebuilt = from_structured(&mut fresh, &data).unwrap();

        assert_eq!(
            fresh.spatial(rebuilt).unwrap().node,
            Node::Mesh(Mesh::new(geometry))
        );
    }

    #[test]
    fn missing_geometry_leaves_store_clean() {
        let mut scene = Scene::new();
        let parent = scene.insert(Spatial::new("group", Pivot::new()));
        let child = box_mesh(&mut scene, "box");
        scene.attach(child, Some(parent), None);

        let mut data = to_structured(&scene, parent).unwrap();
        data.geometries.clear();

        let mut fresh = Scene::new();
        let err = from_structured(&mut fresh, &data).unwrap_err();

        assert!(matches!(err, Error::MissingGeometry { .. }));
        assert_eq!(fresh.stored_len(), 0);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut scene = Scene::new();
        let id = box_mesh(&mut scene, "box");
        let mut data = to_structured(&scene, id).unwrap();
        data.metadata.version = 7;

        let err = from_structured(&mut scene, &data).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(7)));
    }

    #[test]
    fn unknown_node_is_reported() {
        let mut scene = Scene::new();
        let id = box_mesh(&mut scene, "box");
        scene.purge(id);

        assert!(matches!(
            to_structured(&scene, id),
            Err(Error::UnknownNode(_))
        ));
    }
}
