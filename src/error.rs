use uuid::Uuid;

use crate::scene::NodeId;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported object data version {0}")]
    UnsupportedVersion(u32),

    #[error("geometry {geometry} referenced by object {object} is missing")]
    MissingGeometry { geometry: Uuid, object: Uuid },

    #[error("node {0:?} is not in the scene store")]
    UnknownNode(NodeId),

    #[error("node {0:?} is not part of the scene graph")]
    NotInScene(NodeId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
