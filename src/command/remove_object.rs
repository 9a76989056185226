use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::command::resolve_target;
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::scene::NodeId;
use crate::serialization::{self, ObjectData};

/// Removes an object from the scene; undo puts it back under the same parent
/// at the same position.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveObjectCommand {
    pub(super) id: u32,
    label: String,
    target: NodeId,
    parent: Option<NodeId>,
    index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveObjectData {
    #[serde(default)]
    pub id: u32,
    pub label: String,
    pub object: ObjectData,
    pub parent: Option<Uuid>,
    pub index: usize,
}

impl RemoveObjectCommand {
    pub fn new(editor: &Editor, target: NodeId) -> Result<Self> {
        let scene = editor.scene();
        let spatial = scene.spatial(target).ok_or(Error::UnknownNode(target))?;

        let placement = scene.placement(target).ok_or(Error::NotInScene(target))?;

        Ok(Self {
            id: 0,
            label: format!("Remove Object: {}", spatial.name),
            target,
            parent: placement.parent,
            index: placement.index,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn execute(&self, editor: &mut Editor) {
        editor.remove_object(self.target);
        editor.deselect();
    }

    pub fn undo(&self, editor: &mut Editor) {
        editor.add_object_at(self.target, self.parent, Some(self.index));
        editor.select(Some(self.target));
    }

    pub fn serialize(&self, editor: &Editor) -> Result<RemoveObjectData> {
        let parent = self
            .parent
            .map(|parent| {
                editor
                    .scene()
                    .spatial(parent)
                    .map(|spatial| spatial.uuid)
                    .ok_or(Error::UnknownNode(parent))
            })
            .transpose()?;

        Ok(RemoveObjectData {
            id: self.id,
            label: self.label.clone(),
            object: serialization::to_structured(editor.scene(), self.target)?,
            parent,
            index: self.index,
        })
    }

    pub fn from_structured(editor: &mut Editor, data: RemoveObjectData) -> Result<Self> {
        let target = resolve_target(editor, &data.object)?;

        let parent = data.parent.and_then(|uuid| {
            let parent = editor.object_by_uuid(uuid);
            if parent.is_none() {
                tracing::warn!(%uuid, "parent of removed object is gone, restoring at the root");
            }
            parent
        });

        Ok(Self {
            id: data.id,
            label: data.label,
            target,
            parent,
            index: data.index,
        })
    }
}
