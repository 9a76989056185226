use serde::{Deserialize, Serialize};

use crate::command::resolve_target;
use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::scene::NodeId;
use crate::serialization::{self, ObjectData};

/// Adds an object to the scene root and selects it.
#[derive(Debug, Clone, PartialEq)]
pub struct AddObjectCommand {
    pub(super) id: u32,
    label: String,
    target: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddObjectData {
    #[serde(default)]
    pub id: u32,
    pub label: String,
    pub object: ObjectData,
}

impl AddObjectCommand {
    /// `target` is usually a detached node from [`Editor::insert_detached`].
    pub fn new(editor: &Editor, target: NodeId) -> Result<Self> {
        let spatial = editor
            .scene()
            .spatial(target)
            .ok_or(Error::UnknownNode(target))?;

        Ok(Self {
            id: 0,
            label: format!("Add Object: {}", spatial.name),
            target,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn execute(&self, editor: &mut Editor) {
        editor.add_object(self.target);
        editor.select(Some(self.target));
    }

    pub fn undo(&self, editor: &mut Editor) {
        editor.remove_object(self.target);
        editor.deselect();
    }

    pub fn serialize(&self, editor: &Editor) -> Result<AddObjectData> {
        Ok(AddObjectData {
            id: self.id,
            label: self.label.clone(),
            object: serialization::to_structured(editor.scene(), self.target)?,
        })
    }

    pub fn from_structured(editor: &mut Editor, data: AddObjectData) -> Result<Self> {
        let target = resolve_target(editor, &data.object)?;

        Ok(Self {
            id: data.id,
            label: data.label,
            target,
        })
    }
}
