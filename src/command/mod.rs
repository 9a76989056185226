//! Undoable editor commands.
//!
//! Every mutation of the scene graph goes through a [`Command`]. A command
//! can be applied ([`Command::execute`]), reverted ([`Command::undo`]) and
//! persisted ([`Command::serialize`] / [`Command::from_structured`]). The
//! editor is never stored in a command; it is handed to each call.
//!
//! Commands refer to scene nodes by [`NodeId`] while in memory and by uuid
//! once serialized. Restoring a command first looks the uuid up in the live
//! scene and only rebuilds the object from its structured data when no such
//! node is attached, so replaying history over a scene that still has the
//! object never duplicates it.

mod add_object;
mod remove_object;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::add_object::*;
pub use self::remove_object::*;

use crate::editor::Editor;
use crate::error::Result;
use crate::scene::NodeId;
use crate::serialization::{self, ObjectData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    AddObject,
    RemoveObject,
}

impl CommandKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::AddObject => "AddObjectCommand",
            CommandKind::RemoveObject => "RemoveObjectCommand",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddObject(AddObjectCommand),
    RemoveObject(RemoveObjectCommand),
}

/// Persisted form of a command: `{ "kind": ..., "id": ..., "label": ..., ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CommandData {
    #[serde(rename = "AddObjectCommand")]
    AddObject(AddObjectData),
    #[serde(rename = "RemoveObjectCommand")]
    RemoveObject(RemoveObjectData),
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::AddObject(_) => CommandKind::AddObject,
            Command::RemoveObject(_) => CommandKind::RemoveObject,
        }
    }

    /// Sequence number given by the history; 0 until recorded.
    pub fn id(&self) -> u32 {
        match self {
            Command::AddObject(cmd) => cmd.id,
            Command::RemoveObject(cmd) => cmd.id,
        }
    }

    pub fn set_id(&mut self, id: u32) {
        match self {
            Command::AddObject(cmd) => cmd.id = id,
            Command::RemoveObject(cmd) => cmd.id = id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Command::AddObject(cmd) => cmd.label(),
            Command::RemoveObject(cmd) => cmd.label(),
        }
    }

    pub fn target(&self) -> NodeId {
        match self {
            Command::AddObject(cmd) => cmd.target(),
            Command::RemoveObject(cmd) => cmd.target(),
        }
    }

    pub fn execute(&self, editor: &mut Editor) {
        tracing::debug!(kind = %self.kind(), label = self.label(), "execute");

        match self {
            Command::AddObject(cmd) => cmd.execute(editor),
            Command::RemoveObject(cmd) => cmd.execute(editor),
        }
    }

    pub fn undo(&self, editor: &mut Editor) {
        tracing::debug!(kind = %self.kind(), label = self.label(), "undo");

        match self {
            Command::AddObject(cmd) => cmd.undo(editor),
            Command::RemoveObject(cmd) => cmd.undo(editor),
        }
    }

    pub fn serialize(&self, editor: &Editor) -> Result<CommandData> {
        Ok(match self {
            Command::AddObject(cmd) => CommandData::AddObject(cmd.serialize(editor)?),
            Command::RemoveObject(cmd) => CommandData::RemoveObject(cmd.serialize(editor)?),
        })
    }

    pub fn from_structured(editor: &mut Editor, data: CommandData) -> Result<Command> {
        Ok(match data {
            CommandData::AddObject(data) => {
                Command::AddObject(AddObjectCommand::from_structured(editor, data)?)
            }
            CommandData::RemoveObject(data) => {
                Command::RemoveObject(RemoveObjectCommand::from_structured(editor, data)?)
            }
        })
    }

    pub fn to_json(&self, editor: &Editor) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.serialize(editor)?)?)
    }

    pub fn from_json(editor: &mut Editor, value: serde_json::Value) -> Result<Command> {
        let data: CommandData = serde_json::from_value(value)?;
        Self::from_structured(editor, data)
    }
}

impl From<AddObjectCommand> for Command {
    fn from(value: AddObjectCommand) -> Self {
        Command::AddObject(value)
    }
}

impl From<RemoveObjectCommand> for Command {
    fn from(value: RemoveObjectCommand) -> Self {
        Command::RemoveObject(value)
    }
}

/// Binds to the attached node carrying the serialized uuid, or rebuilds the
/// object as a detached node when the live scene has none.
fn resolve_target(editor: &mut Editor, object: &ObjectData) -> Result<NodeId> {
    let uuid = object.object.uuid;

    if let Some(id) = editor.object_by_uuid(uuid) {
        tracing::debug!(%uuid, "bound to live object");
        return Ok(id);
    }

    serialization::from_structured(editor.scene_mut(), object)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::Error;
    use crate::scene::{Geometry, Mesh, Spatial};

    fn add_box(editor: &mut Editor, name: &str) -> Command {
        let id = editor.insert_detached(Spatial::new(name, Mesh::new(Geometry::new_box(1.0, 1.0, 1.0))));
        AddObjectCommand::new(editor, id).unwrap().into()
    }

    #[test]
    fn dispatch_reports_kind_and_label() {
        let mut editor = Editor::new();
        let cmd = add_box(&mut editor, "Cube");

        assert_eq!(cmd.kind(), CommandKind::AddObject);
        assert_eq!(cmd.kind().to_string(), "AddObjectCommand");
        assert_eq!(cmd.label(), "Add Object: Cube");
        assert_eq!(cmd.id(), 0);
    }

    #[test]
    fn envelope_carries_kind_id_label() {
        let mut editor = Editor::new();
        let mut cmd = add_box(&mut editor, "Cube");
        cmd.set_id(3);

        let json = cmd.to_json(&editor).unwrap();
        assert_eq!(json["kind"], "AddObjectCommand");
        assert_eq!(json["id"], 3);
        assert_eq!(json["label"], "Add Object: Cube");
        assert_eq!(json["object"]["object"]["name"], "Cube");
    }

    #[test]
    fn json_round_trip_through_fresh_editor() {
        let mut editor = Editor::new();
        let cmd = add_box(&mut editor, "Cube");
        let json = cmd.to_json(&editor).unwrap();

        let mut fresh = Editor::new();
        let restored = Command::from_json(&mut fresh, json.clone()).unwrap();

        assert_eq!(restored.kind(), cmd.kind());
        assert_eq!(restored.label(), cmd.label());
        assert_eq!(restored.to_json(&fresh).unwrap(), json);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut editor = Editor::new();
        let err = Command::from_json(
            &mut editor,
            json!({ "kind": "SetPositionCommand", "id": 1, "label": "Set Position" }),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn missing_object_is_rejected() {
        let mut editor = Editor::new();
        let err = Command::from_json(
            &mut editor,
            json!({ "kind": "AddObjectCommand", "id": 1, "label": "Add Object: Cube" }),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Json(_)));
        assert_eq!(editor.scene().stored_len(), 0);
    }
}
