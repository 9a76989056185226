use serde::{Deserialize, Serialize};

use crate::command::{Command, CommandData};
use crate::editor::Editor;
use crate::error::Result;

pub const DEFAULT_HISTORY_LIMIT: usize = 128;

/// Undo/redo stacks. Commands are executed through the history so that
/// execute and undo strictly alternate for every command it holds.
pub struct History {
    undos: Vec<Command>,
    redos: Vec<Command>,
    id_counter: u32,
    limit: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryData {
    pub undos: Vec<CommandData>,
    pub redos: Vec<CommandData>,
}

impl History {
    /// `limit` caps the undo stack; it is at least 1.
    pub fn new(limit: usize) -> Self {
        Self {
            undos: Vec::new(),
            redos: Vec::new(),
            id_counter: 0,
            limit: limit.max(1),
        }
    }

    pub fn execute(&mut self, editor: &mut Editor, mut cmd: Command) {
        self.id_counter += 1;
        cmd.set_id(self.id_counter);

        cmd.execute(editor);
        self.undos.push(cmd);

        for cmd in std::mem::take(&mut self.redos) {
            self.release(editor, cmd);
        }

        while self.undos.len() > self.limit {
            let cmd = self.undos.remove(0);
            self.release(editor, cmd);
        }
    }

    pub fn undo(&mut self, editor: &mut Editor) -> Option<&Command> {
        let cmd = self.undos.pop()?;
        cmd.undo(editor);
        self.redos.push(cmd);

        self.redos.last()
    }

    pub fn redo(&mut self, editor: &mut Editor) -> Option<&Command> {
        let cmd = self.redos.pop()?;
        cmd.execute(editor);
        self.undos.push(cmd);

        self.undos.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.undos.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redos.is_empty()
    }

    /// Oldest first.
    pub fn undos(&self) -> &[Command] {
        &self.undos
    }

    /// Next redo last.
    pub fn redos(&self) -> &[Command] {
        &self.redos
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Forgets every command. Objects only those commands could bring back
    /// are freed.
    pub fn clear(&mut self, editor: &mut Editor) {
        let undos = std::mem::take(&mut self.undos);
        let redos = std::mem::take(&mut self.redos);

        for cmd in undos.into_iter().chain(redos) {
            self.release(editor, cmd);
        }

        self.id_counter = 0;
    }

    pub fn serialize(&self, editor: &Editor) -> Result<HistoryData> {
        Ok(HistoryData {
            undos: self
                .undos
                .iter()
                .map(|cmd| cmd.serialize(editor))
                .collect::<Result<_>>()?,
            redos: self
                .redos
                .iter()
                .map(|cmd| cmd.serialize(editor))
                .collect::<Result<_>>()?,
        })
    }

    /// Restores a history saved with [`History::serialize`]. Undo entries are
    /// expected to be applied to the editor's scene already, redo entries not.
    pub fn from_structured(editor: &mut Editor, data: HistoryData, limit: usize) -> Result<Self> {
        let mut history = History::new(limit);

        if let Err(err) = history.restore(editor, data) {
            history.clear(editor);
            return Err(err);
        }

        history.id_counter = history
            .undos
            .iter()
            .chain(&history.redos)
            .map(Command::id)
            .max()
            .unwrap_or(0);

        while history.undos.len() > history.limit {
            let cmd = history.undos.remove(0);
            history.release(editor, cmd);
        }

        tracing::info!(
            undos = history.undos.len(),
            redos = history.redos.len(),
            "history restored"
        );

        Ok(history)
    }

    fn restore(&mut self, editor: &mut Editor, data: HistoryData) -> Result<()> {
        for data in data.undos {
            self.undos.push(Command::from_structured(editor, data)?);
        }

        for data in data.redos {
            self.redos.push(Command::from_structured(editor, data)?);
        }

        Ok(())
    }

    /// Frees the command's target when it is detached and no remaining
    /// command refers to it.
    fn release(&self, editor: &mut Editor, cmd: Command) {
        let target = cmd.target();

        if self
            .undos
            .iter()
            .chain(&self.redos)
            .any(|other| other.target() == target)
        {
            return;
        }

        let freed = editor.scene_mut().purge(target);
        if freed > 0 {
            tracing::debug!(id = cmd.id(), label = cmd.label(), freed, "released command");
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{AddObjectCommand, RemoveObjectCommand};
    use crate::scene::{Geometry, Mesh, NodeId, Spatial};

    fn add_box(editor: &mut Editor, name: &str) -> (NodeId, Command) {
        let id = editor.insert_detached(Spatial::new(
            name,
            Mesh::new(Geometry::new_box(1.0, 1.0, 1.0)),
        ));
        (id, AddObjectCommand::new(editor, id).unwrap().into())
    }

    fn names(editor: &Editor) -> Vec<String> {
        editor
            .scene()
            .nodes()
            .map(|(_, spatial)| spatial.name.clone())
            .collect()
    }

    #[test]
    fn undo_redo_walks_the_stacks() {
        let mut editor = Editor::new();
        let mut history = History::default();

        let (a, cmd) = add_box(&mut editor, "a");
        history.execute(&mut editor, cmd);
        let (b, cmd) = add_box(&mut editor, "b");
        history.execute(&mut editor, cmd);

        assert_eq!(names(&editor), vec!["a", "b"]);
        assert_eq!(editor.selected(), Some(b));

        assert_eq!(history.undo(&mut editor).map(Command::id), Some(2));
        assert_eq!(names(&editor), vec!["a"]);
        assert!(history.can_redo());

        assert_eq!(history.undo(&mut editor).map(Command::label), Some("Add Object: a"));
        assert!(editor.scene().is_empty());
        assert!(history.undo(&mut editor).is_none());

        history.redo(&mut editor);
        assert_eq!(names(&editor), vec!["a"]);
        assert_eq!(editor.selected(), Some(a));

        history.redo(&mut editor);
        assert_eq!(names(&editor), vec!["a", "b"]);
        assert!(!history.can_redo());
    }

    #[test]
    fn new_command_drops_redos_and_frees_their_objects() {
        let mut editor = Editor::new();
        let mut history = History::default();

        let (a, cmd) = add_box(&mut editor, "a");
        history.execute(&mut editor, cmd);
        history.undo(&mut editor);

        let (_, cmd) = add_box(&mut editor, "b");
        history.execute(&mut editor, cmd);

        assert!(!history.can_redo());
        assert!(!editor.scene().contains(a));
        assert_eq!(editor.scene().stored_len(), 1);
    }

    #[test]
    fn limit_evicts_oldest() {
        let mut editor = Editor::new();
        let mut history = History::new(2);
        assert_eq!(history.limit(), 2);
        assert_eq!(History::new(0).limit(), 1);

        for name in ["a", "b", "c"] {
            let (_, cmd) = add_box(&mut editor, name);
            history.execute(&mut editor, cmd);
        }

        let labels: Vec<_> = history.undos().iter().map(Command::label).collect();
        assert_eq!(labels, vec!["Add Object: b", "Add Object: c"]);
        // evicted commands leave applied objects in place
        assert_eq!(names(&editor), vec!["a", "b", "c"]);
    }

    #[test]
    fn shared_target_survives_eviction() {
        let mut editor = Editor::new();
        let mut history = History::new(1);

        let (a, cmd) = add_box(&mut editor, "a");
        history.execute(&mut editor, cmd);
        let cmd = RemoveObjectCommand::new(&editor, a).unwrap();
        history.execute(&mut editor, cmd.into());

        assert_eq!(history.undos().len(), 1);
        assert!(editor.scene().contains(a));

        history.undo(&mut editor);
        assert!(editor.scene().is_attached(a));
    }

    #[test]
    fn clear_frees_unreachable_objects() {
        let mut editor = Editor::new();
        let mut history = History::default();

        let (a, cmd) = add_box(&mut editor, "a");
        history.execute(&mut editor, cmd);
        let (b, cmd) = add_box(&mut editor, "b");
        history.execute(&mut editor, cmd);
        history.undo(&mut editor);

        history.clear(&mut editor);

        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(editor.scene().contains(a));
        assert!(!editor.scene().contains(b));
    }

    #[test]
    fn failed_restore_leaves_no_rebuilt_objects() {
        let mut editor = Editor::new();
        let mut history = History::default();

        for name in ["a", "b"] {
            let (_, cmd) = add_box(&mut editor, name);
            history.execute(&mut editor, cmd);
        }
        history.undo(&mut editor);
        history.undo(&mut editor);

        let mut data = history.serialize(&editor).unwrap();
        assert_eq!(data.redos.len(), 2);
        if let CommandData::AddObject(add) = &mut data.redos[1] {
            add.object.metadata.version = 9;
        }

        let mut fresh = Editor::new();
        let result = History::from_structured(&mut fresh, data, 16);

        assert!(matches!(result, Err(crate::Error::UnsupportedVersion(9))));
        assert_eq!(fresh.scene().stored_len(), 0);
    }

    #[test]
    fn restore_binds_live_objects_and_rebuilds_the_rest() {
        let mut editor = Editor::new();
        let mut history = History::default();

        let (a, cmd) = add_box(&mut editor, "a");
        history.execute(&mut editor, cmd);
        let (_, cmd) = add_box(&mut editor, "b");
        history.execute(&mut editor, cmd);
        history.undo(&mut editor);

        let json = serde_json::to_string(&history.serialize(&editor).unwrap()).unwrap();
        let data: HistoryData = serde_json::from_str(&json).unwrap();

        let mut restored = History::from_structured(&mut editor, data, 16).unwrap();

        assert_eq!(restored.undos()[0].target(), a);
        assert_eq!(restored.redos()[0].id(), 2);

        restored.redo(&mut editor);
        assert_eq!(names(&editor), vec!["a", "b"]);

        let (_, cmd) = add_box(&mut editor, "c");
        restored.execute(&mut editor, cmd);
        assert_eq!(restored.undos().last().map(Command::id), Some(3));
    }
}
