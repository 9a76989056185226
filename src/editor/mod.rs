use uuid::Uuid;

use crate::core::EventQueue;
use crate::scene::{NodeId, Placement, Scene, Spatial};

/// Change notifications for anything observing the scene or the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    ObjectAdded(NodeId),
    ObjectRemoved(NodeId),
    ObjectSelected(Option<NodeId>),
    SceneGraphChanged,
}

/// Owns the scene store and the selection. Commands mutate the scene only
/// through these methods, which keep the event queue in sync.
pub struct Editor {
    scene: Scene,
    selected: Option<NodeId>,
    events: EventQueue<EditorEvent>,
}

impl Editor {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selected: None,
            events: EventQueue::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Stores a node without adding it to the scene.
    pub fn insert_detached(&mut self, spatial: Spatial) -> NodeId {
        self.scene.insert(spatial)
    }

    pub fn add_object(&mut self, id: NodeId) -> bool {
        self.add_object_at(id, None, None)
    }

    pub fn add_object_at(&mut self, id: NodeId, parent: Option<NodeId>, index: Option<usize>) -> bool {
        if !self.scene.attach(id, parent, index) {
            tracing::warn!(?id, ?parent, "object not added: unknown, already attached or invalid parent");
            return false;
        }

        let kind = self.scene.spatial(id).map_or("?", |spatial| spatial.node.type_name());
        tracing::debug!(?id, ?parent, kind, "object added");

        self.events.emit(EditorEvent::ObjectAdded(id));
        self.events.emit(EditorEvent::SceneGraphChanged);

        true
    }

    pub fn remove_object(&mut self, id: NodeId) -> Option<Placement> {
        if !self.scene.is_attached(id) {
            tracing::warn!(?id, "object not removed: not in the scene");
            return None;
        }

        let placement = self.scene.detach(id)?;

        tracing::debug!(?id, ?placement, "object removed");

        self.events.emit(EditorEvent::ObjectRemoved(id));
        self.events.emit(EditorEvent::SceneGraphChanged);

        Some(placement)
    }

    pub fn select(&mut self, id: Option<NodeId>) {
        if self.selected == id {
            return;
        }

        if let Some(node) = id.filter(|node| !self.scene.is_attached(*node)) {
            tracing::warn!(id = ?node, "not selected: not in the scene");
            return;
        }

        self.selected = id;
        self.events.emit(EditorEvent::ObjectSelected(id));
    }

    pub fn deselect(&mut self) {
        self.select(None);
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn object_by_uuid(&self, uuid: Uuid) -> Option<NodeId> {
        self.scene.find_by_uuid(uuid)
    }

    pub fn events(&self) -> &EventQueue<EditorEvent> {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain().collect()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
