mod camera;
mod geometry;
mod mesh;
mod node;
mod pivot;
mod transform;

use ahash::AHashMap;
use slab::Slab;
use uuid::Uuid;

pub use self::camera::*;
pub use self::geometry::*;
pub use self::mesh::*;
pub use self::node::*;
pub use self::pivot::*;
pub use self::transform::*;

/// Where an attached node sits: under `parent` (or among the roots when
/// `None`) at position `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub parent: Option<NodeId>,
    pub index: usize,
}

struct Slot {
    generation: u32,
    spatial: Spatial,
}

/// Node store for one scene.
///
/// Every node lives in the store until it is purged. A node is *attached*
/// when it is reachable from the roots; removing an object from the scene
/// only detaches it, so handles held elsewhere stay valid.
pub struct Scene {
    nodes: Slab<Slot>,
    roots: Vec<NodeId>,
    by_uuid: AHashMap<Uuid, Vec<NodeId>>,
    next_generation: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: Slab::new(),
            roots: Vec::new(),
            by_uuid: AHashMap::new(),
            next_generation: 0,
        }
    }

    /// Stores a detached node.
    pub fn insert(&mut self, spatial: Spatial) -> NodeId {
        self.next_generation = self.next_generation.wrapping_add(1);
        let generation = self.next_generation;
        let uuid = spatial.uuid;

        let id = NodeId::new(self.nodes.insert(Slot { generation, spatial }), generation);
        self.by_uuid.entry(uuid).or_default().push(id);

        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.spatial(id).is_some()
    }

    pub fn spatial(&self, id: NodeId) -> Option<&Spatial> {
        self.nodes
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .map(|slot| &slot.spatial)
    }

    pub fn spatial_mut(&mut self, id: NodeId) -> Option<&mut Spatial> {
        self.nodes
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .map(|slot| &mut slot.spatial)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;

        loop {
            match self.spatial(current) {
                Some(spatial) => match spatial.parent {
                    Some(parent) => current = parent,
                    None => return self.roots.contains(&current),
                },
                None => return false,
            }
        }
    }

    pub fn placement(&self, id: NodeId) -> Option<Placement> {
        if !self.is_attached(id) {
            return None;
        }

        let parent = self.spatial(id)?.parent;
        let siblings = match parent {
            Some(parent) => &self.spatial(parent)?.children,
            None => &self.roots,
        };

        siblings
            .iter()
            .position(|c| *c == id)
            .map(|index| Placement { parent, index })
    }

    /// Links a detached node under `parent` (roots when `None`). `index` past
    /// the end appends. Returns `false` when nothing was linked.
    pub fn attach(&mut self, id: NodeId, parent: Option<NodeId>, index: Option<usize>) -> bool {
        let Some(spatial) = self.spatial(id) else {
            return false;
        };

        if spatial.parent.is_some() || self.roots.contains(&id) {
            return false;
        }

        if let Some(parent) = parent {
            if !self.contains(parent) || self.is_ancestor_or_self(id, parent) {
                return false;
            }
        }

        let siblings = match parent {
            Some(parent) => match self.spatial_mut(parent) {
                Some(spatial) => &mut spatial.children,
                None => return false,
            },
            None => &mut self.roots,
        };

        let index = index.unwrap_or(siblings.len()).min(siblings.len());
        siblings.insert(index, id);

        if let Some(spatial) = self.spatial_mut(id) {
            spatial.parent = parent;
        }

        true
    }

    /// Unlinks a node from its parent (or the roots). The node and its
    /// subtree stay in the store.
    pub fn detach(&mut self, id: NodeId) -> Option<Placement> {
        let parent = self.spatial(id)?.parent;

        let siblings = match parent {
            Some(parent) => &mut self.spatial_mut(parent)?.children,
            None => &mut self.roots,
        };

        let index = siblings.iter().position(|c| *c == id)?;
        siblings.remove(index);

        if let Some(spatial) = self.spatial_mut(id) {
            spatial.parent = None;
        }

        Some(Placement { parent, index })
    }

    /// First attached node with the given uuid.
    pub fn find_by_uuid(&self, uuid: Uuid) -> Option<NodeId> {
        self.by_uuid
            .get(&uuid)?
            .iter()
            .copied()
            .find(|id| self.is_attached(*id))
    }

    /// `id` followed by all of its descendants, depth first.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            let Some(spatial) = self.spatial(current) else {
                continue;
            };

            out.push(current);
            stack.extend(spatial.children.iter().rev().copied());
        }

        out
    }

    /// Attached nodes, depth first from the roots.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Spatial)> {
        self.roots
            .iter()
            .flat_map(move |root| self.subtree(*root))
            .filter_map(move |id| self.spatial(id).map(|spatial| (id, spatial)))
    }

    /// Number of attached nodes.
    pub fn len(&self) -> usize {
        self.nodes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of nodes held by the store, attached or not.
    pub fn stored_len(&self) -> usize {
        self.nodes.len()
    }

    /// Frees a detached subtree. Attached nodes are left alone; returns how
    /// many nodes were freed.
    pub fn purge(&mut self, id: NodeId) -> usize {
        if !self.contains(id) || self.is_attached(id) {
            return 0;
        }

        self.detach(id);

        let ids = self.subtree(id);
        for id in &ids {
            let slot = self.nodes.remove(id.index);

            if let Some(entries) = self.by_uuid.get_mut(&slot.spatial.uuid) {
                entries.retain(|other| other != id);

                if entries.is_empty() {
                    self.by_uuid.remove(&slot.spatial.uuid);
                }
            }
        }

        ids.len()
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);

        while let Some(id) = current {
            if id == ancestor {
                return true;
            }

            current = self.spatial(id).and_then(|spatial| spatial.parent);
        }

        false
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spatial {
    pub uuid: Uuid,
    pub name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub transform: Transform,
    pub visible: bool,
    pub node: Node,
}

impl Spatial {
    pub fn new(name: impl Into<String>, node: impl Into<Node>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::default(),
            visible: true,
            node: node.into(),
        }
    }

    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = uuid;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
