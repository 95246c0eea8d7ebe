//! Resource registry
//!
//! Every instance, room and sprite is a resource. Nothing keeps a live
//! reference to another resource across frames; it keeps the id and looks it
//! up here, so a removed resource reads as absent instead of dangling.

use crate::id::ResourceId;
use crate::sprite::SpriteInfo;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// What a registered id refers to
#[derive(Clone)]
pub enum ResourceKind {
    /// A live instance, owned by the given room
    Instance { room: ResourceId },
    /// A room
    Room,
    /// A sprite; the capability object is shared with whoever registered it
    Sprite(Rc<dyn SpriteInfo>),
}

impl fmt::Debug for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Instance { room } => write!(f, "Instance {{ room: {room} }}"),
            ResourceKind::Room => write!(f, "Room"),
            ResourceKind::Sprite(sprite) => write!(
                f,
                "Sprite {{ {}x{}, {} frames }}",
                sprite.width(),
                sprite.height(),
                sprite.frame_count()
            ),
        }
    }
}

/// A registry entry
#[derive(Clone, Debug)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    pub kind: ResourceKind,
}

/// Monotonic id → resource map
pub struct ResourceRegistry {
    next_id: u64,
    entries: BTreeMap<ResourceId, Resource>,
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            entries: BTreeMap::new(),
        }
    }

    /// Assign the next id and insert the resource under it
    pub fn create(&mut self, name: impl Into<String>, kind: ResourceKind) -> ResourceId {
        let id = ResourceId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            Resource {
                id,
                name: name.into(),
                kind,
            },
        );
        id
    }

    pub fn find(&self, id: ResourceId) -> Option<&Resource> {
        self.entries.get(&id)
    }

    pub fn find_mut(&mut self, id: ResourceId) -> Option<&mut Resource> {
        self.entries.get_mut(&id)
    }

    /// First resource registered under `name`
    pub fn find_by_name(&self, name: &str) -> Option<&Resource> {
        self.entries.values().find(|r| r.name == name)
    }

    /// Remove an entry. The id is never handed out again.
    pub fn remove(&mut self, id: ResourceId) -> Option<Resource> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Resolve an id to a sprite capability; anything else reads as absent
    pub fn sprite(&self, id: ResourceId) -> Option<&dyn SpriteInfo> {
        match &self.entries.get(&id)?.kind {
            ResourceKind::Sprite(sprite) => Some(sprite.as_ref()),
            _ => None,
        }
    }

    /// Owning room of a live instance
    pub fn room_of(&self, id: ResourceId) -> Option<ResourceId> {
        match self.entries.get(&id)?.kind {
            ResourceKind::Instance { room } => Some(room),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in id order
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.entries.values()
    }
}
