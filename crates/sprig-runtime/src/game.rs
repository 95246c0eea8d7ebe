//! The game context
//!
//! One `Game` holds everything a running simulation shares: the resource
//! registry, the rooms, the scheduler's handler tables and clock, input and
//! the renderer hooks. Several games can live side by side in one process.

use crate::clock::GameClock;
use crate::config::LoopConfig;
use crate::event::HandlerTable;
use crate::game_loop::LoopState;
use crate::host::{FrameHandle, FrameScheduler, RenderHooks};
use crate::input::InputManagers;
use crate::instance::Instance;
use crate::room::Room;
use sprig_core::{ResourceId, ResourceKind, ResourceRegistry, SpriteInfo};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

pub struct Game {
    pub(crate) resources: ResourceRegistry,
    pub(crate) rooms: BTreeMap<ResourceId, Room>,
    /// STEP_BEGIN .. ASYNC lists
    pub(crate) update_handlers: HandlerTable,
    /// DRAW and DRAW_GUI lists
    pub(crate) draw_handlers: HandlerTable,
    /// One-shot CREATE and DESTROY lists; only DESTROY survives a room change
    pub(crate) queued: HandlerTable,
    /// Instances whose `on_create` is still owed
    pub(crate) pending_create: BTreeSet<ResourceId>,
    /// Destroyed instances waiting for their `on_destroy`
    pub(crate) graveyard: BTreeMap<ResourceId, Instance>,
    pub(crate) room: Option<ResourceId>,
    pub(crate) clock: GameClock,
    pub(crate) config: LoopConfig,
    pub(crate) state: LoopState,
    pub(crate) frames: Option<Box<dyn FrameScheduler>>,
    pub(crate) pending_frame: Option<FrameHandle>,
    pub(crate) input: Option<InputManagers>,
    pub(crate) hooks: RenderHooks,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    pub fn with_config(config: LoopConfig) -> Self {
        Self {
            resources: ResourceRegistry::new(),
            rooms: BTreeMap::new(),
            update_handlers: HandlerTable::new(),
            draw_handlers: HandlerTable::new(),
            queued: HandlerTable::new(),
            pending_create: BTreeSet::new(),
            graveyard: BTreeMap::new(),
            room: None,
            clock: GameClock::new(),
            config,
            state: LoopState::Stopped,
            frames: None,
            pending_frame: None,
            input: None,
            hooks: RenderHooks::new(),
        }
    }

    /// Install the host's frame service; required by [`Game::start`]
    pub fn set_frame_scheduler(&mut self, frames: impl FrameScheduler + 'static) {
        self.frames = Some(Box::new(frames));
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    pub fn resources(&self) -> &ResourceRegistry {
        &self.resources
    }

    /// Register a sprite under `name`
    pub fn add_sprite(&mut self, name: impl Into<String>, sprite: impl SpriteInfo + 'static) -> ResourceId {
        self.resources
            .create(name, ResourceKind::Sprite(Rc::new(sprite)))
    }

    /// Id of the first sprite registered under `name`
    pub fn sprite_named(&self, name: &str) -> Option<ResourceId> {
        self.resources
            .iter()
            .find(|r| r.name == name && matches!(r.kind, ResourceKind::Sprite(_)))
            .map(|r| r.id)
    }

    pub fn room(&self, id: ResourceId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn room_mut(&mut self, id: ResourceId) -> Option<&mut Room> {
        self.rooms.get_mut(&id)
    }

    pub fn current_room_id(&self) -> Option<ResourceId> {
        self.room
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.room.and_then(|id| self.rooms.get(&id))
    }

    pub fn current_room_mut(&mut self) -> Option<&mut Room> {
        self.room.and_then(|id| self.rooms.get_mut(&id))
    }

    /// Live instance by id, in whichever room owns it
    pub fn instance(&self, id: ResourceId) -> Option<&Instance> {
        let room = self.resources.room_of(id)?;
        self.rooms.get(&room)?.all.get(&id)
    }

    pub fn instance_mut(&mut self, id: ResourceId) -> Option<&mut Instance> {
        let room = self.resources.room_of(id)?;
        self.rooms.get_mut(&room)?.all.get_mut(&id)
    }

    /// Live instances of the current room, in creation order
    pub fn current_instances(&self) -> impl Iterator<Item = &Instance> {
        self.current_room().into_iter().flat_map(Room::instance_get_all)
    }

    /// Ids of the current room's live instances, for loops that mutate the game
    pub fn current_instance_ids(&self) -> Vec<ResourceId> {
        self.current_instances().map(Instance::id).collect()
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn hooks_mut(&mut self) -> &mut RenderHooks {
        &mut self.hooks
    }

    /// Device managers, once [`Game::init_input`] has run
    pub fn input(&self) -> Option<&InputManagers> {
        self.input.as_ref()
    }

    pub fn input_mut(&mut self) -> Option<&mut InputManagers> {
        self.input.as_mut()
    }

    /// Destroyed instances whose `on_destroy` has not run yet
    pub fn pending_destroy_count(&self) -> usize {
        self.graveyard.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Behavior;
    use sprig_core::Sprite;

    struct Plain;
    impl Behavior for Plain {}

    #[test]
    fn test_games_are_independent() {
        let mut a = Game::new();
        let mut b = Game::new();
        let ra = a.add_room("a");
        let rb = b.add_room("b");
        a.change_room(ra);
        b.change_room(rb);
        let ia = a.instance_create(0.0, 0.0, Plain).unwrap();
        assert!(a.instance(ia).is_some());
        assert_eq!(b.current_instances().count(), 0);
    }

    #[test]
    fn test_sprite_lookup_by_name() {
        let mut game = Game::new();
        let room = game.add_room("shared");
        let spr = game.add_sprite("shared", Sprite::new(4.0, 4.0, 1));
        assert_eq!(game.sprite_named("shared"), Some(spr));
        assert_ne!(game.sprite_named("shared"), Some(room));
        assert_eq!(game.sprite_named("missing"), None);
    }

    #[test]
    fn test_instance_lookup_follows_owner_room() {
        let mut game = Game::new();
        let first = game.add_room("first");
        let second = game.add_room("second");
        let id = game.room_instance_add(second, 1.0, 2.0, Plain).unwrap();
        game.change_room(first);
        assert!(game.instance(id).is_some());
        assert_eq!(game.current_instances().count(), 0);
        assert_eq!(game.instance(id).unwrap().room(), second);
    }
}
