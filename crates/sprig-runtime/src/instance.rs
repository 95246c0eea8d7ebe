//! Instances: simulated entities and their lifecycle
//!
//! An instance is created with [`Game::instance_create`] (at runtime) or
//! [`Game::room_instance_add`] (before the room is entered) and ends only with
//! [`Game::instance_destroy`]. While registered it contributes five handlers
//! to the scheduler. The handlers are built once, when the instance is
//! constructed, and the same values are used to unregister it: a freshly
//! built closure would never compare equal.

use crate::collision::bbox_at;
use crate::event::{EventType, Handler};
use crate::game::Game;
use sprig_core::{
    lengthdir_x, lengthdir_y, normalize_degrees, point_direction, point_distance, Aabb, Color,
    ResourceId, ResourceKind, ResourceRegistry,
};
use std::any::{type_name, TypeId};
use std::fmt;
use tracing::{debug, warn};

/// User code attached to an instance.
///
/// Every hook has an empty default except `on_draw`, which draws the
/// instance's own sprite. Hooks receive the game and the instance's id; the
/// instance's fields are reached through [`Game::instance_mut`].
pub trait Behavior: 'static {
    fn on_create(&mut self, _game: &mut Game, _me: ResourceId) {}

    /// Runs once, in the DESTROY phase after [`Game::instance_destroy`]. The
    /// instance is already gone from its room and the registry; `me` is its
    /// final state.
    fn on_destroy(&mut self, _game: &mut Game, _me: &Instance) {}

    fn on_step_begin(&mut self, _game: &mut Game, _me: ResourceId) {}

    /// Runs after the built-in motion/animation update of the STEP phase
    fn on_step(&mut self, _game: &mut Game, _me: ResourceId) {}

    fn on_step_end(&mut self, _game: &mut Game, _me: ResourceId) {}

    fn on_draw(&mut self, game: &mut Game, me: ResourceId) {
        game.draw_self(me);
    }

    fn on_draw_gui(&mut self, _game: &mut Game, _me: ResourceId) {}
}

/// Type identity of an instance's behavior, used to filter queries by kind
#[derive(Clone, Copy)]
pub struct ObjectKind {
    type_id: TypeId,
    name: &'static str,
}

impl ObjectKind {
    pub fn of<B: Behavior>() -> Self {
        let full = type_name::<B>();
        // Strip the module path but keep generic arguments intact
        let base = full.split('<').next().unwrap_or(full);
        let start = base.rfind("::").map_or(0, |i| i + 2);
        Self {
            type_id: TypeId::of::<B>(),
            name: &full[start..],
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<B: Behavior>(&self) -> bool {
        self.type_id == TypeId::of::<B>()
    }
}

impl PartialEq for ObjectKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ObjectKind {}

impl fmt::Debug for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectKind({})", self.name)
    }
}

/// A behavior together with its kind, ready to become an instance
pub struct Object {
    pub(crate) kind: ObjectKind,
    pub(crate) behavior: Box<dyn Behavior>,
}

impl Object {
    pub fn new<B: Behavior>(behavior: B) -> Self {
        Self {
            kind: ObjectKind::of::<B>(),
            behavior: Box::new(behavior),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }
}

/// The five scheduler handlers an instance participates with
#[derive(Clone)]
pub(crate) struct Bindings {
    step_begin: Handler,
    step: Handler,
    step_end: Handler,
    draw: Handler,
    draw_gui: Handler,
}

impl Bindings {
    fn new(id: ResourceId) -> Self {
        let bind = |event: EventType| Handler::new(move |game: &mut Game| game.instance_event(id, event));
        Self {
            step_begin: bind(EventType::StepBegin),
            step: bind(EventType::Step),
            step_end: bind(EventType::StepEnd),
            draw: bind(EventType::Draw),
            draw_gui: bind(EventType::DrawGui),
        }
    }

    pub(crate) fn entries(&self) -> [(EventType, &Handler); 5] {
        [
            (EventType::StepBegin, &self.step_begin),
            (EventType::Step, &self.step),
            (EventType::StepEnd, &self.step_end),
            (EventType::Draw, &self.draw),
            (EventType::DrawGui, &self.draw_gui),
        ]
    }
}

/// One simulated entity
pub struct Instance {
    id: ResourceId,
    room: ResourceId,
    kind: ObjectKind,

    pub x: f64,
    pub y: f64,
    pub xprevious: f64,
    pub yprevious: f64,
    pub xstart: f64,
    pub ystart: f64,
    pub hspeed: f64,
    pub vspeed: f64,
    pub speed: f64,
    /// Degrees, 0 = +x, counter-clockwise on screen
    pub direction: f64,
    pub friction: f64,
    pub gravity: f64,
    pub gravity_direction: f64,

    pub sprite_index: Option<ResourceId>,
    pub image_index: f64,
    pub image_speed: f64,
    pub image_xscale: f64,
    pub image_yscale: f64,
    pub image_angle: f64,
    pub image_alpha: f64,
    pub image_blend: Color,
    pub depth: i32,
    pub visible: bool,

    pub mask_index: Option<ResourceId>,
    pub solid: bool,
    pub persistent: bool,
    pub active: bool,
    /// Refreshed at creation and after every STEP; see [`Instance::get_bbox`]
    /// for the live value
    pub bbox: Aabb,

    pub(crate) behavior: Option<Box<dyn Behavior>>,
    pub(crate) bindings: Bindings,
}

impl Instance {
    pub(crate) fn new(id: ResourceId, room: ResourceId, x: f64, y: f64, object: Object) -> Self {
        Self {
            id,
            room,
            kind: object.kind,
            x,
            y,
            xprevious: x,
            yprevious: y,
            xstart: x,
            ystart: y,
            hspeed: 0.0,
            vspeed: 0.0,
            speed: 0.0,
            direction: 0.0,
            friction: 0.0,
            gravity: 0.0,
            gravity_direction: 270.0,
            sprite_index: None,
            image_index: 0.0,
            image_speed: 1.0,
            image_xscale: 1.0,
            image_yscale: 1.0,
            image_angle: 0.0,
            image_alpha: 1.0,
            image_blend: Color::WHITE,
            depth: 0,
            visible: true,
            mask_index: None,
            solid: false,
            persistent: false,
            active: true,
            bbox: Aabb::point(x, y),
            behavior: Some(object.behavior),
            bindings: Bindings::new(id),
        }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Room that owns this instance
    pub fn room(&self) -> ResourceId {
        self.room
    }

    pub(crate) fn set_room(&mut self, room: ResourceId) {
        self.room = room;
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn is<B: Behavior>(&self) -> bool {
        self.kind.is::<B>()
    }

    /// Bounding box at the current position, computed now
    pub fn get_bbox(&self, resources: &ResourceRegistry) -> Aabb {
        bbox_at(resources, self, self.x, self.y)
    }

    /// Set velocity from a direction and a speed, replacing the current one
    pub fn motion_set(&mut self, direction: f64, speed: f64) {
        self.hspeed = lengthdir_x(speed, direction);
        self.vspeed = lengthdir_y(speed, direction);
        self.speed = speed;
        self.direction = normalize_degrees(direction);
    }

    /// Add a vector to the current velocity
    pub fn motion_add(&mut self, direction: f64, speed: f64) {
        self.hspeed += lengthdir_x(speed, direction);
        self.vspeed += lengthdir_y(speed, direction);
        self.sync_polar();
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.motion_set(self.direction, speed);
    }

    pub fn set_direction(&mut self, direction: f64) {
        self.motion_set(direction, self.speed);
    }

    pub fn set_hspeed(&mut self, hspeed: f64) {
        self.hspeed = hspeed;
        self.sync_polar();
    }

    pub fn set_vspeed(&mut self, vspeed: f64) {
        self.vspeed = vspeed;
        self.sync_polar();
    }

    /// Head for `(x, y)` at `speed` pixels per step
    pub fn move_towards_point(&mut self, x: f64, y: f64, speed: f64) {
        let dir = point_direction(self.x, self.y, x, y);
        self.motion_set(dir, speed);
    }

    pub fn distance_to_point(&self, x: f64, y: f64) -> f64 {
        point_distance(self.x, self.y, x, y)
    }

    /// Recompute speed/direction from the velocity components. Direction
    /// keeps its last value while the instance is at rest.
    fn sync_polar(&mut self) {
        if self.hspeed != 0.0 || self.vspeed != 0.0 {
            self.speed = self.hspeed.hypot(self.vspeed);
            self.direction = normalize_degrees((-self.vspeed).atan2(self.hspeed).to_degrees());
        } else {
            self.speed = 0.0;
        }
    }

    /// The built-in part of the STEP phase, before the behavior's `on_step`
    pub(crate) fn integrate(&mut self, resources: &ResourceRegistry) {
        self.xprevious = self.x;
        self.yprevious = self.y;

        if self.gravity != 0.0 {
            let dir = self.gravity_direction.to_radians();
            self.hspeed += dir.cos() * self.gravity;
            self.vspeed -= dir.sin() * self.gravity;
        }

        if self.friction != 0.0 {
            let magnitude = self.hspeed.hypot(self.vspeed);
            if magnitude > 0.0 {
                let reduced = (magnitude - self.friction).max(0.0);
                let scale = reduced / magnitude;
                self.hspeed *= scale;
                self.vspeed *= scale;
            }
        }

        self.sync_polar();

        self.x += self.hspeed;
        self.y += self.vspeed;

        if let Some(frames) = self
            .sprite_index
            .and_then(|s| resources.sprite(s))
            .map(|s| s.frame_count())
            .filter(|&n| n > 0)
        {
            let n = frames as f64;
            let mut index = (self.image_index + self.image_speed) % n;
            if index < 0.0 {
                index += n;
            }
            self.image_index = index;
        }

        self.bbox = self.get_bbox(resources);
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("room", &self.room)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("hspeed", &self.hspeed)
            .field("vspeed", &self.vspeed)
            .field("solid", &self.solid)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Create an instance in the current room.
    ///
    /// The instance starts taking part in STEP/DRAW dispatch immediately; its
    /// `on_create` is queued for the next CREATE phase. Returns `None` if no
    /// room is current.
    pub fn instance_create<B: Behavior>(&mut self, x: f64, y: f64, behavior: B) -> Option<ResourceId> {
        self.instance_create_object(x, y, Object::new(behavior))
    }

    pub fn instance_create_object(&mut self, x: f64, y: f64, object: Object) -> Option<ResourceId> {
        let Some(room) = self.room else {
            warn!("instance_create({}) with no current room", object.kind.name);
            return None;
        };
        let id = self.insert_instance(room, x, y, object)?;
        self.register_instance(id);
        self.enqueue_create(id);
        debug!(%id, %room, x, y, "instance created");
        Some(id)
    }

    /// Destroy an instance.
    ///
    /// Unregisters its handlers and removes it from its room and the registry
    /// right away; `on_destroy` is queued for the DESTROY phase. Calling this
    /// again with the same id does nothing.
    pub fn instance_destroy(&mut self, id: ResourceId) {
        let Some(room) = self.resources.room_of(id) else {
            return;
        };
        let Some(instance) = self.rooms.get_mut(&room).and_then(|r| r.all.remove(&id)) else {
            return;
        };
        for (event, handler) in instance.bindings.entries() {
            self.unregister(event, handler);
        }
        self.resources.remove(id);
        self.graveyard.insert(id, instance);
        self.register(
            EventType::Destroy,
            Handler::new(move |game: &mut Game| game.run_destroy(id)),
        );
        debug!(%id, %room, "instance destroyed");
    }

    /// Does `id` name a live instance?
    pub fn instance_exists(&self, id: ResourceId) -> bool {
        self.resources.room_of(id).is_some()
    }

    /// Number of live instances of kind `B` in the current room
    pub fn instance_number<B: Behavior>(&self) -> usize {
        self.current_instances().filter(|i| i.is::<B>()).count()
    }

    /// The `n`th live instance of kind `B` in the current room, in creation order
    pub fn instance_find<B: Behavior>(&self, n: usize) -> Option<ResourceId> {
        self.current_instances().filter(|i| i.is::<B>()).nth(n).map(Instance::id)
    }

    /// Closest live instance of kind `B` to `(x, y)`; ties go to the older one
    pub fn instance_nearest<B: Behavior>(&self, x: f64, y: f64) -> Option<ResourceId> {
        let mut best: Option<(f64, ResourceId)> = None;
        for inst in self.current_instances().filter(|i| i.is::<B>()) {
            let d = inst.distance_to_point(x, y);
            if best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, inst.id));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Run `f` against an instance's fields if it is alive
    pub fn with_instance<R>(&mut self, id: ResourceId, f: impl FnOnce(&mut Instance) -> R) -> Option<R> {
        self.instance_mut(id).map(f)
    }

    /// Ask the renderer to draw the instance's sprite with its current
    /// transform. No sprite or no renderer: nothing happens.
    pub fn draw_self(&mut self, id: ResourceId) {
        let Some(inst) = self.instance(id) else {
            return;
        };
        let Some(sprite) = inst.sprite_index else {
            return;
        };
        let args = crate::host::DrawSpriteExt {
            sprite,
            subimg: inst.image_index,
            x: inst.x,
            y: inst.y,
            xscale: inst.image_xscale,
            yscale: inst.image_yscale,
            rotation: inst.image_angle,
            blend: inst.image_blend,
            alpha: inst.image_alpha,
        };
        self.hooks.draw_sprite_ext(&args);
    }

    /// Create the registry entry and put the instance in `room`'s live map,
    /// without touching the scheduler
    pub(crate) fn insert_instance(
        &mut self,
        room: ResourceId,
        x: f64,
        y: f64,
        object: Object,
    ) -> Option<ResourceId> {
        if !self.rooms.contains_key(&room) {
            warn!(%room, "cannot add {} to unknown room", object.kind.name);
            return None;
        }
        let id = self
            .resources
            .create(object.kind.name, ResourceKind::Instance { room });
        let mut instance = Instance::new(id, room, x, y, object);
        instance.bbox = instance.get_bbox(&self.resources);
        self.rooms.get_mut(&room)?.all.insert(id, instance);
        Some(id)
    }

    pub(crate) fn register_instance(&mut self, id: ResourceId) {
        let Some(bindings) = self.instance(id).map(|i| i.bindings.clone()) else {
            return;
        };
        for (event, handler) in bindings.entries() {
            self.register(event, handler.clone());
        }
    }

    /// Queue `on_create` for the next CREATE phase, at most once per instance
    pub(crate) fn enqueue_create(&mut self, id: ResourceId) {
        if self.pending_create.insert(id) {
            self.register(
                EventType::Create,
                Handler::new(move |game: &mut Game| game.run_create(id)),
            );
        }
    }

    /// Runs even when the instance was destroyed before the queue drained
    fn run_create(&mut self, id: ResourceId) {
        if !self.pending_create.remove(&id) {
            return;
        }
        self.with_behavior(id, |behavior, game| behavior.on_create(game, id));
    }

    /// `on_destroy` waits for an outstanding `on_create`
    fn run_destroy(&mut self, id: ResourceId) {
        if self.pending_create.contains(&id) {
            self.register(
                EventType::Destroy,
                Handler::new(move |game: &mut Game| game.run_destroy(id)),
            );
            return;
        }
        let Some(mut instance) = self.graveyard.remove(&id) else {
            return;
        };
        if let Some(mut behavior) = instance.behavior.take() {
            behavior.on_destroy(self, &instance);
        }
    }

    /// Body of the five bound handlers
    pub(crate) fn instance_event(&mut self, id: ResourceId, event: EventType) {
        let Some(room) = self.resources.room_of(id) else {
            return;
        };
        let Some(inst) = self.rooms.get_mut(&room).and_then(|r| r.all.get_mut(&id)) else {
            return;
        };
        if !inst.active {
            return;
        }
        match event {
            EventType::Step => inst.integrate(&self.resources),
            EventType::Draw if !inst.visible => return,
            _ => {}
        }
        self.with_behavior(id, |behavior, game| match event {
            EventType::StepBegin => behavior.on_step_begin(game, id),
            EventType::Step => behavior.on_step(game, id),
            EventType::StepEnd => behavior.on_step_end(game, id),
            EventType::Draw => behavior.on_draw(game, id),
            EventType::DrawGui => behavior.on_draw_gui(game, id),
            _ => {}
        });
    }

    /// Lend the instance's behavior out for one callback.
    ///
    /// The behavior comes from the live instance or, failing that, the
    /// graveyard. It goes back to wherever the instance is afterwards.
    fn with_behavior(&mut self, id: ResourceId, f: impl FnOnce(&mut dyn Behavior, &mut Game)) {
        let mut taken = self.instance_mut(id).and_then(|i| i.behavior.take());
        if taken.is_none() {
            taken = self.graveyard.get_mut(&id).and_then(|i| i.behavior.take());
        }
        let Some(mut behavior) = taken else {
            return;
        };
        f(behavior.as_mut(), self);
        if let Some(inst) = self.instance_mut(id) {
            inst.behavior = Some(behavior);
        } else if let Some(inst) = self.graveyard.get_mut(&id) {
            inst.behavior = Some(behavior);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_core::Sprite;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Plain;
    impl Behavior for Plain {}

    struct Other;
    impl Behavior for Other {}

    type Log = Rc<RefCell<Vec<String>>>;

    struct Logger {
        log: Log,
    }

    impl Behavior for Logger {
        fn on_create(&mut self, _game: &mut Game, me: ResourceId) {
            self.log.borrow_mut().push(format!("create {me}"));
        }

        fn on_destroy(&mut self, _game: &mut Game, me: &Instance) {
            self.log.borrow_mut().push(format!("destroy {}", me.id()));
        }

        fn on_step(&mut self, _game: &mut Game, me: ResourceId) {
            self.log.borrow_mut().push(format!("step {me}"));
        }
    }

    /// Destroys itself on its first step
    struct SelfDestruct {
        log: Log,
    }

    impl Behavior for SelfDestruct {
        fn on_step(&mut self, game: &mut Game, me: ResourceId) {
            game.instance_destroy(me);
            game.instance_destroy(me);
        }

        fn on_destroy(&mut self, _game: &mut Game, _me: &Instance) {
            self.log.borrow_mut().push("destroyed".into());
        }
    }

    /// Creates a `Logger` and destroys it in the same step, once
    struct ShortLived {
        log: Log,
        done: bool,
    }

    impl Behavior for ShortLived {
        fn on_step(&mut self, game: &mut Game, _me: ResourceId) {
            if self.done {
                return;
            }
            self.done = true;
            if let Some(child) = game.instance_create(0.0, 0.0, Logger { log: self.log.clone() }) {
                game.instance_destroy(child);
            }
        }
    }

    fn running_game() -> (Game, ResourceId) {
        let mut game = Game::new();
        let room = game.add_room("test");
        game.change_room(room);
        (game, room)
    }

    fn bare(x: f64, y: f64) -> Instance {
        Instance::new(ResourceId(1), ResourceId(2), x, y, Object::new(Plain))
    }

    #[test]
    fn test_create_initializes_positions() {
        let (mut game, room) = running_game();
        let id = game.instance_create(12.0, 34.0, Plain).unwrap();
        let inst = game.instance(id).unwrap();
        assert_eq!((inst.x, inst.y), (12.0, 34.0));
        assert_eq!((inst.xstart, inst.ystart), (12.0, 34.0));
        assert_eq!((inst.xprevious, inst.yprevious), (12.0, 34.0));
        assert_eq!(inst.room(), room);
        assert!(game.room(room).unwrap().contains(id));
        assert_eq!(game.resources().room_of(id), Some(room));
    }

    #[test]
    fn test_create_without_room_degrades() {
        let mut game = Game::new();
        assert!(game.instance_create(0.0, 0.0, Plain).is_none());
    }

    #[test]
    fn test_create_and_destroy_run_exactly_once() {
        let (mut game, _) = running_game();
        let log: Log = Rc::default();
        let id = game.instance_create(0.0, 0.0, Logger { log: log.clone() }).unwrap();
        assert!(log.borrow().is_empty(), "on_create must be deferred");

        game.update();
        game.instance_destroy(id);
        game.instance_destroy(id);
        assert!(!game.instance_exists(id));
        game.update();
        game.update();

        assert_eq!(
            *log.borrow(),
            vec![format!("create {id}"), format!("step {id}"), format!("destroy {id}")]
        );
    }

    #[test]
    fn test_destroy_before_first_update_still_creates() {
        let (mut game, _) = running_game();
        let log: Log = Rc::default();
        let id = game.instance_create(0.0, 0.0, Logger { log: log.clone() }).unwrap();
        game.instance_destroy(id);
        assert_eq!(game.pending_destroy_count(), 1);

        game.update();
        game.update();

        assert_eq!(*log.borrow(), vec![format!("create {id}"), format!("destroy {id}")]);
        assert_eq!(game.pending_destroy_count(), 0);
    }

    #[test]
    fn test_create_and_destroy_within_one_step() {
        let (mut game, _) = running_game();
        let log: Log = Rc::default();
        game.instance_create(0.0, 0.0, ShortLived { log: log.clone(), done: false })
            .unwrap();

        game.update();
        assert!(log.borrow().is_empty());
        assert_eq!(game.pending_destroy_count(), 1);

        game.update();
        game.update();
        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert!(log[0].starts_with("create "));
        assert!(log[1].starts_with("destroy "));
        assert_eq!(log[0]["create ".len()..], log[1]["destroy ".len()..]);
        assert_eq!(game.pending_destroy_count(), 0);
    }

    #[test]
    fn test_destroy_unregisters_every_binding() {
        let (mut game, _) = running_game();
        let id = game.instance_create(0.0, 0.0, Plain).unwrap();
        let bindings = game.instance(id).unwrap().bindings.clone();
        for (event, handler) in bindings.entries() {
            assert!(game.is_registered(event, handler));
        }
        game.instance_destroy(id);
        for (event, handler) in bindings.entries() {
            assert!(!game.is_registered(event, handler));
        }
    }

    #[test]
    fn test_self_destroy_during_step() {
        let (mut game, _) = running_game();
        let log: Log = Rc::default();
        let id = game.instance_create(0.0, 0.0, SelfDestruct { log: log.clone() }).unwrap();
        game.update();
        assert!(!game.instance_exists(id));
        assert_eq!(*log.borrow(), vec!["destroyed".to_string()]);
        game.update();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_inactive_instance_is_frozen() {
        let (mut game, _) = running_game();
        let log: Log = Rc::default();
        let id = game.instance_create(0.0, 0.0, Logger { log: log.clone() }).unwrap();
        game.with_instance(id, |i| {
            i.active = false;
            i.hspeed = 3.0;
        });
        game.update();
        assert_eq!(game.instance(id).unwrap().x, 0.0);
        assert_eq!(*log.borrow(), vec![format!("create {id}")]);
    }

    #[test]
    fn test_gravity_points_down_at_270() {
        let resources = ResourceRegistry::new();
        let mut inst = bare(0.0, 0.0);
        inst.gravity = 0.5;
        inst.integrate(&resources);
        inst.integrate(&resources);
        assert!(inst.hspeed.abs() < 1e-9);
        assert!((inst.vspeed - 1.0).abs() < 1e-9);
        assert!((inst.y - 1.5).abs() < 1e-9);
        assert!((inst.direction - 270.0).abs() < 1e-9);
        assert_eq!(inst.yprevious, 0.5);
    }

    #[test]
    fn test_friction_stops_without_reversing() {
        let resources = ResourceRegistry::new();
        let mut inst = bare(0.0, 0.0);
        inst.motion_set(180.0, 1.0);
        inst.friction = 0.4;
        inst.integrate(&resources);
        assert!((inst.hspeed + 0.6).abs() < 1e-9);
        inst.integrate(&resources);
        inst.integrate(&resources);
        assert_eq!(inst.hspeed, 0.0);
        assert_eq!(inst.speed, 0.0);
        // Heading is kept at rest
        assert!((inst.direction - 180.0).abs() < 1e-9);
        assert!((inst.x + 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_animation_wraps_both_ways() {
        let mut resources = ResourceRegistry::new();
        let spr = resources.create("spr", ResourceKind::Sprite(Rc::new(Sprite::new(8.0, 8.0, 4))));
        let mut inst = bare(0.0, 0.0);
        inst.sprite_index = Some(spr);
        inst.image_index = 3.0;
        inst.integrate(&resources);
        assert_eq!(inst.image_index, 0.0);

        inst.image_speed = -1.0;
        inst.integrate(&resources);
        assert_eq!(inst.image_index, 3.0);
    }

    #[test]
    fn test_animation_without_sprite_is_unchanged() {
        let resources = ResourceRegistry::new();
        let mut inst = bare(0.0, 0.0);
        inst.image_index = 2.0;
        inst.integrate(&resources);
        assert_eq!(inst.image_index, 2.0);
    }

    #[test]
    fn test_motion_helpers() {
        let mut inst = bare(0.0, 0.0);
        inst.motion_set(90.0, 2.0);
        assert!(inst.hspeed.abs() < 1e-9);
        assert!((inst.vspeed + 2.0).abs() < 1e-9);

        inst.motion_add(0.0, 2.0);
        assert!((inst.speed - 8f64.sqrt()).abs() < 1e-9);
        assert!((inst.direction - 45.0).abs() < 1e-9);

        inst.set_hspeed(0.0);
        assert!((inst.vspeed + 2.0).abs() < 1e-9);
        assert!((inst.direction - 90.0).abs() < 1e-9);
        inst.set_vspeed(0.0);
        assert_eq!(inst.speed, 0.0);
        assert!((inst.direction - 90.0).abs() < 1e-9);

        inst.move_towards_point(-10.0, 0.0, 5.0);
        assert!((inst.hspeed + 5.0).abs() < 1e-9);
        assert!((inst.direction - 180.0).abs() < 1e-9);
        assert_eq!(inst.distance_to_point(3.0, 4.0), 5.0);
    }

    #[test]
    fn test_population_queries() {
        let (mut game, _) = running_game();
        let a = game.instance_create(0.0, 0.0, Plain).unwrap();
        let b = game.instance_create(10.0, 0.0, Plain).unwrap();
        let c = game.instance_create(5.0, 0.0, Other).unwrap();

        assert_eq!(game.instance_number::<Plain>(), 2);
        assert_eq!(game.instance_number::<Other>(), 1);
        assert_eq!(game.instance_find::<Plain>(1), Some(b));
        assert_eq!(game.instance_find::<Plain>(2), None);
        assert_eq!(game.instance_nearest::<Plain>(6.0, 0.0), Some(b));
        assert_eq!(game.instance_nearest::<Other>(100.0, 0.0), Some(c));

        game.instance_destroy(a);
        assert_eq!(game.instance_number::<Plain>(), 1);
        assert_eq!(game.instance_nearest::<Plain>(0.0, 0.0), Some(b));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ObjectKind::of::<Plain>().name(), "Plain");
        assert_eq!(ObjectKind::of::<Plain>(), ObjectKind::of::<Plain>());
        assert_ne!(ObjectKind::of::<Plain>(), ObjectKind::of::<Other>());
        assert!(Object::new(Other).kind().is::<Other>());
    }
}
