//! Bounding boxes and spatial predicates
//!
//! Every query is a linear scan of one room's live instances, O(n) per call.
//! Other instances are tested with their cached `bbox`; the querying instance
//! is tested with a box computed at the hypothetical position. Tests are
//! discrete, so a fast mover can pass straight through a thin solid.

use crate::game::Game;
use crate::instance::{Behavior, Instance};
use sprig_core::{Aabb, ResourceId, ResourceRegistry};

/// Box `inst` would occupy at `(x, y)`.
///
/// Uses the mask sprite if one is set, otherwise the display sprite. With
/// neither resolvable the box is the 1×1 pixel at `(x, y)`.
pub fn bbox_at(resources: &ResourceRegistry, inst: &Instance, x: f64, y: f64) -> Aabb {
    let Some(sprite) = inst
        .mask_index
        .or(inst.sprite_index)
        .and_then(|id| resources.sprite(id))
    else {
        return Aabb::point(x, y);
    };
    let left = x - sprite.xoffset() * inst.image_xscale;
    let top = y - sprite.yoffset() * inst.image_yscale;
    Aabb::from_corners(
        left,
        top,
        left + sprite.width() * inst.image_xscale,
        top + sprite.height() * inst.image_yscale,
    )
}

impl Game {
    /// First live, active instance other than `id` in `id`'s room whose
    /// cached box overlaps `id`'s box at `(x, y)` and that passes `filter`
    fn scan_at(
        &self,
        id: ResourceId,
        x: f64,
        y: f64,
        filter: impl Fn(&Instance) -> bool,
    ) -> Option<ResourceId> {
        let room = self.rooms.get(&self.resources.room_of(id)?)?;
        let me = room.all.get(&id)?;
        let candidate = bbox_at(&self.resources, me, x, y);
        room.all
            .values()
            .filter(|other| other.id() != id && other.active && filter(other))
            .find(|other| other.bbox.overlaps(&candidate))
            .map(Instance::id)
    }

    /// The instance of kind `B` that `id` would touch at `(x, y)`, if any
    pub fn instance_place<B: Behavior>(&self, id: ResourceId, x: f64, y: f64) -> Option<ResourceId> {
        self.scan_at(id, x, y, |other| other.is::<B>())
    }

    /// Would `id` touch an instance of kind `B` at `(x, y)`?
    pub fn place_meeting<B: Behavior>(&self, id: ResourceId, x: f64, y: f64) -> bool {
        self.instance_place::<B>(id, x, y).is_some()
    }

    /// Is `(x, y)` clear of solid instances for `id`?
    pub fn place_free(&self, id: ResourceId, x: f64, y: f64) -> bool {
        self.scan_at(id, x, y, |other| other.solid).is_none()
    }

    /// Is `(x, y)` clear of every instance for `id`?
    pub fn place_empty(&self, id: ResourceId, x: f64, y: f64) -> bool {
        self.scan_at(id, x, y, |_| true).is_none()
    }

    /// Move by `(dx, dy)` if the destination is free of solids.
    ///
    /// All or nothing: a blocked move leaves the instance where it was.
    /// Returns true when blocked. The cached bbox is left for the next STEP.
    pub fn move_contact_solid(&mut self, id: ResourceId, dx: f64, dy: f64) -> bool {
        let Some((x, y)) = self.instance(id).map(|i| (i.x + dx, i.y + dy)) else {
            return true;
        };
        if !self.place_free(id, x, y) {
            return true;
        }
        if let Some(inst) = self.instance_mut(id) {
            inst.x = x;
            inst.y = y;
        }
        false
    }

    /// Does the point lie inside `id`'s cached box?
    pub fn point_in_instance(&self, id: ResourceId, px: f64, py: f64) -> bool {
        self.instance(id)
            .is_some_and(|inst| inst.bbox.contains_point(px, py))
    }

    /// Do the cached boxes of `a` and `b` overlap? False if either is gone.
    pub fn instances_collide(&self, a: ResourceId, b: ResourceId) -> bool {
        match (self.instance(a), self.instance(b)) {
            (Some(a), Some(b)) => a.active && b.active && a.bbox.overlaps(&b.bbox),
            _ => false,
        }
    }

    /// Is there an active instance of kind `B` at the point, in the current room?
    pub fn position_meeting<B: Behavior>(&self, px: f64, py: f64) -> bool {
        self.current_instances()
            .any(|inst| inst.active && inst.is::<B>() && inst.bbox.contains_point(px, py))
    }

    /// First active instance of kind `B` in the current room overlapping
    /// `rect`, skipping `exclude`
    pub fn collision_rectangle<B: Behavior>(
        &self,
        rect: Aabb,
        exclude: Option<ResourceId>,
    ) -> Option<ResourceId> {
        self.current_instances()
            .filter(|inst| inst.active && inst.is::<B>() && Some(inst.id()) != exclude)
            .find(|inst| inst.bbox.overlaps(&rect))
            .map(Instance::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_core::Sprite;

    struct Block;
    impl Behavior for Block {}

    struct Mover;
    impl Behavior for Mover {}

    struct Setup {
        game: Game,
        tile: ResourceId,
    }

    fn setup() -> Setup {
        let mut game = Game::new();
        let tile = game.add_sprite("tile", Sprite::new(10.0, 10.0, 1));
        let room = game.add_room("test");
        game.change_room(room);
        Setup { game, tile }
    }

    fn spawn<B: Behavior>(s: &mut Setup, x: f64, y: f64, behavior: B, solid: bool) -> ResourceId {
        let tile = s.tile;
        let id = s.game.instance_create(x, y, behavior).unwrap();
        s.game.with_instance(id, |i| {
            i.sprite_index = Some(tile);
            i.solid = solid;
        });
        // Cached boxes are refreshed by STEP
        s.game.update();
        id
    }

    #[test]
    fn test_sprite_bbox() {
        let mut s = setup();
        let id = spawn(&mut s, 5.0, 7.0, Mover, false);
        let inst = s.game.instance(id).unwrap();
        let bbox = inst.get_bbox(s.game.resources());
        assert_eq!(bbox, Aabb::new(5.0, 7.0, 15.0, 17.0));
        assert_eq!(inst.bbox, bbox);
    }

    #[test]
    fn test_bbox_offset_and_negative_scale() {
        let mut s = setup();
        let centered = s.game.add_sprite("centered", Sprite::new(10.0, 10.0, 1).with_offset(5.0, 5.0));
        let id = s.game.instance_create(20.0, 20.0, Mover).unwrap();
        s.game.with_instance(id, |i| {
            i.sprite_index = Some(centered);
            i.image_xscale = -2.0;
        });
        let bbox = s.game.instance(id).unwrap().get_bbox(s.game.resources());
        assert_eq!(bbox, Aabb::new(10.0, 15.0, 30.0, 25.0));
    }

    #[test]
    fn test_mask_overrides_sprite() {
        let mut s = setup();
        let wide = s.game.add_sprite("wide", Sprite::new(40.0, 2.0, 1));
        let id = spawn(&mut s, 0.0, 0.0, Mover, false);
        s.game.with_instance(id, |i| i.mask_index = Some(wide));
        let bbox = s.game.instance(id).unwrap().get_bbox(s.game.resources());
        assert_eq!(bbox, Aabb::new(0.0, 0.0, 40.0, 2.0));
    }

    #[test]
    fn test_missing_sprite_degenerates_to_pixel() {
        let mut s = setup();
        let id = s.game.instance_create(3.0, 4.0, Mover).unwrap();
        s.game.with_instance(id, |i| i.sprite_index = Some(ResourceId(9999)));
        let bbox = s.game.instance(id).unwrap().get_bbox(s.game.resources());
        assert_eq!(bbox, Aabb::point(3.0, 4.0));
    }

    #[test]
    fn test_move_contact_solid() {
        let mut s = setup();
        let mover = spawn(&mut s, 0.0, 0.0, Mover, false);
        spawn(&mut s, 20.0, 0.0, Block, true);

        assert!(!s.game.move_contact_solid(mover, 5.0, 0.0));
        assert_eq!(s.game.instance(mover).unwrap().x, 5.0);

        assert!(s.game.move_contact_solid(mover, 10.0, 0.0));
        assert_eq!(s.game.instance(mover).unwrap().x, 5.0);
    }

    #[test]
    fn test_place_free_ignores_self() {
        let mut s = setup();
        let me = spawn(&mut s, 0.0, 0.0, Block, true);
        assert!(s.game.place_free(me, 0.0, 0.0));
        assert!(s.game.place_empty(me, 0.0, 0.0));
        assert!(!s.game.place_meeting::<Block>(me, 0.0, 0.0));
    }

    #[test]
    fn test_place_queries_filter() {
        let mut s = setup();
        let me = spawn(&mut s, 0.0, 0.0, Mover, false);
        let soft = spawn(&mut s, 30.0, 0.0, Block, false);
        spawn(&mut s, 60.0, 0.0, Mover, true);

        // Non-solid block: occupied but free
        assert!(s.game.place_free(me, 25.0, 0.0));
        assert!(!s.game.place_empty(me, 25.0, 0.0));
        assert!(s.game.place_meeting::<Block>(me, 25.0, 0.0));
        assert_eq!(s.game.instance_place::<Block>(me, 25.0, 0.0), Some(soft));
        assert!(!s.game.place_meeting::<Mover>(me, 25.0, 0.0));

        // Solid mover
        assert!(!s.game.place_free(me, 55.0, 0.0));
        assert!(s.game.place_meeting::<Mover>(me, 55.0, 0.0));

        // Touching edges only
        assert!(s.game.place_empty(me, 20.0, 0.0));
    }

    #[test]
    fn test_inactive_instances_are_invisible_to_queries() {
        let mut s = setup();
        let me = spawn(&mut s, 0.0, 0.0, Mover, false);
        let wall = spawn(&mut s, 10.0, 0.0, Block, true);
        assert!(!s.game.place_free(me, 5.0, 0.0));
        s.game.with_instance(wall, |i| i.active = false);
        assert!(s.game.place_free(me, 5.0, 0.0));
        assert!(!s.game.instances_collide(me, wall));
    }

    #[test]
    fn test_queries_on_destroyed_instance() {
        let mut s = setup();
        let me = spawn(&mut s, 0.0, 0.0, Mover, false);
        let other = spawn(&mut s, 5.0, 5.0, Mover, true);
        s.game.instance_destroy(me);
        assert!(s.game.place_free(me, 5.0, 5.0));
        assert!(!s.game.place_meeting::<Mover>(me, 5.0, 5.0));
        assert!(s.game.move_contact_solid(me, 1.0, 0.0));
        assert!(!s.game.instances_collide(me, other));
        assert!(!s.game.point_in_instance(me, 0.0, 0.0));
    }

    #[test]
    fn test_cached_box_lags_until_step() {
        let mut s = setup();
        let me = spawn(&mut s, 0.0, 0.0, Mover, false);
        s.game.with_instance(me, |i| i.x = 100.0);
        assert!(s.game.point_in_instance(me, 5.0, 5.0));
        assert!(!s.game.point_in_instance(me, 105.0, 5.0));
        s.game.update();
        assert!(s.game.point_in_instance(me, 105.0, 5.0));
    }

    #[test]
    fn test_point_and_rectangle_queries() {
        let mut s = setup();
        let a = spawn(&mut s, 0.0, 0.0, Block, false);
        let b = spawn(&mut s, 5.0, 5.0, Block, false);
        assert!(s.game.instances_collide(a, b));
        assert!(s.game.position_meeting::<Block>(12.0, 12.0));
        assert!(!s.game.position_meeting::<Mover>(12.0, 12.0));
        assert_eq!(
            s.game.collision_rectangle::<Block>(Aabb::new(0.0, 0.0, 20.0, 20.0), Some(a)),
            Some(b)
        );
        assert_eq!(
            s.game.collision_rectangle::<Block>(Aabb::new(50.0, 50.0, 60.0, 60.0), None),
            None
        );
    }
}
