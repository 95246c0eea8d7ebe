//! Demo objects available to room files: `wall`, `ball`, `spawner`
//!
//! They exist to exercise the runtime from the command line. Every one of
//! them reports its lifecycle into a shared [`DemoStats`].

use sprig_core::ResourceId;
use sprig_runtime::{Behavior, Game, Instance, ObjectLibrary};
use std::cell::Cell;
use std::rc::Rc;

/// Counters shared by all demo objects
#[derive(Debug, Default)]
pub struct DemoStats {
    pub creates: Cell<u32>,
    pub destroys: Cell<u32>,
    pub bounces: Cell<u32>,
}

impl DemoStats {
    fn bump(counter: &Cell<u32>) {
        counter.set(counter.get() + 1);
    }
}

/// Build the object library, wired to `stats`
pub fn library(stats: &Rc<DemoStats>) -> ObjectLibrary {
    let mut lib = ObjectLibrary::new();
    let s = stats.clone();
    lib.register("wall", move || Wall { stats: s.clone() });
    let s = stats.clone();
    lib.register("ball", move || Ball { stats: s.clone() });
    let s = stats.clone();
    lib.register("spawner", move || Spawner {
        stats: s.clone(),
        interval: 30,
        steps: 0,
    });
    lib
}

/// Static solid
pub struct Wall {
    stats: Rc<DemoStats>,
}

impl Behavior for Wall {
    fn on_create(&mut self, game: &mut Game, me: ResourceId) {
        DemoStats::bump(&self.stats.creates);
        game.with_instance(me, |i| i.solid = true);
    }

    fn on_destroy(&mut self, _game: &mut Game, _me: &Instance) {
        DemoStats::bump(&self.stats.destroys);
    }
}

/// Moves diagonally and bounces off solids and the room edges
pub struct Ball {
    stats: Rc<DemoStats>,
}

impl Behavior for Ball {
    fn on_create(&mut self, game: &mut Game, me: ResourceId) {
        DemoStats::bump(&self.stats.creates);
        game.with_instance(me, |i| {
            if i.speed == 0.0 {
                i.motion_set(45.0, 4.0);
            }
        });
    }

    fn on_step_begin(&mut self, game: &mut Game, me: ResourceId) {
        let Some((x, y, hspeed, vspeed)) = game.instance(me).map(|i| (i.x, i.y, i.hspeed, i.vspeed))
        else {
            return;
        };
        let (width, height) = game
            .current_room()
            .map_or((f64::MAX, f64::MAX), |r| (r.width as f64, r.height as f64));

        let flip_h = !(0.0..width).contains(&(x + hspeed)) || !game.place_free(me, x + hspeed, y);
        let flip_v = !(0.0..height).contains(&(y + vspeed)) || !game.place_free(me, x, y + vspeed);
        if flip_h || flip_v {
            DemoStats::bump(&self.stats.bounces);
            game.with_instance(me, |i| {
                if flip_h {
                    i.set_hspeed(-hspeed);
                }
                if flip_v {
                    i.set_vspeed(-vspeed);
                }
            });
        }
    }

    fn on_destroy(&mut self, _game: &mut Game, _me: &Instance) {
        DemoStats::bump(&self.stats.destroys);
    }
}

/// Emits a short-lived spark every `interval` steps
pub struct Spawner {
    stats: Rc<DemoStats>,
    interval: u32,
    steps: u32,
}

impl Behavior for Spawner {
    fn on_create(&mut self, _game: &mut Game, _me: ResourceId) {
        DemoStats::bump(&self.stats.creates);
    }

    fn on_step(&mut self, game: &mut Game, me: ResourceId) {
        self.steps += 1;
        if self.steps % self.interval != 0 {
            return;
        }
        let Some((x, y)) = game.instance(me).map(|i| (i.x, i.y)) else {
            return;
        };
        let spark = Spark {
            stats: self.stats.clone(),
            direction: f64::from(self.steps / self.interval * 47 % 360),
            life: self.interval,
        };
        game.instance_create(x, y, spark);
    }

    fn on_destroy(&mut self, _game: &mut Game, _me: &Instance) {
        DemoStats::bump(&self.stats.destroys);
    }
}

/// Flies off in a fixed direction and destroys itself when its life runs out
pub struct Spark {
    stats: Rc<DemoStats>,
    direction: f64,
    life: u32,
}

impl Behavior for Spark {
    fn on_create(&mut self, game: &mut Game, me: ResourceId) {
        DemoStats::bump(&self.stats.creates);
        let direction = self.direction;
        game.with_instance(me, |i| {
            i.motion_set(direction, 3.0);
            i.friction = 0.05;
        });
    }

    fn on_step(&mut self, game: &mut Game, me: ResourceId) {
        self.life = self.life.saturating_sub(1);
        if self.life == 0 {
            game.instance_destroy(me);
        }
    }

    fn on_destroy(&mut self, _game: &mut Game, _me: &Instance) {
        DemoStats::bump(&self.stats.destroys);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_core::Sprite;

    #[test]
    fn test_library_has_demo_objects() {
        let stats = Rc::new(DemoStats::default());
        let lib = library(&stats);
        assert_eq!(lib.names().collect::<Vec<_>>(), vec!["ball", "spawner", "wall"]);
    }

    #[test]
    fn test_ball_bounces_off_wall() {
        let stats = Rc::new(DemoStats::default());
        let lib = library(&stats);
        let mut game = Game::new();
        let block = game.add_sprite("block", Sprite::new(10.0, 10.0, 1));
        let room = game.add_room("r");
        let wall = game
            .room_instance_add_object(room, 30.0, 0.0, lib.build("wall").unwrap())
            .unwrap();
        let ball = game
            .room_instance_add_object(room, 10.0, 0.0, lib.build("ball").unwrap())
            .unwrap();
        for id in [wall, ball] {
            game.with_instance(id, |i| i.sprite_index = Some(block));
        }
        game.with_instance(ball, |i| {
            i.hspeed = 6.0;
            i.speed = 6.0;
        });

        game.change_room(room);
        for _ in 0..3 {
            game.update();
        }
        assert_eq!(stats.creates.get(), 2);
        assert!(stats.bounces.get() >= 1);
        assert!(game.instance(ball).unwrap().hspeed < 0.0);
    }

    #[test]
    fn test_spawner_sparks_live_and_die() {
        let stats = Rc::new(DemoStats::default());
        let lib = library(&stats);
        let mut game = Game::new();
        let room = game.add_room("r");
        game.room_instance_add_object(room, 100.0, 100.0, lib.build("spawner").unwrap());
        game.change_room(room);

        // Spark born on step 30, dies on its 30th step
        for _ in 0..62 {
            game.update();
        }
        assert_eq!(stats.creates.get(), 3);
        assert_eq!(stats.destroys.get(), 1);
        assert_eq!(game.current_instances().count(), 2);
    }
}
