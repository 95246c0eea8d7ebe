//! Rooms: the live instance set of one level plus its layer data
//!
//! Backgrounds, views and tiles are plain records kept for the renderer. The
//! runtime stores and edits them but never reads them back.

use crate::game::Game;
use crate::instance::{Behavior, Instance, Object};
use serde::{Deserialize, Serialize};
use sprig_core::{Color, ResourceId, ResourceKind};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Background layers per room
pub const MAX_BACKGROUNDS: usize = 8;
/// Views per room
pub const MAX_VIEWS: usize = 8;

/// One background layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Background {
    pub visible: bool,
    /// Drawn above instances instead of below
    pub foreground: bool,
    /// Name of the image resource; the renderer resolves it
    pub image: Option<String>,
    pub x: f64,
    pub y: f64,
    pub htiled: bool,
    pub vtiled: bool,
    pub xscale: f64,
    pub yscale: f64,
    pub hspeed: f64,
    pub vspeed: f64,
    pub blend: Color,
    pub alpha: f64,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            visible: false,
            foreground: false,
            image: None,
            x: 0.0,
            y: 0.0,
            htiled: true,
            vtiled: true,
            xscale: 1.0,
            yscale: 1.0,
            hspeed: 0.0,
            vspeed: 0.0,
            blend: Color::WHITE,
            alpha: 1.0,
        }
    }
}

/// A camera: the room region `view` shown in the screen region `port`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct View {
    pub visible: bool,
    pub xview: f64,
    pub yview: f64,
    pub wview: f64,
    pub hview: f64,
    pub xport: f64,
    pub yport: f64,
    pub wport: f64,
    pub hport: f64,
    pub angle: f64,
    /// Margin kept around the followed object
    pub hborder: f64,
    pub vborder: f64,
    /// Follow speed limit; negative means unlimited
    pub hspeed: f64,
    pub vspeed: f64,
    /// Name of the object kind the view follows
    pub object: Option<String>,
}

impl Default for View {
    fn default() -> Self {
        Self {
            visible: false,
            xview: 0.0,
            yview: 0.0,
            wview: 640.0,
            hview: 480.0,
            xport: 0.0,
            yport: 0.0,
            wport: 640.0,
            hport: 480.0,
            angle: 0.0,
            hborder: 32.0,
            vborder: 32.0,
            hspeed: -1.0,
            vspeed: -1.0,
            object: None,
        }
    }
}

/// A rectangle cut from a background image and placed in the room
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tile {
    /// Assigned by [`Room::tile_add`]
    #[serde(skip)]
    pub id: u32,
    pub background: String,
    /// Source rectangle within the background image
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Placement in the room
    pub x: f64,
    pub y: f64,
    pub depth: i32,
    pub xscale: f64,
    pub yscale: f64,
    pub alpha: f64,
    pub blend: Color,
    pub visible: bool,
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            id: 0,
            background: String::new(),
            left: 0.0,
            top: 0.0,
            width: 16.0,
            height: 16.0,
            x: 0.0,
            y: 0.0,
            depth: 1_000_000,
            xscale: 1.0,
            yscale: 1.0,
            alpha: 1.0,
            blend: Color::WHITE,
            visible: true,
        }
    }
}

impl Tile {
    /// Does the placed tile cover the point?
    pub fn covers(&self, px: f64, py: f64) -> bool {
        sprig_core::Aabb::from_corners(
            self.x,
            self.y,
            self.x + self.width * self.xscale,
            self.y + self.height * self.yscale,
        )
        .contains_point(px, py)
    }
}

pub struct Room {
    id: ResourceId,
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Fixed updates per second while this room is current
    pub room_speed: u32,
    pub persistent: bool,
    pub background_color: Color,
    pub show_background_color: bool,
    pub views_enabled: bool,
    backgrounds: [Background; MAX_BACKGROUNDS],
    views: [View; MAX_VIEWS],
    tiles: Vec<Tile>,
    next_tile_id: u32,
    /// Live instances; ids are monotonic so this is creation order
    pub(crate) all: BTreeMap<ResourceId, Instance>,
}

impl Room {
    pub fn new(id: ResourceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            width: 640,
            height: 480,
            room_speed: 30,
            persistent: false,
            background_color: Color::BLACK,
            show_background_color: true,
            views_enabled: false,
            backgrounds: Default::default(),
            views: Default::default(),
            tiles: Vec::new(),
            next_tile_id: 1,
            all: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Live instances in creation order
    pub fn instance_get_all(&self) -> impl Iterator<Item = &Instance> {
        self.all.values()
    }

    pub fn instance_get(&self, id: ResourceId) -> Option<&Instance> {
        self.all.get(&id)
    }

    pub fn instance_count(&self) -> usize {
        self.all.len()
    }

    pub fn contains(&self, id: ResourceId) -> bool {
        self.all.contains_key(&id)
    }

    // Backgrounds and views

    pub fn background(&self, index: usize) -> Option<&Background> {
        self.backgrounds.get(index)
    }

    pub fn background_mut(&mut self, index: usize) -> Option<&mut Background> {
        self.backgrounds.get_mut(index)
    }

    /// Replace layer `index`; false when out of range
    pub fn set_background(&mut self, index: usize, background: Background) -> bool {
        match self.backgrounds.get_mut(index) {
            Some(slot) => {
                *slot = background;
                true
            }
            None => false,
        }
    }

    pub fn view(&self, index: usize) -> Option<&View> {
        self.views.get(index)
    }

    pub fn view_mut(&mut self, index: usize) -> Option<&mut View> {
        self.views.get_mut(index)
    }

    /// Replace view `index`; false when out of range
    pub fn set_view(&mut self, index: usize, view: View) -> bool {
        match self.views.get_mut(index) {
            Some(slot) => {
                *slot = view;
                true
            }
            None => false,
        }
    }

    // Tiles

    /// Add a tile and return its id
    pub fn tile_add(&mut self, mut tile: Tile) -> u32 {
        tile.id = self.next_tile_id;
        self.next_tile_id += 1;
        let id = tile.id;
        self.tiles.push(tile);
        id
    }

    pub fn tile_delete(&mut self, id: u32) -> bool {
        let before = self.tiles.len();
        self.tiles.retain(|t| t.id != id);
        self.tiles.len() != before
    }

    pub fn tile_exists(&self, id: u32) -> bool {
        self.tiles.iter().any(|t| t.id == id)
    }

    pub fn tile_get(&self, id: u32) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub fn tile_get_mut(&mut self, id: u32) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|t| t.id == id)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Visible tile covering the point: the one nearest the viewer when
    /// `foreground`, otherwise the one furthest back. Ties go to the oldest.
    pub fn tile_find(&self, x: f64, y: f64, foreground: bool) -> Option<u32> {
        let hits = self.tiles.iter().filter(|t| t.visible && t.covers(x, y));
        let pick = if foreground {
            hits.min_by_key(|t| (t.depth, t.id))
        } else {
            hits.max_by_key(|t| (t.depth, std::cmp::Reverse(t.id)))
        };
        pick.map(|t| t.id)
    }

    /// Remove every tile at `depth`; returns how many went
    pub fn tile_layer_delete(&mut self, depth: i32) -> usize {
        let before = self.tiles.len();
        self.tiles.retain(|t| t.depth != depth);
        before - self.tiles.len()
    }

    pub fn tile_layer_shift(&mut self, depth: i32, dx: f64, dy: f64) {
        for tile in self.tiles.iter_mut().filter(|t| t.depth == depth) {
            tile.x += dx;
            tile.y += dy;
        }
    }

    pub fn tile_layer_hide(&mut self, depth: i32) {
        self.set_layer_visible(depth, false);
    }

    pub fn tile_layer_show(&mut self, depth: i32) {
        self.set_layer_visible(depth, true);
    }

    fn set_layer_visible(&mut self, depth: i32, visible: bool) {
        for tile in self.tiles.iter_mut().filter(|t| t.depth == depth) {
            tile.visible = visible;
        }
    }
}

impl std::fmt::Debug for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &(self.width, self.height))
            .field("room_speed", &self.room_speed)
            .field("instances", &self.all.len())
            .field("tiles", &self.tiles.len())
            .finish()
    }
}

impl Game {
    /// Create an empty room with default settings
    pub fn add_room(&mut self, name: impl Into<String>) -> ResourceId {
        let name = name.into();
        let id = self.resources.create(name.clone(), ResourceKind::Room);
        self.rooms.insert(id, Room::new(id, name));
        id
    }

    /// Place an instance in `room` at design time.
    ///
    /// Nothing is registered and no CREATE is queued; that happens when the
    /// room is entered.
    pub fn room_instance_add<B: Behavior>(
        &mut self,
        room: ResourceId,
        x: f64,
        y: f64,
        behavior: B,
    ) -> Option<ResourceId> {
        self.room_instance_add_object(room, x, y, Object::new(behavior))
    }

    pub fn room_instance_add_object(
        &mut self,
        room: ResourceId,
        x: f64,
        y: f64,
        object: Object,
    ) -> Option<ResourceId> {
        self.insert_instance(room, x, y, object)
    }

    /// Register the bindings of every live instance of `room` and queue a
    /// CREATE for each, in creation order
    pub(crate) fn register_all_instances(&mut self, room: ResourceId) {
        let ids: Vec<ResourceId> = match self.rooms.get(&room) {
            Some(r) => r.all.keys().copied().collect(),
            None => return,
        };
        debug!(%room, count = ids.len(), "registering room instances");
        for id in ids {
            self.register_instance(id);
            self.enqueue_create(id);
        }
    }

    /// Go to `room`, taking the current room's persistent instances along.
    ///
    /// Carried instances keep their state and get a CREATE in the new room
    /// like everyone else there.
    pub fn room_goto(&mut self, room: ResourceId) -> bool {
        if !self.rooms.contains_key(&room) {
            warn!(%room, "room_goto to unknown room ignored");
            return false;
        }
        if let Some(from) = self.room.filter(|&from| from != room) {
            let carried: Vec<ResourceId> = self.rooms.get(&from).map_or_else(Vec::new, |r| {
                r.all
                    .values()
                    .filter(|i| i.persistent)
                    .map(Instance::id)
                    .collect()
            });
            for id in &carried {
                let Some(mut inst) = self.rooms.get_mut(&from).and_then(|r| r.all.remove(id)) else {
                    continue;
                };
                inst.set_room(room);
                if let Some(res) = self.resources.find_mut(*id) {
                    res.kind = ResourceKind::Instance { room };
                }
                if let Some(target) = self.rooms.get_mut(&room) {
                    target.all.insert(*id, inst);
                }
            }
            if !carried.is_empty() {
                info!(%from, to = %room, count = carried.len(), "carried persistent instances");
            }
        }
        self.change_room(room)
    }
}
