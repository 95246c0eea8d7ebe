//! Room files and loop settings
//!
//! A room file is TOML:
//!
//! ```toml
//! name = "level1"
//! speed = 60
//! background_color = 0x202040
//!
//! [loop]
//! max_updates_per_tick = 5
//!
//! [sprites.block]
//! width = 16.0
//! height = 16.0
//!
//! [[instances]]
//! object = "wall"
//! x = 32.0
//! y = 64.0
//! sprite = "block"
//! solid = true
//! ```
//!
//! Object names resolve through an [`ObjectLibrary`] supplied by the game.

use crate::game::Game;
use crate::instance::{Behavior, Object};
use crate::room::{Background, Tile, View, MAX_BACKGROUNDS, MAX_VIEWS};
use serde::{Deserialize, Serialize};
use sprig_core::{Color, ResourceId, Result, SprigError, Sprite};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info};

/// Scheduler settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Cap on fixed updates per tick. When reached the remaining backlog is
    /// dropped. `None` catches up without limit.
    #[serde(default)]
    pub max_updates_per_tick: Option<u32>,
}

/// A background layer placed in slot `index`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundConfig {
    pub index: usize,
    #[serde(flatten)]
    pub layer: Background,
}

/// A view placed in slot `index`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    pub index: usize,
    #[serde(flatten)]
    pub view: View,
}

/// One design-time instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    pub object: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Name of a sprite declared in the same file
    #[serde(default)]
    pub sprite: Option<String>,
    #[serde(default)]
    pub solid: bool,
    #[serde(default)]
    pub persistent: bool,
    #[serde(default)]
    pub depth: i32,
}

/// Top-level room file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    pub name: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Fixed updates per second
    #[serde(default = "default_speed")]
    pub speed: u32,
    #[serde(default)]
    pub persistent: bool,
    /// `0xRRGGBB`
    #[serde(default)]
    pub background_color: Option<u32>,
    #[serde(default)]
    pub views_enabled: bool,
    #[serde(default, rename = "loop")]
    pub loop_config: LoopConfig,
    #[serde(default)]
    pub sprites: BTreeMap<String, Sprite>,
    #[serde(default)]
    pub backgrounds: Vec<BackgroundConfig>,
    #[serde(default)]
    pub views: Vec<ViewConfig>,
    #[serde(default)]
    pub tiles: Vec<Tile>,
    #[serde(default)]
    pub instances: Vec<InstanceConfig>,
}

fn default_width() -> u32 {
    640
}
fn default_height() -> u32 {
    480
}
fn default_speed() -> u32 {
    30
}

impl RoomConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a room file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), room = %config.name, "room file loaded");
        Ok(config)
    }

    /// Check the file against `objects` without building anything
    pub fn validate(&self, objects: &ObjectLibrary) -> Result<()> {
        if self.speed == 0 {
            return Err(SprigError::InvalidConfig(format!(
                "room '{}': speed must be at least 1",
                self.name
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(SprigError::InvalidConfig(format!(
                "room '{}': size {}x{} is empty",
                self.name, self.width, self.height
            )));
        }
        if let Some(bg) = self.backgrounds.iter().find(|b| b.index >= MAX_BACKGROUNDS) {
            return Err(SprigError::InvalidConfig(format!(
                "background index {} out of range (max {})",
                bg.index,
                MAX_BACKGROUNDS - 1
            )));
        }
        if let Some(view) = self.views.iter().find(|v| v.index >= MAX_VIEWS) {
            return Err(SprigError::InvalidConfig(format!(
                "view index {} out of range (max {})",
                view.index,
                MAX_VIEWS - 1
            )));
        }
        for inst in &self.instances {
            if !objects.contains(&inst.object) {
                return Err(SprigError::UnknownObject(inst.object.clone()));
            }
            if let Some(sprite) = &inst.sprite {
                if !self.sprites.contains_key(sprite) {
                    return Err(SprigError::InvalidConfig(format!(
                        "instance of '{}' uses undeclared sprite '{}'",
                        inst.object, sprite
                    )));
                }
            }
        }
        Ok(())
    }
}

type Constructor = Box<dyn Fn() -> Object>;

/// Object name → behavior constructor
#[derive(Default)]
pub struct ObjectLibrary {
    constructors: BTreeMap<String, Constructor>,
}

impl ObjectLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`; a second registration replaces the first
    pub fn register<B: Behavior>(&mut self, name: impl Into<String>, ctor: impl Fn() -> B + 'static) {
        self.constructors
            .insert(name.into(), Box::new(move || Object::new(ctor())));
    }

    pub fn build(&self, name: &str) -> Option<Object> {
        self.constructors.get(name).map(|ctor| ctor())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for ObjectLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.constructors.keys()).finish()
    }
}

impl Game {
    /// Build a room from its file description.
    ///
    /// Sprites are registered, layers copied and instances placed with
    /// [`Game::room_instance_add_object`]; the room is not entered. Fails
    /// before touching the game if the file does not validate.
    pub fn load_room(&mut self, config: &RoomConfig, objects: &ObjectLibrary) -> Result<ResourceId> {
        config.validate(objects)?;

        let sprites: HashMap<&str, ResourceId> = config
            .sprites
            .iter()
            .map(|(name, sprite)| (name.as_str(), self.add_sprite(name.clone(), sprite.clone())))
            .collect();

        let id = self.add_room(config.name.clone());
        let room = self
            .room_mut(id)
            .ok_or_else(|| SprigError::RoomNotFound(config.name.clone()))?;
        room.width = config.width;
        room.height = config.height;
        room.room_speed = config.speed;
        room.persistent = config.persistent;
        room.views_enabled = config.views_enabled;
        if let Some(hex) = config.background_color {
            room.background_color = Color::from_hex(hex);
        }
        for bg in &config.backgrounds {
            room.set_background(bg.index, bg.layer.clone());
        }
        for view in &config.views {
            room.set_view(view.index, view.view.clone());
        }
        for tile in &config.tiles {
            room.tile_add(tile.clone());
        }

        for inst in &config.instances {
            let object = objects
                .build(&inst.object)
                .ok_or_else(|| SprigError::UnknownObject(inst.object.clone()))?;
            let Some(iid) = self.room_instance_add_object(id, inst.x, inst.y, object) else {
                continue;
            };
            let sprite = inst.sprite.as_deref().and_then(|s| sprites.get(s).copied());
            let Some(live) = self.rooms.get_mut(&id).and_then(|r| r.all.get_mut(&iid)) else {
                continue;
            };
            live.sprite_index = sprite;
            live.solid = inst.solid;
            live.persistent = inst.persistent;
            live.depth = inst.depth;
            live.bbox = live.get_bbox(&self.resources);
        }

        info!(
            room = %config.name,
            instances = config.instances.len(),
            tiles = config.tiles.len(),
            "room built"
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_core::Aabb;

    struct Wall;
    impl Behavior for Wall {}

    struct Ball;
    impl Behavior for Ball {}

    fn library() -> ObjectLibrary {
        let mut lib = ObjectLibrary::new();
        lib.register("wall", || Wall);
        lib.register("ball", || Ball);
        lib
    }

    const ROOM: &str = r#"
        name = "arena"
        width = 320
        height = 240
        speed = 60
        background_color = 0x102030

        [loop]
        max_updates_per_tick = 4

        [sprites.block]
        width = 16.0
        height = 16.0

        [[backgrounds]]
        index = 1
        visible = true
        image = "sky"

        [[views]]
        index = 0
        visible = true
        wview = 320.0
        hview = 240.0

        [[tiles]]
        background = "ground"
        x = 0.0
        y = 224.0
        depth = 10

        [[instances]]
        object = "wall"
        x = 0.0
        y = 0.0
        sprite = "block"
        solid = true

        [[instances]]
        object = "ball"
        x = 100.0
        y = 50.0
        persistent = true
    "#;

    #[test]
    fn test_parse_room_file() {
        let config = RoomConfig::from_toml_str(ROOM).unwrap();
        assert_eq!(config.name, "arena");
        assert_eq!(config.speed, 60);
        assert_eq!(config.loop_config.max_updates_per_tick, Some(4));
        assert_eq!(config.backgrounds[0].index, 1);
        assert_eq!(config.backgrounds[0].layer.image.as_deref(), Some("sky"));
        assert!(config.backgrounds[0].layer.htiled);
        assert_eq!(config.tiles[0].depth, 10);
        assert_eq!(config.instances.len(), 2);
        assert!(config.validate(&library()).is_ok());
    }

    #[test]
    fn test_defaults_for_minimal_file() {
        let config = RoomConfig::from_toml_str("name = \"empty\"").unwrap();
        assert_eq!((config.width, config.height, config.speed), (640, 480, 30));
        assert_eq!(config.loop_config, LoopConfig::default());
        assert!(config.instances.is_empty());
    }

    #[test]
    fn test_parse_error() {
        let err = RoomConfig::from_toml_str("name = ").unwrap_err();
        assert!(matches!(err, SprigError::TomlParseError(_)));
    }

    #[test]
    fn test_validate_rejects_bad_files() {
        let lib = library();

        let mut config = RoomConfig::from_toml_str(ROOM).unwrap();
        config.instances[0].object = "dragon".into();
        assert!(matches!(config.validate(&lib), Err(SprigError::UnknownObject(name)) if name == "dragon"));

        let mut config = RoomConfig::from_toml_str(ROOM).unwrap();
        config.speed = 0;
        assert!(matches!(config.validate(&lib), Err(SprigError::InvalidConfig(_))));

        let mut config = RoomConfig::from_toml_str(ROOM).unwrap();
        config.views[0].index = MAX_VIEWS;
        assert!(matches!(config.validate(&lib), Err(SprigError::InvalidConfig(_))));

        let mut config = RoomConfig::from_toml_str(ROOM).unwrap();
        config.instances[1].sprite = Some("ghost".into());
        assert!(matches!(config.validate(&lib), Err(SprigError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_room_builds_everything() {
        let config = RoomConfig::from_toml_str(ROOM).unwrap();
        let mut game = Game::new();
        let id = game.load_room(&config, &library()).unwrap();

        let room = game.room(id).unwrap();
        assert_eq!(room.name, "arena");
        assert_eq!(room.room_speed, 60);
        assert_eq!(room.background_color.to_hex(), 0x102030);
        assert!(room.background(1).unwrap().visible);
        assert_eq!(room.view(0).unwrap().wview, 320.0);
        assert_eq!(room.tiles().len(), 1);
        assert_eq!(room.instance_count(), 2);

        // Built, not entered
        assert_eq!(game.current_room_id(), None);

        let insts: Vec<_> = room.instance_get_all().collect();
        assert!(insts[0].is::<Wall>());
        assert!(insts[0].solid);
        assert_eq!(insts[0].bbox, Aabb::new(0.0, 0.0, 16.0, 16.0));
        assert!(insts[1].is::<Ball>());
        assert!(insts[1].persistent);
        assert_eq!(insts[1].bbox, Aabb::point(100.0, 50.0));
        assert!(game.sprite_named("block").is_some());
    }

    #[test]
    fn test_load_room_invalid_leaves_game_untouched() {
        let mut config = RoomConfig::from_toml_str(ROOM).unwrap();
        config.instances[0].object = "dragon".into();
        let mut game = Game::new();
        assert!(game.load_room(&config, &library()).is_err());
        assert!(game.resources().is_empty());
    }

    #[test]
    fn test_library_names() {
        let lib = library();
        assert_eq!(lib.names().collect::<Vec<_>>(), vec!["ball", "wall"]);
        assert!(lib.build("wall").is_some_and(|o| o.kind().is::<Wall>()));
        assert!(lib.build("nope").is_none());
    }
}
