//! Sprig Runtime - Game loop infrastructure
//!
//! Provides the scheduling and entity-lifecycle core:
//! - `GameClock` - fixed-timestep accumulator fed by host frame timestamps
//! - `EventType` / `Handler` - dispatch categories and identity-comparable callbacks
//! - `Game` - the context object owning the registry, rooms, handler tables and clock
//! - `Instance` / `Behavior` - simulated entities and their user callbacks
//! - `Room` - live instance set plus background, view and tile data
//! - Input device managers and the host hooks (frame scheduling, sprite drawing)
//!
//! Everything is single-threaded. Callbacks receive `&mut Game` and may create
//! or destroy instances, register handlers or change rooms while a dispatch
//! pass is running; see [`Game::update`] for the ordering guarantees.

mod clock;
mod collision;
mod config;
mod event;
mod game;
mod game_loop;
mod host;
mod input;
mod instance;
mod room;

pub use clock::GameClock;
pub use collision::bbox_at;
pub use config::{BackgroundConfig, InstanceConfig, LoopConfig, ObjectLibrary, RoomConfig, ViewConfig};
pub use event::{EventType, Handler, HandlerTable};
pub use game::Game;
pub use game_loop::LoopState;
pub use host::{DrawSpriteExt, FrameHandle, FrameScheduler, ManualFrames, RenderHooks};
pub use input::{GamepadManager, InputDevice, InputManagers, KeyboardManager, MouseManager};
pub use instance::{Behavior, Instance, Object, ObjectKind};
pub use room::{Background, Room, Tile, View, MAX_BACKGROUNDS, MAX_VIEWS};
