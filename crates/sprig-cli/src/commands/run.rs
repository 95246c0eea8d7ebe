//! Headless room simulation

use crate::demo::{self, DemoStats};
use anyhow::{Context, Result};
use sprig_runtime::{Game, ManualFrames, RoomConfig};
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use tracing::info;

pub struct RunArgs {
    pub room: String,
    pub frames: u32,
    pub frame_ms: f64,
    pub max_updates: Option<u32>,
}

pub fn run(args: RunArgs) -> Result<()> {
    let config = RoomConfig::load(Path::new(&args.room))
        .with_context(|| format!("loading room file {}", args.room))?;

    let mut loop_config = config.loop_config.clone();
    if args.max_updates.is_some() {
        loop_config.max_updates_per_tick = args.max_updates;
    }

    let stats = Rc::new(DemoStats::default());
    let objects = demo::library(&stats);

    let mut game = Game::with_config(loop_config);
    game.set_frame_scheduler(ManualFrames::new());
    let room = game.load_room(&config, &objects)?;

    let sprites_drawn = Rc::new(Cell::new(0u64));
    let counter = sprites_drawn.clone();
    game.hooks_mut()
        .set_draw_sprite_ext(move |_| counter.set(counter.get() + 1));

    game.start(room)?;

    let mut updates = 0u64;
    let mut now = 0.0;
    for _ in 0..args.frames {
        updates += u64::from(game.tick(now));
        now += args.frame_ms;
    }
    game.stop();

    info!(frames = args.frames, updates, "simulation finished");

    println!("Room '{}' after {} frame(s) at {} ms:", config.name, args.frames, args.frame_ms);
    println!("  updates:        {}", updates);
    println!("  live instances: {}", game.current_instances().count());
    println!("  creates:        {}", stats.creates.get());
    println!("  destroys:       {}", stats.destroys.get());
    println!("  bounces:        {}", stats.bounces.get());
    println!("  sprites drawn:  {}", sprites_drawn.get());

    Ok(())
}
