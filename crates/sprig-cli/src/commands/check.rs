//! Room file validation command

use crate::demo::{self, DemoStats};
use anyhow::{Context, Result};
use sprig_runtime::RoomConfig;
use std::path::Path;
use std::rc::Rc;

pub fn run(path: &str) -> Result<()> {
    let config = RoomConfig::load(Path::new(path)).with_context(|| format!("loading room file {}", path))?;
    let objects = demo::library(&Rc::new(DemoStats::default()));

    if let Err(e) = config.validate(&objects) {
        println!("{}: {}", path, e);
        println!("Known objects: {}", objects.names().collect::<Vec<_>>().join(", "));
        anyhow::bail!("room file is invalid");
    }

    println!(
        "{}: room '{}' is valid ({}x{}, speed {})",
        path, config.name, config.width, config.height, config.speed
    );
    println!(
        "  {} instance(s), {} sprite(s), {} tile(s), {} background(s), {} view(s)",
        config.instances.len(),
        config.sprites.len(),
        config.tiles.len(),
        config.backgrounds.len(),
        config.views.len()
    );
    Ok(())
}
