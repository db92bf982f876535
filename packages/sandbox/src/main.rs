//! Headless driver for the physics engine.
//!
//! Builds one of a few canned scenarios from a settings file, runs it for a
//! fixed number of ticks, and logs what moved.

#[macro_use]
extern crate tracing;

mod logging;
mod settings;
mod scenario;

use crate::{
    logging::{
        init_logging,
        LOG_FILE_NAME,
    },
    settings::{
        Settings,
        Dimension,
        SETTINGS_FILE_NAME,
    },
    scenario::{
        build_2d,
        build_3d,
    },
};
use physics::{
    Space,
    Bodies,
    engine_tick_with_stats,
};
use std::{
    env::args,
    path::Path,
    process::exit,
};
use anyhow::*;


const CLI_HELP: &'static str = r#"Physics sandbox.

Examples:

    [this command]
    Run the scenario described by settings.json, creating it if missing.

    [this command] path/to/settings.json
    Run the scenario described by another settings file.

    [this command] --no-log-file
    Log to stdout only, without writing a log file.

Env var examples:
    RUST_LOG=physics=trace
    Changes logging levels"#;


fn main() {
    let args = args().skip(1).collect::<Vec<_>>();
    if args.iter().any(|arg| arg == "--help") {
        println!("{}", CLI_HELP);
        return;
    }
    let log_file = if args.iter().any(|arg| arg == "--no-log-file") {
        None
    } else {
        Some(Path::new(LOG_FILE_NAME))
    };
    if let Err(e) = init_logging(log_file) {
        eprintln!("{:?}", e);
        exit(1);
    }
    let path = args.iter()
        .find(|arg| !arg.starts_with("--"))
        .map(String::as_str)
        .unwrap_or(SETTINGS_FILE_NAME);
    if let Err(e) = run_from_settings(Path::new(path)) {
        error!("{:?}", e);
        exit(1);
    }
}

// load settings, persist them if new, and run the chosen scenario
fn run_from_settings(path: &Path) -> Result<()> {
    let existed = path.exists();
    let settings = Settings::load(path)?;
    if !existed {
        settings.write(path)
            .with_context(|| format!("unable to write settings to {}", path.display()))?;
        info!(path=%path.display(), "wrote default settings");
    }
    info!(dimension=?settings.dimension, scenario=?settings.scenario, ticks=settings.ticks, "starting simulation");

    match settings.dimension {
        Dimension::Two => {
            let bodies = build_2d(settings.scenario, &settings.engine)?;
            simulate(&settings, bodies);
        }
        Dimension::Three => {
            let bodies = build_3d(settings.scenario, &settings.engine)?;
            simulate(&settings, bodies);
        }
    }
    Ok(())
}

// run the tick loop to completion and log the final state
fn simulate<S: Space>(settings: &Settings, mut bodies: Bodies<S>) {
    let mut collisions = 0;
    for tick in 0..settings.ticks {
        let (moved, stats) = engine_tick_with_stats(
            &settings.engine,
            &mut bodies,
            settings.frame_time,
            settings.fps,
        );
        collisions += stats.collisions;
        for id in moved {
            if let Some(body) = bodies.get(id) {
                trace!(tick, ?id, pos=?body.pos, "moved");
            }
        }
    }

    info!(ticks=settings.ticks, collisions, "simulation finished");
    for (id, body) in bodies.iter() {
        match body.physics() {
            Some(phys) => info!(
                ?id,
                pos=?body.pos,
                velocity=?phys.velocity,
                rotation=?phys.rotation,
                pending_spin=?phys.pending_spin(),
                "final state",
            ),
            None => info!(?id, pos=?body.pos, "final state"),
        }
    }
}
