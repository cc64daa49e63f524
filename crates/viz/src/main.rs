//! Asteroid viewer
//!
//! Run with: cargo run -p viz
//!
//! Examples:
//!   cargo run -p viz -- --scene data/scene.json
//!   cargo run -p viz -- --config orrery.toml --no-watch
//!   cargo run -p viz -- --print-config > orrery.toml

use bevy::prelude::*;
use clap::Parser;
use focus::{default_config_toml, FocusConfig};
use std::path::PathBuf;
use viz::focus_bridge::FocusSettings;
use viz::scene_loader::SceneSource;
use viz::OrreryPlugin;

/// Asteroid viewer
#[derive(Parser, Debug)]
#[command(name = "viz")]
#[command(about = "3D viewer for asteroid positions and orbits")]
struct Args {
    /// Scene JSON file to display
    #[arg(long, default_value = "data/scene.json")]
    scene: PathBuf,

    /// TOML file with scale, camera, and style settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not reload the scene when the file changes
    #[arg(long)]
    no_watch: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    let args = Args::parse();

    if args.print_config {
        print!("{}", default_config_toml());
        return;
    }

    let config = match args.config {
        Some(ref path) => match FocusConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FocusConfig::default(),
    };

    App::new()
        .insert_resource(SceneSource {
            path: args.scene,
            watch: !args.no_watch,
        })
        .insert_resource(FocusSettings(config))
        .add_plugins(OrreryPlugin)
        .run();
}
