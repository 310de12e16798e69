//! Spinning triangle, immediate variant
//!
//! Opens a 640x480 window and draws a rotating red/green/blue triangle until
//! Escape is pressed or the window is closed.
//!
//! Usage: `triangle_immediate [config.toml|config.ron]`

use std::path::PathBuf;
use triangle_engine::app::{self, Variant};

fn main() {
    // RUST_LOG overrides the default level
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let status = app::run_with_config_path(Variant::Immediate, config_path.as_deref());

    log::info!("Exiting with code {}", status.code());
    std::process::exit(status.code());
}
