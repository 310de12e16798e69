//! Spinning triangle, buffered variant
//!
//! Same window and triangle as the immediate variant. It also uploads a
//! static three-vertex position buffer at startup. A missing Vulkan loader
//! exits with code 2.
//!
//! Usage: `triangle_buffered [config.toml|config.ron]`

use std::path::PathBuf;
use triangle_engine::app::{self, Variant};

fn main() {
    // RUST_LOG overrides the default level
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let status = app::run_with_config_path(Variant::Buffered, config_path.as_deref());

    log::info!("Exiting with code {}", status.code());
    std::process::exit(status.code());
}
