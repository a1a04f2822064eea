//! Ripple Net
//!
//! Click to drop ripples; nearby ring points are joined into a plexus.

mod app;
mod gpu;

use clap::Parser;
use winit::event_loop::{ControlFlow, EventLoop};

use ripple_net::config::AppConfig;
use ripple_net::RippleSystem;

use crate::app::App;

/// Expanding ripples drawn as a connection network
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<String>,

    /// Override the maximum number of active ripples
    #[arg(long)]
    max_active: Option<usize>,

    /// Override the palette index used for connectors
    #[arg(long)]
    color: Option<u8>,

    /// Seed for ripple size jitter (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::warn!("{}, using defaults", e);
                AppConfig::default()
            }
        },
        None => AppConfig::default(),
    };

    if let Some(max_active) = args.max_active {
        config.ripples.set_max_active(max_active);
    }
    if let Some(color) = args.color {
        config.ripples.set_color(color);
    }

    log::info!(
        "Up to {} ripples, speed {}, size {}, connection distance {}",
        config.ripples.max_active,
        config.ripples.growth_rate,
        config.ripples.max_size,
        config.ripples.connection_distance
    );

    let system = match args.seed {
        Some(seed) => RippleSystem::with_seed(config.ripples, seed),
        None => RippleSystem::new(config.ripples),
    };

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(system, config.canvas);
    event_loop.run_app(&mut app).expect("Event loop failed");
}
