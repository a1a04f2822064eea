//! Ripple Network
//!
//! Expanding, fading rings anchored to 2D points, drawn as a plexus of
//! short connectors between nearby ring sample points:
//! - Bounded ripple admission with drop-on-full
//! - Fixed-step growth and fade-out
//! - All-pairs proximity pass gated on distance and opacity

pub mod config;
pub mod render;
pub mod simulation;
pub mod system;

pub use config::{AppConfig, RippleConfig};
pub use render::{LineBatch, LineSurface};
pub use simulation::{Point, Ripple};
pub use system::{Entity, RippleSystem};
