mod cooldown;
mod ripple;
mod simulator;
mod store;

pub use cooldown::CooldownGate;
pub use ripple::{opacity_at, sample_circle, Point, Ripple};
pub use simulator::{advance, tick};
pub use store::RippleStore;
