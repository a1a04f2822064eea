use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================
// Ripple Geometry
// ============================================

/// Number of points sampled around each ripple's boundary
pub const SAMPLE_COUNT: usize = 50;

/// Ripples at or below this opacity contribute no points to the connection pass
pub const VISIBILITY_FLOOR: f32 = 0.2;

/// Averaged opacity a point pair must exceed before a connector is drawn
pub const LINE_OPACITY_FLOOR: f32 = 0.25;

/// Smallest value accepted for growth rate and maximum size
pub const MIN_POSITIVE: f32 = 1e-3;

// ============================================
// Admission Helpers
// ============================================

/// Default per-entity cooldown between admissions (milliseconds)
pub const DEFAULT_COOLDOWN_MS: u64 = 500;

/// Default number of ripples placed by a circle admission
pub const DEFAULT_CIRCLE_COUNT: usize = 3;

/// Default distance of circle-admitted ripples from the circle center
pub const DEFAULT_CIRCLE_RADIUS: f32 = 20.0;

// ============================================
// Ripple Defaults
// ============================================

pub const DEFAULT_MAX_ACTIVE: usize = 4;
pub const DEFAULT_GROWTH_RATE: f32 = 0.6;
pub const DEFAULT_MAX_SIZE: f32 = 60.0;
pub const DEFAULT_SIZE_JITTER: f32 = 5.0;
pub const DEFAULT_COLOR: u8 = 8;
pub const DEFAULT_CONNECTION_DISTANCE: f32 = 20.0;

// ============================================
// Canvas / Host
// ============================================

/// Logical canvas size; ripple coordinates live in this space
pub const CANVAS_WIDTH: u32 = 160;
pub const CANVAS_HEIGHT: u32 = 120;

/// Window pixels per canvas unit
pub const CANVAS_SCALE: u32 = 4;

/// Simulation ticks per second
pub const TICK_HZ: u32 = 30;

/// 16-entry arcade palette, RGBA in [0, 1]. Index 0 is transparent.
pub const PALETTE: [[f32; 4]; 16] = [
    [0.000, 0.000, 0.000, 0.0],
    [1.000, 1.000, 1.000, 1.0],
    [1.000, 0.129, 0.129, 1.0],
    [1.000, 0.576, 0.769, 1.0],
    [1.000, 0.506, 0.208, 1.0],
    [1.000, 0.965, 0.035, 1.0],
    [0.141, 0.612, 0.639, 1.0],
    [0.471, 0.863, 0.322, 1.0],
    [0.000, 0.247, 0.678, 1.0],
    [0.529, 0.949, 1.000, 1.0],
    [0.557, 0.180, 0.769, 1.0],
    [0.643, 0.514, 0.624, 1.0],
    [0.361, 0.251, 0.424, 1.0],
    [0.898, 0.804, 0.769, 1.0],
    [0.569, 0.275, 0.239, 1.0],
    [0.000, 0.000, 0.000, 1.0],
];

/// RGBA for a palette index; indices wrap modulo the palette size
pub fn palette_rgba(index: u8) -> [f32; 4] {
    PALETTE[index as usize % PALETTE.len()]
}

/// Tunables shared by admission, simulation and rendering.
///
/// Fields are public for construction and deserialization. Runtime changes
/// should go through the setters, which clamp out-of-range input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Admission cap
    pub max_active: usize,
    /// Radius increase per tick
    pub growth_rate: f32,
    /// Base maximum radius before jitter
    pub max_size: f32,
    /// Half-width of the uniform jitter applied to `max_size`
    pub size_jitter: f32,
    /// Palette index for connectors
    pub color: u8,
    /// Maximum separation between two points for a connector
    pub connection_distance: f32,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            max_active: DEFAULT_MAX_ACTIVE,
            growth_rate: DEFAULT_GROWTH_RATE,
            max_size: DEFAULT_MAX_SIZE,
            size_jitter: DEFAULT_SIZE_JITTER,
            color: DEFAULT_COLOR,
            connection_distance: DEFAULT_CONNECTION_DISTANCE,
        }
    }
}

impl RippleConfig {
    pub fn set_max_active(&mut self, count: usize) {
        if count < 1 {
            log::warn!("max_active {} clamped to 1", count);
        }
        self.max_active = count.max(1);
    }

    pub fn set_growth_rate(&mut self, rate: f32) {
        self.growth_rate = clamp_at_least("growth_rate", rate, MIN_POSITIVE, self.growth_rate);
    }

    pub fn set_max_size(&mut self, size: f32) {
        self.max_size = clamp_at_least("max_size", size, MIN_POSITIVE, self.max_size);
    }

    pub fn set_size_jitter(&mut self, jitter: f32) {
        self.size_jitter = clamp_at_least("size_jitter", jitter, 0.0, self.size_jitter);
    }

    pub fn set_color(&mut self, color: u8) {
        self.color = color;
    }

    pub fn set_connection_distance(&mut self, distance: f32) {
        self.connection_distance =
            clamp_at_least("connection_distance", distance, 0.0, self.connection_distance);
    }

    /// Run every field through its setter so file-loaded values obey the same ranges.
    /// Non-finite fields fall back to their defaults.
    pub fn sanitized(self) -> Self {
        let mut clean = RippleConfig {
            color: self.color,
            ..Default::default()
        };
        clean.set_max_active(self.max_active);
        clean.set_growth_rate(self.growth_rate);
        clean.set_max_size(self.max_size);
        clean.set_size_jitter(self.size_jitter);
        clean.set_connection_distance(self.connection_distance);
        clean
    }
}

fn clamp_at_least(name: &str, value: f32, min: f32, current: f32) -> f32 {
    if !value.is_finite() {
        log::warn!("{} = {} is not finite, keeping {}", name, value, current);
        return current;
    }
    if value < min {
        log::warn!("{} = {} clamped to {}", name, value, min);
        return min;
    }
    value
}

/// Host canvas and timing settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    /// Window pixels per canvas unit
    pub scale: u32,
    /// Simulation ticks per second
    pub tick_hz: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            scale: CANVAS_SCALE,
            tick_hz: TICK_HZ,
        }
    }
}

/// Top-level settings file: `[canvas]` and `[ripples]` tables, both optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    pub ripples: RippleConfig,
}

impl AppConfig {
    /// Load settings from a TOML file. Ripple tunables are clamped on load.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        let config = Self::from_toml_str(&contents).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let mut config: AppConfig = toml::from_str(contents)?;
        config.ripples = config.ripples.sanitized();
        config.canvas.scale = config.canvas.scale.max(1);
        config.canvas.tick_hz = config.canvas.tick_hz.max(1);
        Ok(config)
    }
}

/// Errors from loading a settings file
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
    Parse {
        path: PathBuf,
        error: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, error } => {
                write!(f, "failed to read {}: {}", path.display(), error)
            }
            ConfigError::Parse { path, error } => {
                write!(f, "failed to parse {}: {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { error, .. } => Some(error),
            ConfigError::Parse { error, .. } => Some(error),
        }
    }
}
