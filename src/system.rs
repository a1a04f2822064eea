use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::RippleConfig;
use crate::render::{ConnectionRenderer, LineSurface};
use crate::simulation::{self, CooldownGate, Point, Ripple, RippleStore};

/// A host object ripples can be anchored to
pub trait Entity {
    /// Stable identity, used to key per-entity cooldowns
    fn id(&self) -> u64;
    fn position(&self) -> Point;
}

/// Ripple admission, simulation and connection rendering behind one handle.
///
/// Per frame the host calls the admission methods, then [`tick`](Self::tick),
/// then [`render`](Self::render). Configuration changes take effect on the
/// next tick or render.
pub struct RippleSystem {
    config: RippleConfig,
    store: RippleStore,
    renderer: ConnectionRenderer,
    cooldowns: CooldownGate,
    rng: StdRng,
}

impl RippleSystem {
    pub fn new(config: RippleConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic size jitter, for tests and reproducible runs
    pub fn with_seed(config: RippleConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: RippleConfig, rng: StdRng) -> Self {
        Self {
            config: config.sanitized(),
            store: RippleStore::new(),
            renderer: ConnectionRenderer::new(),
            cooldowns: CooldownGate::new(),
            rng,
        }
    }

    // ---- Create ----

    /// Admit one ripple at `(x, y)`; false if at capacity
    pub fn create_ripple(&mut self, x: f32, y: f32) -> bool {
        self.store
            .try_admit(Point::new(x, y), &self.config, &mut self.rng)
    }

    pub fn create_ripple_at_entity<E: Entity + ?Sized>(&mut self, entity: Option<&E>) -> bool {
        match entity {
            Some(entity) => {
                let pos = entity.position();
                self.create_ripple(pos.x, pos.y)
            }
            None => false,
        }
    }

    /// Admit at the entity's position unless it was admitted within `cooldown_ms`.
    ///
    /// `now_ms` is milliseconds since start-up. An entity with no recorded
    /// admission is measured from zero, so calls within the first
    /// `cooldown_ms` are rejected. The entity's timestamp is recorded whenever
    /// the cooldown has elapsed, even if the store is full and the admission
    /// itself is dropped.
    pub fn create_ripple_with_cooldown<E: Entity + ?Sized>(
        &mut self,
        entity: Option<&E>,
        now_ms: u64,
        cooldown_ms: u64,
    ) -> bool {
        let Some(entity) = entity else {
            return false;
        };
        if !self.cooldowns.try_pass(entity.id(), now_ms, cooldown_ms) {
            return false;
        }
        self.create_ripple_at_entity(Some(entity))
    }

    /// Drop the cooldown record of an entity the host no longer tracks
    pub fn forget_entity(&mut self, entity_id: u64) {
        self.cooldowns.forget(entity_id);
    }

    /// Admit `count` ripples evenly spaced on a circle around `(x, y)`.
    /// Returns how many were admitted before the cap was hit.
    pub fn create_ripple_circle(&mut self, x: f32, y: f32, count: usize, radius: f32) -> usize {
        let center = Point::new(x, y);
        (0..count)
            .filter(|&i| {
                let angle = (i as f32 / count as f32) * TAU;
                let at = center.offset_polar(angle, radius);
                self.create_ripple(at.x, at.y)
            })
            .count()
    }

    // ---- Update ----

    pub fn tick(&mut self) {
        simulation::tick(&mut self.store, &self.config);
    }

    /// Draw connectors for the current state; returns the number of segments
    pub fn render<S: LineSurface + ?Sized>(&mut self, surface: &mut S) -> usize {
        self.renderer.render(&self.store, &self.config, surface)
    }

    pub fn tick_and_render<S: LineSurface + ?Sized>(&mut self, surface: &mut S) -> usize {
        self.tick();
        self.render(surface)
    }

    // ---- Configure ----

    pub fn set_max_active(&mut self, count: usize) {
        self.config.set_max_active(count);
        log::debug!("max_active = {}", self.config.max_active);
    }

    pub fn set_growth_rate(&mut self, rate: f32) {
        self.config.set_growth_rate(rate);
        log::debug!("growth_rate = {}", self.config.growth_rate);
    }

    pub fn set_max_size(&mut self, size: f32) {
        self.config.set_max_size(size);
        log::debug!("max_size = {}", self.config.max_size);
    }

    pub fn set_size_jitter(&mut self, jitter: f32) {
        self.config.set_size_jitter(jitter);
        log::debug!("size_jitter = {}", self.config.size_jitter);
    }

    pub fn set_color(&mut self, color: u8) {
        self.config.set_color(color);
        log::debug!("color = {}", self.config.color);
    }

    pub fn set_connection_distance(&mut self, distance: f32) {
        self.config.set_connection_distance(distance);
        log::debug!("connection_distance = {}", self.config.connection_distance);
    }

    // ---- Info ----

    pub fn active_count(&self) -> usize {
        self.store.count()
    }

    pub fn clear_all(&mut self) {
        log::debug!("Clearing {} ripples", self.store.count());
        self.store.clear();
    }

    pub fn ripples(&self) -> &[Ripple] {
        self.store.all()
    }

    pub fn config(&self) -> &RippleConfig {
        &self.config
    }
}
