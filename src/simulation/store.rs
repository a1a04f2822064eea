use rand::Rng;

use crate::config::RippleConfig;
use crate::simulation::ripple::{Point, Ripple};

/// Bounded collection of active ripples in admission order
#[derive(Debug, Default)]
pub struct RippleStore {
    ripples: Vec<Ripple>,
}

impl RippleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a ripple at `center` if below `config.max_active`.
    ///
    /// The maximum radius is `max_size` jittered uniformly by `size_jitter`.
    /// At capacity the call is a no-op and returns false.
    pub fn try_admit<R: Rng + ?Sized>(
        &mut self,
        center: Point,
        config: &RippleConfig,
        rng: &mut R,
    ) -> bool {
        if self.ripples.len() >= config.max_active {
            log::trace!(
                "Ripple at ({:.1}, {:.1}) dropped, {} active",
                center.x,
                center.y,
                self.ripples.len()
            );
            return false;
        }

        let jitter = if config.size_jitter.is_finite() {
            config.size_jitter.max(0.0)
        } else {
            0.0
        };
        let max_radius = config.max_size + rng.gen_range(-jitter..=jitter);
        self.ripples.push(Ripple::new(center, max_radius));
        log::trace!(
            "Ripple admitted at ({:.1}, {:.1}), max radius {:.1}",
            center.x,
            center.y,
            max_radius
        );
        true
    }

    /// Drop expired ripples in place, keeping the survivors' order
    pub fn evict_expired(&mut self) {
        self.ripples.retain(|ripple| !ripple.is_expired());
    }

    pub fn count(&self) -> usize {
        self.ripples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }

    pub fn clear(&mut self) {
        self.ripples.clear();
    }

    pub fn all(&self) -> &[Ripple] {
        &self.ripples
    }

    pub(crate) fn all_mut(&mut self) -> &mut [Ripple] {
        &mut self.ripples
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, ripple: Ripple) {
        self.ripples.push(ripple);
    }
}
