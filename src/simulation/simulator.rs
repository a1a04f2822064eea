use crate::config::RippleConfig;
use crate::simulation::ripple::{opacity_at, sample_circle, Ripple};
use crate::simulation::store::RippleStore;

/// Step one ripple: grow, fade, and resample its boundary
pub fn advance(ripple: &mut Ripple, growth_rate: f32) {
    ripple.radius += growth_rate;
    ripple.opacity = opacity_at(ripple.radius, ripple.max_radius());

    if ripple.opacity > 0.0 {
        sample_circle(ripple.center(), ripple.radius, &mut ripple.boundary_points);
    } else {
        ripple.boundary_points.clear();
    }
}

/// Advance every ripple by one tick, then evict the expired ones
pub fn tick(store: &mut RippleStore, config: &RippleConfig) {
    for ripple in store.all_mut() {
        advance(ripple, config.growth_rate);
    }
    store.evict_expired();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SAMPLE_COUNT;
    use crate::simulation::ripple::Point;

    fn config(growth_rate: f32) -> RippleConfig {
        RippleConfig {
            growth_rate,
            ..Default::default()
        }
    }

    #[test]
    fn test_advance_grows_and_samples() {
        let mut ripple = Ripple::new(Point::new(5.0, 5.0), 10.0);
        advance(&mut ripple, 2.0);

        assert_eq!(ripple.radius(), 2.0);
        assert!((ripple.opacity() - 0.96).abs() < 1e-6);
        assert_eq!(ripple.boundary_points().len(), SAMPLE_COUNT);
        assert!((ripple.boundary_points()[0].x - 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_advance_to_expiry_clears_points() {
        let mut ripple = Ripple::new(Point::default(), 4.0);
        advance(&mut ripple, 2.0);
        assert_eq!(ripple.boundary_points().len(), SAMPLE_COUNT);

        advance(&mut ripple, 2.0);
        assert_eq!(ripple.opacity(), 0.0);
        assert!(ripple.boundary_points().is_empty());
    }

    #[test]
    fn test_degenerate_ripple_expires_on_first_tick() {
        let mut store = RippleStore::new();
        store.push(Ripple::new(Point::default(), 0.0));
        store.push(Ripple::new(Point::default(), -3.0));

        tick(&mut store, &config(0.6));

        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_opacity_non_increasing_until_removed() {
        let mut store = RippleStore::new();
        store.push(Ripple::new(Point::default(), 7.3));
        let config = config(0.6);

        let mut last = 1.0;
        let mut ticks = 0;
        while store.count() > 0 {
            tick(&mut store, &config);
            ticks += 1;
            if let Some(ripple) = store.all().first() {
                assert!(ripple.opacity() <= last);
                assert!(ripple.opacity() > 0.0);
                let len = ripple.boundary_points().len();
                assert!(len == 0 || len == SAMPLE_COUNT);
                last = ripple.opacity();
            }
            assert!(ticks < 100, "ripple never expired");
        }
    }

    #[test]
    fn test_nan_growth_rate_expires_ripple() {
        let mut store = RippleStore::new();
        store.push(Ripple::new(Point::default(), 10.0));

        tick(&mut store, &config(f32::NAN));

        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_expires_exactly_at_max_radius() {
        let mut store = RippleStore::new();
        store.push(Ripple::new(Point::default(), 10.0));
        let config = config(1.0);

        for _ in 0..9 {
            tick(&mut store, &config);
            assert_eq!(store.count(), 1);
        }
        tick(&mut store, &config);
        assert_eq!(store.count(), 0);
    }
}
