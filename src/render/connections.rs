use crate::config::{RippleConfig, LINE_OPACITY_FLOOR, VISIBILITY_FLOOR};
use crate::render::surface::LineSurface;
use crate::simulation::{Point, RippleStore};

/// Boundary point tagged with its ripple's opacity
#[derive(Clone, Copy, Debug)]
struct TaggedPoint {
    point: Point,
    opacity: f32,
}

/// Draws connectors between nearby boundary points of all visible ripples.
///
/// Every unordered pair of flattened points is tested, so the cost is
/// quadratic in `max_active * SAMPLE_COUNT`. The point list is kept between
/// frames to avoid reallocating it.
#[derive(Debug, Default)]
pub struct ConnectionRenderer {
    points: Vec<TaggedPoint>,
}

impl ConnectionRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue one `draw_line` per qualifying pair and return how many were drawn
    pub fn render<S: LineSurface + ?Sized>(
        &mut self,
        store: &RippleStore,
        config: &RippleConfig,
        surface: &mut S,
    ) -> usize {
        self.points.clear();
        for ripple in store.all() {
            if ripple.opacity() <= VISIBILITY_FLOOR {
                continue;
            }
            let opacity = ripple.opacity();
            self.points.extend(
                ripple
                    .boundary_points()
                    .iter()
                    .map(|&point| TaggedPoint { point, opacity }),
            );
        }

        let max_distance = config.connection_distance;
        if max_distance.is_nan() || max_distance <= 0.0 {
            return 0;
        }
        let max_distance_sq = max_distance * max_distance;

        let mut drawn = 0;
        for (i, a) in self.points.iter().enumerate() {
            for b in &self.points[i + 1..] {
                if a.point.distance_squared(b.point) >= max_distance_sq {
                    continue;
                }
                let line_opacity = (a.opacity + b.opacity) / 2.0;
                if line_opacity > LINE_OPACITY_FLOOR {
                    surface.draw_line(a.point, b.point, config.color);
                    drawn += 1;
                }
            }
        }

        log::trace!("{} points, {} connectors", self.points.len(), drawn);
        drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SAMPLE_COUNT;
    use crate::render::surface::LineBatch;
    use crate::simulation::{advance, Ripple};

    /// Ripple advanced once so that its radius equals `radius`
    fn grown(center: Point, radius: f32, max_radius: f32) -> Ripple {
        let mut ripple = Ripple::new(center, max_radius);
        advance(&mut ripple, radius);
        ripple
    }

    /// Ripple with a hand-placed boundary and opacity
    fn pinned(points: &[Point], opacity: f32) -> Ripple {
        let mut ripple = Ripple::new(points[0], 60.0);
        ripple.boundary_points = points.to_vec();
        ripple.opacity = opacity;
        ripple
    }

    fn store_of(ripples: Vec<Ripple>) -> RippleStore {
        let mut store = RippleStore::new();
        for ripple in ripples {
            store.push(ripple);
        }
        store
    }

    #[test]
    fn test_empty_store_draws_nothing() {
        let mut batch = LineBatch::new();
        let drawn = ConnectionRenderer::new().render(
            &RippleStore::new(),
            &RippleConfig::default(),
            &mut batch,
        );
        assert_eq!(drawn, 0);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_fresh_ripple_has_no_points() {
        let store = store_of(vec![Ripple::new(Point::default(), 10.0)]);
        let mut batch = LineBatch::new();
        ConnectionRenderer::new().render(&store, &RippleConfig::default(), &mut batch);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_two_ripples_five_apart_connect() {
        // radius / max = 1/sqrt(2) gives opacity 0.5
        let max_radius = 10.0;
        let radius = max_radius * std::f32::consts::FRAC_1_SQRT_2;
        let a = grown(Point::new(0.0, 0.0), radius, max_radius);
        let b = grown(Point::new(5.0, 0.0), radius, max_radius);
        assert!((a.opacity() - 0.5).abs() < 1e-4);

        let store = store_of(vec![a, b]);
        let config = RippleConfig {
            connection_distance: 20.0,
            ..Default::default()
        };
        let mut batch = LineBatch::new();
        let drawn = ConnectionRenderer::new().render(&store, &config, &mut batch);

        assert!(drawn > 0);
        assert_eq!(drawn, batch.len());
        let on_a = |p: Point| (p.distance(Point::new(0.0, 0.0)) - radius).abs() < 1e-3;
        let on_b = |p: Point| (p.distance(Point::new(5.0, 0.0)) - radius).abs() < 1e-3;
        let crosses = batch
            .segments()
            .iter()
            .any(|s| on_a(s.from) && on_b(s.to));
        assert!(crosses, "expected a connector between the two ripples");
        assert!(batch.segments().iter().all(|s| s.color == config.color));
    }

    #[test]
    fn test_zero_distance_draws_nothing() {
        // Two identical ripples have coincident points
        let a = grown(Point::default(), 5.0, 60.0);
        let b = grown(Point::default(), 5.0, 60.0);
        let store = store_of(vec![a, b]);
        let config = RippleConfig {
            connection_distance: 0.0,
            ..Default::default()
        };
        let mut batch = LineBatch::new();
        assert_eq!(ConnectionRenderer::new().render(&store, &config, &mut batch), 0);
    }

    #[test]
    fn test_faint_ripples_contribute_no_points() {
        // opacity 0.19 < floor
        let max_radius = 10.0;
        let radius = max_radius * 0.81f32.sqrt();
        let faint = grown(Point::default(), radius, max_radius);
        assert!(faint.opacity() <= VISIBILITY_FLOOR);
        let bright = grown(Point::new(1.0, 0.0), 1.0, 60.0);

        let store = store_of(vec![faint, bright]);
        let config = RippleConfig {
            connection_distance: 1000.0,
            ..Default::default()
        };
        let mut batch = LineBatch::new();
        let drawn = ConnectionRenderer::new().render(&store, &config, &mut batch);

        // Only the bright ripple's own points pair up
        assert_eq!(drawn, SAMPLE_COUNT * (SAMPLE_COUNT - 1) / 2);
    }

    #[test]
    fn test_line_opacity_floor() {
        // 0.21 and 0.28 average to 0.245, below the line floor
        let max_radius = 10.0;
        let a = grown(Point::default(), max_radius * 0.79f32.sqrt(), max_radius);
        let b = grown(Point::new(100.0, 0.0), max_radius * 0.72f32.sqrt(), max_radius);
        assert!(a.opacity() > VISIBILITY_FLOOR && b.opacity() > VISIBILITY_FLOOR);

        let store = store_of(vec![a, b]);
        let config = RippleConfig {
            connection_distance: 1000.0,
            ..Default::default()
        };
        let mut batch = LineBatch::new();
        ConnectionRenderer::new().render(&store, &config, &mut batch);

        // a-a pairs (0.21) fail, b-b pairs (0.28) pass, a-b pairs (0.245) fail
        assert_eq!(batch.len(), SAMPLE_COUNT * (SAMPLE_COUNT - 1) / 2);
        assert!(batch
            .segments()
            .iter()
            .all(|s| s.from.x > 50.0 && s.to.x > 50.0));
    }

    #[test]
    fn test_opacity_exactly_at_floor_contributes_no_points() {
        let config = RippleConfig {
            connection_distance: 10.0,
            ..Default::default()
        };
        let mut renderer = ConnectionRenderer::new();

        // Pair average would be 0.6, so only the floor can suppress it
        let at_floor = store_of(vec![
            pinned(&[Point::new(0.0, 0.0)], VISIBILITY_FLOOR),
            pinned(&[Point::new(1.0, 0.0)], 1.0),
        ]);
        let mut batch = LineBatch::new();
        assert_eq!(renderer.render(&at_floor, &config, &mut batch), 0);

        let above_floor = store_of(vec![
            pinned(&[Point::new(0.0, 0.0)], 0.21),
            pinned(&[Point::new(1.0, 0.0)], 1.0),
        ]);
        assert_eq!(renderer.render(&above_floor, &config, &mut batch), 1);
    }

    #[test]
    fn test_pair_exactly_at_connection_distance_is_not_drawn() {
        // 3-4-5 triangle: separation is exactly 5
        let store = store_of(vec![
            pinned(&[Point::new(0.0, 0.0)], 1.0),
            pinned(&[Point::new(3.0, 4.0)], 1.0),
        ]);
        let mut renderer = ConnectionRenderer::new();
        let mut batch = LineBatch::new();

        let at_limit = RippleConfig {
            connection_distance: 5.0,
            ..Default::default()
        };
        assert_eq!(renderer.render(&store, &at_limit, &mut batch), 0);

        let past_limit = RippleConfig {
            connection_distance: 5.01,
            ..Default::default()
        };
        assert_eq!(renderer.render(&store, &past_limit, &mut batch), 1);
    }

    #[test]
    fn test_nan_distance_draws_nothing() {
        let store = store_of(vec![
            pinned(&[Point::new(0.0, 0.0)], 1.0),
            pinned(&[Point::new(180.0, 0.0)], 1.0),
        ]);
        let config = RippleConfig {
            connection_distance: f32::NAN,
            ..Default::default()
        };
        let mut batch = LineBatch::new();
        assert_eq!(ConnectionRenderer::new().render(&store, &config, &mut batch), 0);
    }

    #[test]
    fn test_no_self_or_duplicate_pairs() {
        let store = store_of(vec![grown(Point::default(), 3.0, 60.0)]);
        let config = RippleConfig {
            connection_distance: 1000.0,
            ..Default::default()
        };
        let mut batch = LineBatch::new();
        ConnectionRenderer::new().render(&store, &config, &mut batch);

        assert_eq!(batch.len(), SAMPLE_COUNT * (SAMPLE_COUNT - 1) / 2);
        assert!(batch.segments().iter().all(|s| s.from != s.to));
    }

    #[test]
    fn test_render_is_idempotent() {
        let store = store_of(vec![
            grown(Point::new(10.0, 10.0), 6.0, 60.0),
            grown(Point::new(20.0, 12.0), 9.0, 60.0),
        ]);
        let config = RippleConfig::default();
        let mut renderer = ConnectionRenderer::new();

        let mut first = LineBatch::new();
        let mut second = LineBatch::new();
        renderer.render(&store, &config, &mut first);
        renderer.render(&store, &config, &mut second);

        assert!(!first.is_empty());
        assert_eq!(first.segments(), second.segments());
    }
}
