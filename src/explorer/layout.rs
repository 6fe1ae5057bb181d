//! Ego-graph layout for the relationship explorer
//!
//! Places related nodes around the focal node. The placement is a pure
//! function of the related-node count and the base radius, so the same
//! graph always lands in the same place:
//!
//! - 1 node: directly to the right of center
//! - 2 nodes: symmetric left/right
//! - 3 nodes: a triangle, one on top and two below
//! - more: evenly around a circle starting at 12 o'clock and proceeding
//!   clockwise, with the radius growing so neighbours never sit closer than
//!   [`MIN_SPACING`]
//!
//! Coordinates are screen-style: `y` grows downward.

use crate::models::graph::{EgoGraph, Position};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Default distance from the focal node to related nodes
pub const DEFAULT_BASE_RADIUS: f64 = 200.0;

/// Minimum distance between neighbouring nodes on the ring
pub const MIN_SPACING: f64 = 120.0;

/// Configuration for the ego-graph layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Preferred distance from the focal node
    pub base_radius: f64,
    /// Minimum distance between neighbouring related nodes
    pub min_spacing: f64,
    /// Where the focal node sits
    pub center: Position,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_radius: DEFAULT_BASE_RADIUS,
            min_spacing: MIN_SPACING,
            center: Position::default(),
        }
    }
}

/// Offsets from the focal node for `n` related nodes.
///
/// Uses the default [`MIN_SPACING`]. Identical arguments always produce an
/// identical list.
pub fn positions(n: usize, base_radius: f64) -> Vec<Position> {
    positions_with_spacing(n, base_radius, MIN_SPACING)
}

/// Offsets from the focal node for `n` related nodes with an explicit
/// minimum neighbour spacing.
pub fn positions_with_spacing(n: usize, base_radius: f64, min_spacing: f64) -> Vec<Position> {
    let r = base_radius;
    match n {
        0 => Vec::new(),
        1 => vec![Position::new(r, 0.0)],
        2 => vec![Position::new(-0.8 * r, 0.0), Position::new(0.8 * r, 0.0)],
        3 => vec![
            Position::new(0.0, -0.7 * r),
            Position::new(-0.6 * r, 0.4 * r),
            Position::new(0.6 * r, 0.4 * r),
        ],
        _ => {
            let radius = ring_radius(n, base_radius, min_spacing);
            let step = TAU / n as f64;
            (0..n)
                .map(|i| {
                    let angle = -FRAC_PI_2 + step * i as f64;
                    Position::new(radius * angle.cos(), radius * angle.sin())
                })
                .collect()
        }
    }
}

/// Radius of the ring used for more than three related nodes.
///
/// At least `base_radius`, and at least `n * min_spacing / 2π` so the arc
/// between neighbours is never shorter than `min_spacing`. The straight-line
/// chord between neighbours is shorter than the arc, so the radius is also
/// raised until the chord `2·r·sin(π/n)` reaches `min_spacing`.
pub fn ring_radius(n: usize, base_radius: f64, min_spacing: f64) -> f64 {
    if n < 2 {
        return base_radius;
    }
    let n = n as f64;
    let arc_radius = n * min_spacing / TAU;
    let chord_radius = min_spacing / (2.0 * (PI / n).sin());
    base_radius.max(arc_radius).max(chord_radius)
}

/// Ego-graph layout engine
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    /// Configuration
    pub config: LayoutConfig,
}

impl LayoutEngine {
    /// Create a new layout engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layout engine with custom configuration
    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Assign positions to every node of a freshly built graph.
    ///
    /// The first node (focal, or the idle prompt) goes to the center; the
    /// rest take ring offsets in list order.
    pub fn arrange(&self, mut graph: EgoGraph) -> EgoGraph {
        let center = self.config.center;
        let related = graph.nodes.len().saturating_sub(1);
        let offsets =
            positions_with_spacing(related, self.config.base_radius, self.config.min_spacing);

        if let Some(first) = graph.nodes.first_mut() {
            first.position = center;
        }
        for (node, offset) in graph.nodes.iter_mut().skip(1).zip(offsets) {
            node.position = center.offset(offset);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_zero_nodes() {
        assert!(positions(0, 200.0).is_empty());
    }

    #[test]
    fn test_single_node_to_the_right() {
        assert_eq!(positions(1, 200.0), vec![Position::new(200.0, 0.0)]);
    }

    #[test]
    fn test_two_nodes_symmetric() {
        let pos = positions(2, 100.0);
        assert_eq!(pos, vec![Position::new(-80.0, 0.0), Position::new(80.0, 0.0)]);
    }

    #[test]
    fn test_three_nodes_triangle() {
        let pos = positions(3, 100.0);
        assert_eq!(pos[0], Position::new(0.0, -70.0));
        assert_eq!(pos[1], Position::new(-60.0, 40.0));
        assert_eq!(pos[2], Position::new(60.0, 40.0));
    }

    #[test]
    fn test_ring_starts_at_twelve_oclock_clockwise() {
        let pos = positions(4, 200.0);
        let r = ring_radius(4, 200.0, MIN_SPACING);
        assert!(approx(pos[0].x, 0.0) && approx(pos[0].y, -r));
        // Screen coordinates: the next step clockwise is to the right
        assert!(approx(pos[1].x, r) && approx(pos[1].y, 0.0));
        assert!(approx(pos[2].x, 0.0) && approx(pos[2].y, r));
        assert!(approx(pos[3].x, -r) && approx(pos[3].y, 0.0));
    }

    #[test]
    fn test_small_ring_uses_base_radius() {
        for p in positions(5, 400.0) {
            assert!(approx(p.magnitude(), 400.0));
        }
    }

    #[test]
    fn test_neighbours_never_closer_than_min_spacing() {
        for base in [1.0, 50.0, 200.0, 1000.0] {
            for n in 4..=60 {
                let pos = positions(n, base);
                assert_eq!(pos.len(), n);
                for i in 0..n {
                    let d = pos[i].distance(&pos[(i + 1) % n]);
                    assert!(
                        d >= MIN_SPACING - 1e-6,
                        "n={} base={} spacing {} < {}",
                        n,
                        base,
                        d,
                        MIN_SPACING
                    );
                }
            }
        }
    }

    #[test]
    fn test_radius_grows_with_count() {
        let mut previous = 0.0;
        for n in 4..=100 {
            let r = ring_radius(n, 10.0, MIN_SPACING);
            assert!(r >= previous);
            assert!(r >= n as f64 * MIN_SPACING / TAU);
            previous = r;
        }
    }

    #[test]
    fn test_positions_deterministic() {
        for n in 0..30 {
            assert_eq!(positions(n, 180.0), positions(n, 180.0));
        }
        // Unrelated calls in between must not matter
        let _ = positions(50, 10.0);
        assert_eq!(positions(7, 180.0), positions(7, 180.0));
    }

    #[test]
    fn test_custom_spacing() {
        let pos = positions_with_spacing(12, 10.0, 300.0);
        let d = pos[0].distance(&pos[1]);
        assert!(d >= 300.0 - 1e-6);
    }

    #[test]
    fn test_layout_config_default() {
        let config = LayoutConfig::default();
        assert!((config.base_radius - DEFAULT_BASE_RADIUS).abs() < 0.001);
        assert!((config.min_spacing - MIN_SPACING).abs() < 0.001);
        assert_eq!(config.center, Position::default());
    }
}
