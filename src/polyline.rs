//! Route geometry for map renderers.
//!
//! Points are kept as decoded `(latitude, longitude)` pairs. Any compact
//! encoding belongs to the renderer.

use serde::{Deserialize, Serialize};

use crate::model::TeamRoute;
use crate::traits::{DistanceMatrixProvider, Positioned};

/// Route geometry as decoded `(latitude, longitude)` points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Straight-line geometry of a route: home, every stop in order, home.
    ///
    /// A route without stops has no geometry.
    pub fn for_route(route: &TeamRoute) -> Self {
        if route.segments.is_empty() {
            return Self::new(Vec::new());
        }
        let home = route.team.position();
        let points = std::iter::once(home)
            .chain(route.segments.iter().map(|s| s.location.position()))
            .chain(std::iter::once(home))
            .collect();
        Self::new(points)
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    /// Length along the polyline under `metric`.
    pub fn length_km<M: DistanceMatrixProvider>(&self, metric: &M) -> f64 {
        self.points
            .windows(2)
            .map(|w| metric.distance_km(w[0], w[1]))
            .sum()
    }
}
