//! Visiting order for one team.
//!
//! Greedy nearest-neighbor construction from the home base, then 2-opt
//! segment reversal for mid-sized routes.

use tracing::debug;

use crate::model::{Location, Team};
use crate::traits::{DistanceMatrixProvider, Positioned};

/// Routes shorter than this skip 2-opt.
const TWO_OPT_MIN_STOPS: usize = 4;
/// Routes at least this long skip 2-opt.
const TWO_OPT_MAX_STOPS: usize = 100;

/// Improvements below this are treated as float noise.
const EPSILON_KM: f64 = 1e-9;

/// Orders a team's stops starting from its home base.
#[derive(Debug, Clone)]
pub struct RouteBuilder {
    pub two_opt_max_passes: usize,
}

impl Default for RouteBuilder {
    fn default() -> Self {
        Self {
            two_opt_max_passes: 50,
        }
    }
}

impl RouteBuilder {
    pub fn new(two_opt_max_passes: usize) -> Self {
        Self { two_opt_max_passes }
    }

    /// Ordered stops for `team`.
    pub fn build<M: DistanceMatrixProvider>(
        &self,
        team: &Team,
        locations: &[Location],
        metric: &M,
    ) -> Vec<Location> {
        if locations.is_empty() {
            return Vec::new();
        }

        // Index 0 is the home base, stop k is location k - 1.
        let points: Vec<(f64, f64)> = std::iter::once(team.position())
            .chain(locations.iter().map(Positioned::position))
            .collect();
        let matrix = metric.matrix_for(&points);

        let mut order = nearest_neighbor(&matrix);
        let initial = path_length(&matrix, &order);

        if (TWO_OPT_MIN_STOPS..TWO_OPT_MAX_STOPS).contains(&locations.len()) {
            let passes = two_opt(&matrix, &mut order, self.two_opt_max_passes);
            debug!(
                team = team.id,
                stops = locations.len(),
                passes,
                before_km = initial,
                after_km = path_length(&matrix, &order),
                "2-opt finished"
            );
        }

        order
            .into_iter()
            .skip(1)
            .map(|idx| locations[idx - 1].clone())
            .collect()
    }
}

/// Total length of the path through `order`.
pub fn path_length(matrix: &[Vec<f64>], order: &[usize]) -> f64 {
    order.windows(2).map(|w| matrix[w[0]][w[1]]).sum()
}

/// Visit order starting at index 0, always moving to the nearest unvisited point.
///
/// Ties go to the lower index.
fn nearest_neighbor(matrix: &[Vec<f64>]) -> Vec<usize> {
    let n = matrix.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    let mut current = 0;
    visited[0] = true;
    order.push(0);

    while order.len() < n {
        let next = (0..n)
            .filter(|&j| !visited[j])
            .min_by(|&a, &b| matrix[current][a].total_cmp(&matrix[current][b]));

        let Some(next) = next else { break };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

/// 2-opt: reverse a segment when it shortens the two boundary edges.
///
/// Position 0 (the home base) stays fixed. Returns the number of passes run.
fn two_opt(matrix: &[Vec<f64>], order: &mut [usize], max_passes: usize) -> usize {
    let n = order.len();
    let mut passes = 0;

    while passes < max_passes {
        passes += 1;
        let mut improved = false;

        for i in 1..n.saturating_sub(1) {
            for j in (i + 2)..n {
                let current = matrix[order[i - 1]][order[i]] + matrix[order[j - 1]][order[j]];
                let candidate = matrix[order[i - 1]][order[j - 1]] + matrix[order[i]][order[j]];

                if candidate + EPSILON_KM < current {
                    order[i..j].reverse();
                    improved = true;
                }
            }
        }

        if !improved {
            break;
        }
    }

    passes
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Manhattan distance (simple, predictable).
    struct ManhattanMetric;

    impl DistanceMatrixProvider for ManhattanMetric {
        fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64 {
            (from.0 - to.0).abs() + (from.1 - to.1).abs()
        }
    }

    fn location(id: &str, x: f64, y: f64) -> Location {
        Location {
            id: id.to_string(),
            customer: id.to_string(),
            latitude: x,
            longitude: y,
            units: 1,
            filter_value: 0.0,
            work_time: 1.0,
        }
    }

    fn home() -> Team {
        Team {
            id: 1,
            home_base: (0.0, 0.0),
            home_name: "home".to_string(),
        }
    }

    fn ids(route: &[Location]) -> Vec<&str> {
        route.iter().map(|l| l.id.as_str()).collect()
    }

    fn route_km(route: &[Location]) -> f64 {
        let mut points = vec![(0.0, 0.0)];
        points.extend(route.iter().map(Positioned::position));
        points
            .windows(2)
            .map(|w| ManhattanMetric.distance_km(w[0], w[1]))
            .sum()
    }

    #[test]
    fn test_empty_route() {
        let route = RouteBuilder::default().build(&home(), &[], &ManhattanMetric);
        assert!(route.is_empty());
    }

    #[test]
    fn test_nearest_neighbor_from_home() {
        let locations = vec![
            location("far", 3.0, 0.0),
            location("near", 1.0, 0.0),
            location("mid", 2.0, 0.0),
        ];
        let route = RouteBuilder::default().build(&home(), &locations, &ManhattanMetric);
        assert_eq!(ids(&route), vec!["near", "mid", "far"]);
    }

    #[test]
    fn test_two_opt_removes_crossing() {
        let matrix = vec![
            vec![0.0, 1.0, 2.0, 2.0, 1.0],
            vec![1.0, 0.0, 1.0, 2.0, 2.0],
            vec![2.0, 1.0, 0.0, 1.0, 2.0],
            vec![2.0, 2.0, 1.0, 0.0, 1.0],
            vec![1.0, 2.0, 2.0, 1.0, 0.0],
        ];
        // 0 -> 1 -> 3 -> 2 -> 4 crosses itself
        let mut order = vec![0, 1, 3, 2, 4];
        let before = path_length(&matrix, &order);
        two_opt(&matrix, &mut order, 50);

        assert_eq!(order, vec![0, 1, 2, 3, 4]);
        assert!(path_length(&matrix, &order) < before);
    }

    #[test]
    fn test_two_opt_never_worse_than_nearest_neighbor() {
        // Zig-zag pattern where greedy construction is suboptimal
        let locations: Vec<Location> = (0..12)
            .map(|i| {
                let x = (i % 4) as f64 * 5.0 + (i / 4) as f64 * 0.7;
                let y = if i % 2 == 0 { 0.0 } else { 7.0 + i as f64 };
                location(&format!("l{i}"), x, y)
            })
            .collect();

        let points: Vec<(f64, f64)> = std::iter::once((0.0, 0.0))
            .chain(locations.iter().map(Positioned::position))
            .collect();
        let matrix = ManhattanMetric.matrix_for(&points);
        let greedy = path_length(&matrix, &nearest_neighbor(&matrix));

        let route = RouteBuilder::default().build(&home(), &locations, &ManhattanMetric);
        assert_eq!(route.len(), locations.len());
        assert!(route_km(&route) <= greedy + 1e-9);
    }

    #[test]
    fn test_two_opt_is_idempotent() {
        let matrix = vec![
            vec![0.0, 1.0, 2.0, 2.0, 1.0],
            vec![1.0, 0.0, 1.0, 2.0, 2.0],
            vec![2.0, 1.0, 0.0, 1.0, 2.0],
            vec![2.0, 2.0, 1.0, 0.0, 1.0],
            vec![1.0, 2.0, 2.0, 1.0, 0.0],
        ];
        let mut order = vec![0, 1, 3, 2, 4];
        two_opt(&matrix, &mut order, 50);
        let settled = order.clone();
        let passes = two_opt(&matrix, &mut order, 50);

        assert_eq!(order, settled);
        assert_eq!(passes, 1, "A settled route needs a single scan");
    }

    #[test]
    fn test_small_routes_skip_two_opt() {
        let locations = vec![location("a", 1.0, 0.0), location("b", 0.0, 1.0), location("c", 2.0, 2.0)];
        let route = RouteBuilder::new(0).build(&home(), &locations, &ManhattanMetric);
        assert_eq!(route.len(), 3);
    }
}
