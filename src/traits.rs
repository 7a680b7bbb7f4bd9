//! Core seams for the crew planner.
//!
//! Stages are generic over how distances are measured so tests can plug in
//! simple, predictable metrics.

/// Anything with a (latitude, longitude) position.
pub trait Positioned {
    fn position(&self) -> (f64, f64);
}

/// Provides road distances (km) between coordinates.
///
/// Coordinates are expected to be validated before they reach a provider.
pub trait DistanceMatrixProvider: Sync {
    /// Distance in kilometers between two (lat, lng) points.
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64;

    /// Full distance matrix indexed by the provided location order.
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Vec<Vec<f64>> {
        let n = locations.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let km = self.distance_km(locations[i], locations[j]);
                matrix[i][j] = km;
                matrix[j][i] = km;
            }
        }

        matrix
    }
}

impl Positioned for (f64, f64) {
    fn position(&self) -> (f64, f64) {
        *self
    }
}
