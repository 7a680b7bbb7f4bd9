//! Catalog of named candidate home bases.
//!
//! Bases are suggested either by density scoring against the locations or by
//! clustering the locations and snapping each centroid to the nearest free
//! catalog entry.

use linfa::DatasetBase;
use linfa::prelude::*;
use linfa_clustering::KMeans;
use ndarray::Array2;
use tracing::{debug, warn};

use crate::error::{PlannerError, Result};
use crate::model::{CandidateBase, Location};
use crate::traits::{DistanceMatrixProvider, Positioned};

/// Radius (km) within which a location counts as "nearby" a candidate.
const NEARBY_RADIUS_KM: f64 = 200.0;

const MEAN_DISTANCE_WEIGHT: f64 = 0.6;
const NEARBY_COUNT_WEIGHT: f64 = 0.4;
const MIN_DISTANCE_WEIGHT: f64 = 0.2;

const KMEANS_MAX_ITERATIONS: u64 = 300;

/// Swedish cities used as home bases when none are supplied.
const SWEDISH_CITIES: &[(f64, f64, &str)] = &[
    (59.3293, 18.0686, "Stockholm"),
    (57.7089, 11.9746, "Göteborg"),
    (55.6050, 13.0038, "Malmö"),
    (59.8586, 17.6389, "Uppsala"),
    (59.2753, 15.2134, "Örebro"),
    (58.4108, 15.6214, "Linköping"),
    (56.1612, 15.5869, "Växjö"),
    (56.0465, 12.6945, "Helsingborg"),
    (62.3908, 17.3069, "Sundsvall"),
    (58.5877, 16.1924, "Norrköping"),
    (57.7826, 14.1618, "Jönköping"),
    (63.8258, 20.2630, "Umeå"),
    (60.6749, 17.1413, "Gävle"),
    (59.6099, 16.5448, "Västerås"),
    (59.6749, 14.8702, "Karlstad"),
    (59.0392, 12.5045, "Borås"),
    (59.3793, 13.5039, "Eskilstuna"),
    (65.5848, 22.1547, "Luleå"),
    (56.8777, 14.8091, "Kalmar"),
    (55.9929, 14.1579, "Kristianstad"),
    (63.1792, 14.6357, "Östersund"),
    (58.5947, 13.5090, "Skövde"),
    (57.1063, 12.2580, "Halmstad"),
    (60.1282, 18.6435, "Norrtälje"),
    (59.2741, 18.0825, "Södertälje"),
    (58.7527, 17.0085, "Enköping"),
    (62.6308, 17.9411, "Härnösand"),
    (56.0371, 14.8533, "Karlskrona"),
    (67.8558, 20.2253, "Kiruna"),
    (58.2544, 12.3717, "Trollhättan"),
];

/// Ordered list of named points that can serve as home bases.
#[derive(Debug, Clone)]
pub struct CandidateBaseCatalog {
    bases: Vec<CandidateBase>,
}

impl Default for CandidateBaseCatalog {
    fn default() -> Self {
        Self::new(
            SWEDISH_CITIES
                .iter()
                .map(|&(lat, lon, name)| CandidateBase::new(lat, lon, name))
                .collect(),
        )
    }
}

impl CandidateBaseCatalog {
    pub fn new(bases: Vec<CandidateBase>) -> Self {
        Self { bases }
    }

    pub fn bases(&self) -> &[CandidateBase] {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Catalog names in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.bases.iter().map(|b| b.name.as_str()).collect()
    }

    pub fn by_name(&self, name: &str) -> Result<&CandidateBase> {
        self.bases
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| PlannerError::BaseNotFound(name.to_string()))
    }

    /// The first `count` entries whose names are not in `used`.
    pub fn prefix(&self, count: usize, used: &[String]) -> Vec<CandidateBase> {
        self.bases
            .iter()
            .filter(|b| !used.contains(&b.name))
            .take(count)
            .cloned()
            .collect()
    }

    /// Suggest `count` bases by how densely the locations surround them.
    ///
    /// Lower score is better: mean distance counts against a candidate while
    /// the number of locations within 200 km and the minimum distance are
    /// subtracted. `allowed` restricts the candidates to the named entries;
    /// unknown names are ignored.
    pub fn suggest<M: DistanceMatrixProvider>(
        &self,
        locations: &[Location],
        count: usize,
        allowed: Option<&[String]>,
        metric: &M,
    ) -> Vec<CandidateBase> {
        if locations.is_empty() || count == 0 {
            return Vec::new();
        }

        let mut candidates: Vec<&CandidateBase> = match allowed {
            Some(names) => names
                .iter()
                .filter_map(|name| self.bases.iter().find(|b| &b.name == name))
                .collect(),
            None => self.bases.iter().collect(),
        };
        candidates.dedup_by(|a, b| a.name == b.name);

        let mut scored: Vec<(f64, &CandidateBase)> = candidates
            .into_iter()
            .map(|base| (density_score(base, locations, metric), base))
            .collect();
        // Stable sort keeps catalog order among equal scores.
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut suggested: Vec<CandidateBase> = Vec::with_capacity(count);
        for (score, base) in scored {
            if suggested.len() == count {
                break;
            }
            if suggested.iter().any(|s| s.name == base.name) {
                continue;
            }
            debug!(base = %base.name, score, "suggested home base");
            suggested.push(base.clone());
        }
        suggested
    }

    /// Place `count` bases by clustering the locations onto the catalog.
    pub fn place_by_clustering<M: DistanceMatrixProvider>(
        &self,
        locations: &[Location],
        count: usize,
        metric: &M,
    ) -> Vec<CandidateBase> {
        self.place_by_clustering_excluding(locations, count, &[], metric)
    }

    /// Like [`place_by_clustering`](Self::place_by_clustering), never returning
    /// an entry named in `used`.
    ///
    /// Falls back to the catalog prefix when there are fewer locations than
    /// requested bases or the clustering fails.
    pub fn place_by_clustering_excluding<M: DistanceMatrixProvider>(
        &self,
        locations: &[Location],
        count: usize,
        used: &[String],
        metric: &M,
    ) -> Vec<CandidateBase> {
        if count == 0 {
            return Vec::new();
        }

        let centroids = match cluster_centroids(locations, count) {
            Ok(centroids) => centroids,
            Err(err) => {
                warn!(%err, count, "falling back to catalog order for home bases");
                return self.prefix(count, used);
            }
        };

        let mut taken: Vec<String> = used.to_vec();
        let mut placed = Vec::with_capacity(count);

        for centroid in centroids {
            let nearest = self
                .bases
                .iter()
                .filter(|b| !taken.contains(&b.name))
                .map(|b| (metric.distance_km(centroid, b.position()), b))
                .min_by(|a, b| a.0.total_cmp(&b.0));

            let chosen = match nearest {
                Some((_, base)) => base,
                None => match self.bases.iter().find(|b| !taken.contains(&b.name)) {
                    Some(base) => base,
                    None => break,
                },
            };

            debug!(base = %chosen.name, lat = centroid.0, lon = centroid.1, "cluster centroid placed");
            taken.push(chosen.name.clone());
            placed.push(chosen.clone());
        }

        placed
    }
}

fn density_score<M: DistanceMatrixProvider>(
    base: &CandidateBase,
    locations: &[Location],
    metric: &M,
) -> f64 {
    let distances: Vec<f64> = locations
        .iter()
        .map(|loc| metric.distance_km(base.position(), loc.position()))
        .collect();

    let mean = distances.iter().sum::<f64>() / distances.len() as f64;
    let min = distances.iter().copied().fold(f64::INFINITY, f64::min);
    let nearby = distances.iter().filter(|&&d| d <= NEARBY_RADIUS_KM).count() as f64;

    mean * MEAN_DISTANCE_WEIGHT - nearby * NEARBY_COUNT_WEIGHT - min * MIN_DISTANCE_WEIGHT
}

/// K-means centroids of the location coordinates, as (lat, lon).
fn cluster_centroids(locations: &[Location], count: usize) -> Result<Vec<(f64, f64)>> {
    if locations.len() < count {
        return Err(PlannerError::ClusteringUnavailable(format!(
            "{} locations cannot form {} clusters",
            locations.len(),
            count
        )));
    }

    let points: Vec<f64> = locations
        .iter()
        .flat_map(|loc| [loc.latitude, loc.longitude])
        .collect();
    let observations = Array2::from_shape_vec((locations.len(), 2), points)
        .map_err(|err| PlannerError::ClusteringUnavailable(err.to_string()))?;
    let dataset = DatasetBase::from(observations);

    let model = KMeans::params(count)
        .max_n_iterations(KMEANS_MAX_ITERATIONS)
        .fit(&dataset)
        .map_err(|err| PlannerError::ClusteringUnavailable(err.to_string()))?;

    Ok(model
        .centroids()
        .rows()
        .into_iter()
        .map(|row| (row[0], row[1]))
        .collect())
}
