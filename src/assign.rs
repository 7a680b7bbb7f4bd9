//! Nearest-feasible-team assignment of locations.

use std::collections::BTreeMap;

use tracing::debug;

use crate::model::{Location, Team};
use crate::traits::{DistanceMatrixProvider, Positioned};

/// Locations per team plus those no team can reach.
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    /// Locations per team id, in input order.
    pub by_team: BTreeMap<u32, Vec<Location>>,
    /// Locations no team can reach within the maximum distance.
    pub unassigned: Vec<Location>,
}

impl Assignment {
    pub fn locations_for(&self, team_id: u32) -> &[Location] {
        self.by_team.get(&team_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn assigned_count(&self) -> usize {
        self.by_team.values().map(Vec::len).sum()
    }
}

/// Assign each location to the nearest team within `max_distance_km`.
///
/// Exactly equal distances go to the lowest team id. Locations outside every
/// team's reach are never forced onto a team.
pub fn assign<M: DistanceMatrixProvider>(
    locations: &[Location],
    teams: &[Team],
    max_distance_km: f64,
    metric: &M,
) -> Assignment {
    let mut ordered: Vec<&Team> = teams.iter().collect();
    ordered.sort_by_key(|t| t.id);

    let mut assignment = Assignment {
        by_team: ordered.iter().map(|t| (t.id, Vec::new())).collect(),
        unassigned: Vec::new(),
    };

    for location in locations {
        let mut nearest: Option<(u32, f64)> = None;

        for team in &ordered {
            let distance = metric.distance_km(team.position(), location.position());
            if distance > max_distance_km {
                continue;
            }
            if nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((team.id, distance));
            }
        }

        match nearest {
            Some((team_id, _)) => assignment
                .by_team
                .entry(team_id)
                .or_default()
                .push(location.clone()),
            None => assignment.unassigned.push(location.clone()),
        }
    }

    debug!(
        assigned = assignment.assigned_count(),
        unassigned = assignment.unassigned.len(),
        teams = teams.len(),
        "assigned locations to teams"
    );

    assignment
}
