//! Resolution of the configured home-base mode into concrete team bases.

use tracing::warn;

use crate::catalog::CandidateBaseCatalog;
use crate::config::HomeBaseMode;
use crate::error::{PlannerError, Result};
use crate::haversine::validate_coordinate;
use crate::model::{CandidateBase, Location, Team};
use crate::traits::DistanceMatrixProvider;

/// Fewer bases than teams were available for a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BaseShortfall {
    pub requested: usize,
    pub available: usize,
}

/// Teams with their resolved home bases for one team count.
#[derive(Debug, Clone)]
pub struct HomeBasePlan {
    /// Teams ordered by id.
    pub teams: Vec<Team>,
    pub shortfall: Option<BaseShortfall>,
}

/// Reject modes naming unknown catalog cities or malformed custom bases.
pub fn check_mode(mode: &HomeBaseMode, catalog: &CandidateBaseCatalog) -> Result<()> {
    match mode {
        HomeBaseMode::Automatic => Ok(()),
        HomeBaseMode::Restricted { allowed } => {
            if allowed.is_empty() {
                return Err(PlannerError::InvalidConfig(
                    "restricted home-base mode needs at least one city".into(),
                ));
            }
            for name in allowed {
                catalog.by_name(name)?;
            }
            Ok(())
        }
        HomeBaseMode::Pinned { pins } => {
            let mut seen = Vec::with_capacity(pins.len());
            for pin in pins {
                if pin.team == 0 || seen.contains(&pin.team) {
                    return Err(PlannerError::InvalidConfig(format!(
                        "team {} pinned more than once or not 1-based",
                        pin.team
                    )));
                }
                seen.push(pin.team);
                catalog.by_name(&pin.city)?;
            }
            Ok(())
        }
        HomeBaseMode::Custom { bases } => {
            for base in bases {
                validate_coordinate(base.latitude, base.longitude)?;
            }
            Ok(())
        }
    }
}

/// Derive the home bases for `count` teams.
///
/// Custom coordinates come first, then pinned teams, then clustering-based
/// placement fills the remainder. When not enough distinct bases exist the
/// team count is truncated and the shortfall reported.
pub fn resolve<M: DistanceMatrixProvider>(
    mode: &HomeBaseMode,
    catalog: &CandidateBaseCatalog,
    locations: &[Location],
    count: usize,
    metric: &M,
) -> Result<HomeBasePlan> {
    let teams: Vec<Team> = match mode {
        HomeBaseMode::Automatic => number(catalog.place_by_clustering(locations, count, metric)),
        HomeBaseMode::Restricted { allowed } => {
            number(catalog.suggest(locations, count, Some(allowed), metric))
        }
        HomeBaseMode::Custom { bases } => {
            let mut resolved: Vec<CandidateBase> = bases.iter().take(count).cloned().collect();
            if resolved.len() < count {
                let used: Vec<String> = resolved.iter().map(|b| b.name.clone()).collect();
                let fill = catalog.place_by_clustering_excluding(
                    locations,
                    count - resolved.len(),
                    &used,
                    metric,
                );
                resolved.extend(fill);
            }
            number(resolved)
        }
        HomeBaseMode::Pinned { pins } => {
            let mut pinned: Vec<(u32, CandidateBase)> = Vec::new();
            // The first pin for a team wins.
            for pin in pins.iter().filter(|p| p.team >= 1 && p.team as usize <= count) {
                if pinned.iter().any(|(team, _)| *team == pin.team) {
                    continue;
                }
                pinned.push((pin.team, catalog.by_name(&pin.city)?.clone()));
            }

            let used: Vec<String> = pinned.iter().map(|(_, b)| b.name.clone()).collect();
            let mut fill = catalog
                .place_by_clustering_excluding(locations, count.saturating_sub(pinned.len()), &used, metric)
                .into_iter();

            let mut teams = Vec::with_capacity(count);
            for id in 1..=count as u32 {
                let base = match pinned.iter().find(|(team, _)| *team == id) {
                    Some((_, base)) => Some(base.clone()),
                    None => fill.next(),
                };
                if let Some(base) = base {
                    teams.push(Team::new(id, &base));
                }
            }
            teams
        }
    };

    if teams.is_empty() && count > 0 {
        return Err(PlannerError::InsufficientCandidateBases {
            requested: count,
            available: 0,
        });
    }

    let shortfall = (teams.len() < count).then(|| {
        warn!(requested = count, available = teams.len(), "not enough home bases, truncating team count");
        BaseShortfall {
            requested: count,
            available: teams.len(),
        }
    });

    Ok(HomeBasePlan { teams, shortfall })
}

fn number(bases: Vec<CandidateBase>) -> Vec<Team> {
    bases
        .iter()
        .enumerate()
        .map(|(i, base)| Team::new(i as u32 + 1, base))
        .collect()
}
