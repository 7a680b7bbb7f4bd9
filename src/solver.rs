//! Fleet-size search.
//!
//! Every team count in the configured range is evaluated independently:
//! home bases, assignment, routing, day simulation and costing. Candidates
//! run in parallel and the cheapest one wins, ties going to fewer teams.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::assign::assign;
use crate::catalog::CandidateBaseCatalog;
use crate::config::PlannerConfig;
use crate::cost::CostModel;
use crate::error::{PlannerError, Result};
use crate::filter::{ColumnMapping, LocationFilter, Record, RecordTable};
use crate::haversine::RoadDistance;
use crate::home_base::{self, BaseShortfall};
use crate::model::{Location, Team, TeamRoute};
use crate::route::RouteBuilder;
use crate::schedule::DaySimulator;
use crate::traits::DistanceMatrixProvider;

/// Shared stop request for a running search.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Fully evaluated configuration for one team count.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateResult {
    pub num_teams: usize,
    pub teams: Vec<Team>,
    pub team_routes: Vec<TeamRoute>,
    pub total_cost: f64,
    pub total_days: u32,
    pub cost_per_location: f64,
    pub unassigned: Vec<Location>,
    pub shortfall: Option<BaseShortfall>,
}

/// One row of the per-team-count result table.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CandidateOutcome {
    Evaluated(CandidateResult),
    Excluded { num_teams: usize, reason: String },
}

impl CandidateOutcome {
    pub fn num_teams(&self) -> usize {
        match self {
            CandidateOutcome::Evaluated(result) => result.num_teams,
            CandidateOutcome::Excluded { num_teams, .. } => *num_teams,
        }
    }

    pub fn evaluated(&self) -> Option<&CandidateResult> {
        match self {
            CandidateOutcome::Evaluated(result) => Some(result),
            CandidateOutcome::Excluded { .. } => None,
        }
    }
}

/// The selected fleet size and its routes, plus every evaluated candidate.
#[derive(Debug, Clone, Serialize)]
pub struct PlannerResult {
    pub optimal_teams: usize,
    pub team_routes: Vec<TeamRoute>,
    pub home_bases: Vec<Team>,
    pub total_cost: f64,
    pub total_days: u32,
    pub total_locations: usize,
    pub cost_per_location: f64,
    pub unassigned: Vec<Location>,
    pub shortfall: Option<BaseShortfall>,
    /// One entry per team count, in ascending order.
    pub candidates: Vec<CandidateOutcome>,
}

/// Run the whole pipeline from a raw table.
pub fn plan_table(table: RecordTable, mapping: &ColumnMapping, config: &PlannerConfig) -> Result<PlannerResult> {
    let records = table.into_records(mapping)?;
    plan(&records, config)
}

/// Filter the records and search for the cheapest fleet size with the
/// built-in catalog and road distances.
pub fn plan(records: &[Record], config: &PlannerConfig) -> Result<PlannerResult> {
    config.validate()?;
    let locations = LocationFilter::from_config(config).apply(records)?;
    let catalog = CandidateBaseCatalog::default();
    let metric = RoadDistance::new(config.road_factor);
    solve(&locations, config, &catalog, &metric, None)
}

/// Evaluate every team count in `min_teams..=max_teams` and pick the cheapest.
pub fn solve<M: DistanceMatrixProvider>(
    locations: &[Location],
    config: &PlannerConfig,
    catalog: &CandidateBaseCatalog,
    metric: &M,
    cancel: Option<&CancelFlag>,
) -> Result<PlannerResult> {
    config.validate()?;
    home_base::check_mode(&config.home_base_mode, catalog)?;
    if locations.is_empty() {
        return Err(PlannerError::NoLocationsAfterFilter);
    }

    let cancelled = || cancel.is_some_and(CancelFlag::is_cancelled);

    let outcomes: Vec<Option<CandidateOutcome>> = (config.min_teams..=config.max_teams)
        .into_par_iter()
        .map(|num_teams| {
            if cancelled() {
                return None;
            }
            let outcome = match evaluate_candidate(num_teams, locations, config, catalog, metric) {
                Ok(result) => {
                    info!(
                        num_teams,
                        total_cost = result.total_cost,
                        total_days = result.total_days,
                        unassigned = result.unassigned.len(),
                        "evaluated candidate"
                    );
                    CandidateOutcome::Evaluated(result)
                }
                Err(err) => {
                    warn!(num_teams, %err, "excluding candidate");
                    CandidateOutcome::Excluded {
                        num_teams,
                        reason: err.to_string(),
                    }
                }
            };
            // Results finished after a stop request are discarded.
            (!cancelled()).then_some(outcome)
        })
        .collect();

    if cancelled() {
        return Err(PlannerError::Cancelled);
    }
    let candidates: Vec<CandidateOutcome> = outcomes.into_iter().flatten().collect();

    let best = candidates
        .iter()
        .filter_map(CandidateOutcome::evaluated)
        .fold(None::<&CandidateResult>, |best, candidate| match best {
            Some(current) if current.total_cost <= candidate.total_cost => Some(current),
            _ => Some(candidate),
        })
        .cloned()
        .ok_or(PlannerError::NoFeasibleCandidate)?;

    info!(
        optimal_teams = best.num_teams,
        total_cost = best.total_cost,
        unassigned = best.unassigned.len(),
        "selected fleet size"
    );

    Ok(PlannerResult {
        optimal_teams: best.num_teams,
        team_routes: best.team_routes,
        home_bases: best.teams,
        total_cost: best.total_cost,
        total_days: best.total_days,
        total_locations: locations.len(),
        cost_per_location: best.cost_per_location,
        unassigned: best.unassigned,
        shortfall: best.shortfall,
        candidates,
    })
}

/// Build, simulate and cost the configuration for one team count.
pub fn evaluate_candidate<M: DistanceMatrixProvider>(
    num_teams: usize,
    locations: &[Location],
    config: &PlannerConfig,
    catalog: &CandidateBaseCatalog,
    metric: &M,
) -> Result<CandidateResult> {
    let plan = home_base::resolve(&config.home_base_mode, catalog, locations, num_teams, metric)?;
    let assignment = assign(locations, &plan.teams, config.max_distance_from_home_km, metric);

    let builder = RouteBuilder::new(config.two_opt_max_passes);
    let simulator = DaySimulator::from_config(config, metric);
    let cost_model = CostModel::from_config(config);

    let team_routes: Vec<TeamRoute> = plan
        .teams
        .iter()
        .filter_map(|team| {
            let assigned = assignment.locations_for(team.id);
            if assigned.is_empty() {
                return None;
            }
            let route = builder.build(team, assigned, metric);
            let segments = simulator.simulate(team, &route);
            Some(TeamRoute::from_segments(team.clone(), segments, &cost_model))
        })
        .collect();

    if team_routes.is_empty() {
        return Err(PlannerError::NoFeasibleCandidate);
    }

    let total_cost: f64 = team_routes.iter().map(|r| r.total_cost).sum();
    let total_days = team_routes.iter().map(|r| r.total_days).max().unwrap_or(0);

    Ok(CandidateResult {
        num_teams,
        teams: plan.teams,
        team_routes,
        total_cost,
        total_days,
        cost_per_location: total_cost / locations.len() as f64,
        unassigned: assignment.unassigned,
        shortfall: plan.shortfall,
    })
}
