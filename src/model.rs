//! Domain entities produced and consumed by the planner stages.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::cost::{CostBreakdown, CostModel};
use crate::traits::Positioned;

/// A single work item to visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub customer: String,
    pub latitude: f64,
    pub longitude: f64,
    pub units: u32,
    /// Value the location was filtered on (energy volume, priority, ...).
    pub filter_value: f64,
    /// Per-visit work duration in hours.
    pub work_time: f64,
}

impl Positioned for Location {
    fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// A mobile team and its home base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// 1-based, unique within one fleet-size candidate.
    pub id: u32,
    pub home_base: (f64, f64),
    pub home_name: String,
}

impl Team {
    pub fn new(id: u32, base: &CandidateBase) -> Self {
        Self {
            id,
            home_base: base.position(),
            home_name: base.name.clone(),
        }
    }
}

impl Positioned for Team {
    fn position(&self) -> (f64, f64) {
        self.home_base
    }
}

/// A named point that can serve as a team's home base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateBase {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

impl CandidateBase {
    pub fn new(latitude: f64, longitude: f64, name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            name: name.into(),
        }
    }
}

impl Positioned for CandidateBase {
    fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// One visited location within a team route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub location: Location,
    pub arrival_time: NaiveDateTime,
    pub departure_time: NaiveDateTime,
    /// Hours of driving attributed to this stop, including overhead.
    pub drive_time: f64,
    /// Kilometers driven to reach this stop.
    pub drive_distance: f64,
    pub work_time: f64,
    /// The night before this stop was spent in a hotel instead of at home.
    ///
    /// Set on the stop reached the morning after a hotel night, so it marks
    /// the overnight stay that follows the previous stop.
    pub overnight_stay: bool,
}

/// Complete simulated route for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRoute {
    pub team: Team,
    pub segments: Vec<RouteSegment>,
    pub total_days: u32,
    pub total_distance: f64,
    pub total_work_time: f64,
    pub total_drive_time: f64,
    pub hotel_nights: u32,
    pub total_cost: f64,
    pub cost: CostBreakdown,
}

impl TeamRoute {
    /// Aggregate segment totals and price the route.
    pub fn from_segments(team: Team, segments: Vec<RouteSegment>, cost_model: &CostModel) -> Self {
        let total_distance = segments.iter().map(|s| s.drive_distance).sum();
        let total_work_time = segments.iter().map(|s| s.work_time).sum();
        let total_drive_time = segments.iter().map(|s| s.drive_time).sum();
        let hotel_nights = segments.iter().filter(|s| s.overnight_stay).count() as u32;
        let total_days = match (segments.first(), segments.last()) {
            (Some(first), Some(last)) => {
                let span = last.departure_time.date() - first.arrival_time.date();
                span.num_days() as u32 + 1
            }
            _ => 0,
        };

        let mut route = Self {
            team,
            segments,
            total_days,
            total_distance,
            total_work_time,
            total_drive_time,
            hotel_nights,
            total_cost: 0.0,
            cost: CostBreakdown::default(),
        };
        route.cost = cost_model.breakdown(&route);
        route.total_cost = route.cost.total;
        route
    }

    pub fn stop_count(&self) -> usize {
        self.segments.len()
    }
}
