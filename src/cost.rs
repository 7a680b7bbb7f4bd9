//! Operating cost of a simulated team route.

use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::model::TeamRoute;

/// Cost split by category. Values are unrounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub labor: f64,
    pub drive_labor: f64,
    pub vehicle: f64,
    pub hotel: f64,
    pub total: f64,
}

/// Prices routes and trips from labor, vehicle and hotel rates.
#[derive(Debug, Clone, Copy)]
pub struct CostModel {
    pub labor_cost_per_hour: f64,
    pub team_size: u32,
    pub vehicle_cost_per_km: f64,
    pub hotel_cost_per_night: f64,
}

impl CostModel {
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            labor_cost_per_hour: config.labor_cost_per_hour,
            team_size: config.team_size,
            vehicle_cost_per_km: config.vehicle_cost_per_km,
            hotel_cost_per_night: config.hotel_cost_per_night,
        }
    }

    pub fn breakdown(&self, route: &TeamRoute) -> CostBreakdown {
        let crew = f64::from(self.team_size);
        let labor = route.total_work_time * self.labor_cost_per_hour * crew;
        let drive_labor = route.total_drive_time * self.labor_cost_per_hour * crew;
        let vehicle = route.total_distance * self.vehicle_cost_per_km;
        let hotel = f64::from(route.hotel_nights) * self.hotel_cost_per_night * crew;

        CostBreakdown {
            labor,
            drive_labor,
            vehicle,
            hotel,
            total: labor + drive_labor + vehicle + hotel,
        }
    }

    pub fn cost(&self, route: &TeamRoute) -> f64 {
        self.breakdown(route).total
    }

    /// Cost of one hotel night for the whole team.
    pub fn hotel_night(&self) -> f64 {
        self.hotel_cost_per_night * f64::from(self.team_size)
    }

    /// Cost of driving `km` kilometers taking `hours` of the team's time.
    pub fn trip(&self, km: f64, hours: f64) -> f64 {
        km * self.vehicle_cost_per_km + hours * self.labor_cost_per_hour * f64::from(self.team_size)
    }
}
