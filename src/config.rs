//! Planner configuration.
//!
//! One immutable struct enumerating every recognized option. All fields
//! have defaults so a partial JSON document is enough to configure a run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::haversine::DEFAULT_ROAD_FACTOR;
use crate::model::CandidateBase;

/// How input records are filtered before they become locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum FilterMode {
    /// Sum filter values per customer; keep customers whose sum reaches the minimum.
    #[serde(rename_all = "camelCase")]
    Aggregate { min_filter_value: f64 },
    /// Keep records whose filter value is at or below the threshold.
    #[serde(rename_all = "camelCase")]
    Threshold { priority_threshold: f64 },
}

/// Where teams are based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum HomeBaseMode {
    /// Bases placed by clustering the locations onto the catalog.
    Automatic,
    /// Bases chosen by density scoring among the named catalog cities.
    Restricted { allowed: Vec<String> },
    /// Specific teams pinned to named catalog cities; the rest are placed automatically.
    Pinned { pins: Vec<TeamPin> },
    /// Caller-supplied coordinates used first; the rest are placed automatically.
    Custom { bases: Vec<CandidateBase> },
}

/// A team locked to a named catalog city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPin {
    pub team: u32,
    pub city: String,
}

impl TeamPin {
    pub fn new(team: u32, city: impl Into<String>) -> Self {
        Self {
            team,
            city: city.into(),
        }
    }
}

/// Preset defaults for the two kinds of field work the planner is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Profile {
    /// Charge-point installation projects, filtered on yearly energy volume.
    Migration,
    /// Field service visits, filtered on priority.
    Service,
}

/// Every recognized planner option; missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerConfig {
    pub labor_cost_per_hour: f64,
    pub team_size: u32,
    pub vehicle_cost_per_km: f64,
    pub hotel_cost_per_night: f64,
    pub max_distance_from_home_km: f64,
    pub max_daily_distance_km: f64,
    pub work_hours_per_day: f64,
    pub max_drive_hours_per_day: f64,
    pub min_teams: usize,
    pub max_teams: usize,
    pub road_factor: f64,
    pub pause_minutes_per_two_hours: f64,
    pub navigation_minutes_per_stop: f64,
    pub setup_minutes: f64,
    pub work_minutes_per_unit: f64,
    pub filter: FilterMode,
    pub exclude_customer_substrings: Vec<String>,
    pub home_base_mode: HomeBaseMode,
    /// Average driving speed used to turn distance into drive time.
    pub driving_speed_kmh: f64,
    /// Fraction knocked off the home-return cost when weighing it against a hotel.
    pub home_return_discount: f64,
    /// Schedule Saturdays and Sundays like any other day.
    pub work_every_day: bool,
    /// First day of the simulation; today when absent.
    pub start_date: Option<NaiveDate>,
    pub two_opt_max_passes: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            labor_cost_per_hour: 500.0,
            team_size: 2,
            vehicle_cost_per_km: 2.5,
            hotel_cost_per_night: 2000.0,
            max_distance_from_home_km: 500.0,
            max_daily_distance_km: 400.0,
            work_hours_per_day: 8.0,
            max_drive_hours_per_day: 5.0,
            min_teams: 5,
            max_teams: 8,
            road_factor: DEFAULT_ROAD_FACTOR,
            pause_minutes_per_two_hours: 15.0,
            navigation_minutes_per_stop: 3.0,
            setup_minutes: 10.0,
            work_minutes_per_unit: 6.0,
            filter: FilterMode::Aggregate {
                min_filter_value: 100_000.0,
            },
            exclude_customer_substrings: Vec::new(),
            home_base_mode: HomeBaseMode::Automatic,
            driving_speed_kmh: 80.0,
            home_return_discount: 0.10,
            work_every_day: false,
            start_date: None,
            two_opt_max_passes: 50,
        }
    }
}

impl PlannerConfig {
    /// Defaults tuned for a project profile.
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Migration => Self {
                exclude_customer_substrings: vec![
                    "Skistar".to_string(),
                    "Helsingborgs Stad".to_string(),
                ],
                ..Self::default()
            },
            Profile::Service => Self {
                labor_cost_per_hour: 750.0,
                team_size: 1,
                vehicle_cost_per_km: 3.5,
                hotel_cost_per_night: 1500.0,
                work_minutes_per_unit: 45.0,
                filter: FilterMode::Threshold {
                    priority_threshold: 1.0,
                },
                ..Self::default()
            },
        }
    }

    /// Parse a camelCase JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("drivingSpeedKmh", self.driving_speed_kmh),
            ("workHoursPerDay", self.work_hours_per_day),
            ("maxDriveHoursPerDay", self.max_drive_hours_per_day),
            ("maxDailyDistanceKm", self.max_daily_distance_km),
            ("maxDistanceFromHomeKm", self.max_distance_from_home_km),
            ("roadFactor", self.road_factor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PlannerError::InvalidConfig(format!("{name} must be positive")));
            }
        }

        let non_negative = [
            ("laborCostPerHour", self.labor_cost_per_hour),
            ("vehicleCostPerKm", self.vehicle_cost_per_km),
            ("hotelCostPerNight", self.hotel_cost_per_night),
            ("pauseMinutesPerTwoHours", self.pause_minutes_per_two_hours),
            ("navigationMinutesPerStop", self.navigation_minutes_per_stop),
            ("setupMinutes", self.setup_minutes),
            ("workMinutesPerUnit", self.work_minutes_per_unit),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PlannerError::InvalidConfig(format!("{name} must not be negative")));
            }
        }

        if self.team_size == 0 {
            return Err(PlannerError::InvalidConfig("teamSize must be at least 1".into()));
        }
        if self.min_teams == 0 || self.min_teams > self.max_teams {
            return Err(PlannerError::InvalidConfig(format!(
                "team range {}..={} is empty",
                self.min_teams, self.max_teams
            )));
        }
        if !(0.0..1.0).contains(&self.home_return_discount) {
            return Err(PlannerError::InvalidConfig(
                "homeReturnDiscount must be in [0, 1)".into(),
            ));
        }

        Ok(())
    }

    /// Work-speed multiplier for the configured crew size.
    pub fn efficiency_factor(&self) -> f64 {
        match self.team_size {
            0 | 1 => 1.0,
            n => 1.0 + f64::from(n - 1) * 0.8,
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}
