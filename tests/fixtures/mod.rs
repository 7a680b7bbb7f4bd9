//! Test fixtures for crew-planner.
//!
//! Provides realistic test data including:
//! - Real Swedish charge-point sites grouped by region
//! - Builders for locations, teams and planner configurations

#![allow(dead_code)]

pub mod swedish_sites;

pub use swedish_sites::*;

use chrono::NaiveDate;
use crew_planner::{Location, PlannerConfig, Team};

/// Monday, so the first simulated day is never rolled forward.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
}

pub fn friday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
}

/// Install a test log subscriber once; `RUST_LOG` controls the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builder for test locations with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestLocation {
    id: String,
    position: (f64, f64),
    units: u32,
    work_time: f64,
}

impl TestLocation {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            position: (0.0, 0.0),
            units: 2,
            work_time: 1.0,
        }
    }

    pub fn at(mut self, site: &Site) -> Self {
        self.position = site.coords();
        self
    }

    pub fn position(mut self, lat: f64, lng: f64) -> Self {
        self.position = (lat, lng);
        self
    }

    pub fn work_time(mut self, hours: f64) -> Self {
        self.work_time = hours;
        self
    }

    pub fn build(self) -> Location {
        Location {
            customer: self.id.clone(),
            id: self.id,
            latitude: self.position.0,
            longitude: self.position.1,
            units: self.units,
            filter_value: 0.0,
            work_time: self.work_time,
        }
    }
}

/// One location per site, named after the site.
pub fn locations_at(sites: &[Site]) -> Vec<Location> {
    sites
        .iter()
        .map(|site| TestLocation::new(site.name).at(site).build())
        .collect()
}

pub fn team_at(id: u32, site: &Site) -> Team {
    Team {
        id,
        home_base: site.coords(),
        home_name: site.name.to_string(),
    }
}

/// Default configuration starting on a Monday with the given team range.
pub fn config(min_teams: usize, max_teams: usize) -> PlannerConfig {
    PlannerConfig {
        min_teams,
        max_teams,
        start_date: Some(monday()),
        ..PlannerConfig::default()
    }
}

/// Daily caps loose enough that only the 8 hour day can end a day.
pub fn generous_config() -> PlannerConfig {
    PlannerConfig {
        work_hours_per_day: 24.0,
        max_drive_hours_per_day: 24.0,
        max_daily_distance_km: 10_000.0,
        ..config(1, 1)
    }
}
