//! Input records to locations.
//!
//! Raw tables arrive with string cells; they are normalized into typed
//! records, filtered per the configured mode and exclusion list, and turned
//! into [`Location`]s with a per-visit work duration.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::{FilterMode, PlannerConfig};
use crate::error::{PlannerError, Result};
use crate::haversine::validate_coordinate;
use crate::model::Location;

/// Which table columns hold the fields the planner needs.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub customer: String,
    pub latitude: String,
    pub longitude: String,
    pub units: String,
    pub filter_value: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            customer: "customer".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
            units: "units".to_string(),
            filter_value: "filter_value".to_string(),
        }
    }
}

/// A table of string cells with a header row.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One normalized input row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub customer: String,
    pub latitude: f64,
    pub longitude: f64,
    pub units: u32,
    pub filter_value: Option<f64>,
}

impl Record {
    pub fn new(customer: impl Into<String>, latitude: f64, longitude: f64, units: u32, filter_value: f64) -> Self {
        Self {
            customer: customer.into(),
            latitude,
            longitude,
            units,
            filter_value: Some(filter_value),
        }
    }
}

impl RecordTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Parse rows into records.
    ///
    /// Missing columns are fatal. Rows whose coordinates do not parse are
    /// dropped. Decimal unit counts are truncated; unit counts that do not
    /// parse count as one unit.
    pub fn into_records(self, mapping: &ColumnMapping) -> Result<Vec<Record>> {
        let index: HashMap<&str, usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let required = [
            &mapping.customer,
            &mapping.latitude,
            &mapping.longitude,
            &mapping.units,
            &mapping.filter_value,
        ];
        let missing: Vec<String> = required
            .iter()
            .filter(|name| !index.contains_key(name.as_str()))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PlannerError::MissingColumns(missing));
        }

        let col = |name: &String| index[name.as_str()];
        let (customer, lat, lon, units, value) = (
            col(&mapping.customer),
            col(&mapping.latitude),
            col(&mapping.longitude),
            col(&mapping.units),
            col(&mapping.filter_value),
        );

        let mut records = Vec::with_capacity(self.rows.len());
        for (row_idx, row) in self.rows.iter().enumerate() {
            let cell = |i: usize| row.get(i).map(|s| s.trim()).unwrap_or("");

            let (Some(latitude), Some(longitude)) = (parse_number(cell(lat)), parse_number(cell(lon))) else {
                warn!(row = row_idx, "dropping row with non-numeric coordinates");
                continue;
            };

            records.push(Record {
                customer: cell(customer).to_string(),
                latitude,
                longitude,
                units: parse_units(cell(units)),
                filter_value: parse_number(cell(value)),
            });
        }

        Ok(records)
    }
}

/// Accepts both `.` and `,` as decimal separator.
fn parse_number(raw: &str) -> Option<f64> {
    let value = raw.replace(',', ".").parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Whole units from a numeric cell; `"3.0"` and `"4,0"` count as 3 and 4.
///
/// Text, negative or non-finite cells count as one unit.
fn parse_units(raw: &str) -> u32 {
    match parse_number(raw) {
        Some(value) if value >= 0.0 => value.trunc().min(f64::from(u32::MAX)) as u32,
        _ => 1,
    }
}

/// Applies domain filters and builds locations.
#[derive(Debug, Clone)]
pub struct LocationFilter {
    pub mode: FilterMode,
    pub exclude_customer_substrings: Vec<String>,
    pub setup_minutes: f64,
    pub work_minutes_per_unit: f64,
    pub efficiency_factor: f64,
}

impl LocationFilter {
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            mode: config.filter.clone(),
            exclude_customer_substrings: config.exclude_customer_substrings.clone(),
            setup_minutes: config.setup_minutes,
            work_minutes_per_unit: config.work_minutes_per_unit,
            efficiency_factor: config.efficiency_factor(),
        }
    }

    /// Filter the records and convert the survivors to locations.
    pub fn apply(&self, records: &[Record]) -> Result<Vec<Location>> {
        let valid: Vec<(usize, &Record)> = records
            .iter()
            .enumerate()
            .filter(|(idx, r)| match validate_coordinate(r.latitude, r.longitude) {
                Ok(()) => true,
                Err(err) => {
                    warn!(record = idx, %err, "dropping record");
                    false
                }
            })
            .collect();

        let kept: Vec<(usize, &Record)> = match &self.mode {
            FilterMode::Aggregate { min_filter_value } => {
                let mut sums: HashMap<&str, f64> = HashMap::new();
                for &(_, record) in &valid {
                    *sums.entry(record.customer.as_str()).or_default() +=
                        record.filter_value.unwrap_or(0.0);
                }
                valid
                    .into_iter()
                    .filter(|(_, r)| sums[r.customer.as_str()] >= *min_filter_value)
                    .collect()
            }
            FilterMode::Threshold { priority_threshold } => valid
                .into_iter()
                .filter(|(_, r)| r.filter_value.is_some_and(|v| v <= *priority_threshold))
                .collect(),
        };

        let locations: Vec<Location> = kept
            .into_iter()
            .filter(|(_, r)| !self.is_excluded(&r.customer))
            .map(|(idx, r)| self.to_location(idx, r))
            .collect();

        debug!(input = records.len(), kept = locations.len(), "filtered records");

        if locations.is_empty() {
            return Err(PlannerError::NoLocationsAfterFilter);
        }
        Ok(locations)
    }

    fn is_excluded(&self, customer: &str) -> bool {
        let customer = customer.to_lowercase();
        self.exclude_customer_substrings
            .iter()
            .filter(|term| !term.is_empty())
            .any(|term| customer.contains(&term.to_lowercase()))
    }

    /// Hours one visit takes for the configured crew.
    pub fn work_hours(&self, units: u32) -> f64 {
        let minutes = self.setup_minutes + f64::from(units) * self.work_minutes_per_unit;
        minutes / 60.0 / self.efficiency_factor
    }

    fn to_location(&self, idx: usize, record: &Record) -> Location {
        Location {
            id: format!("LOC_{idx}"),
            customer: record.customer.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            units: record.units,
            filter_value: record.filter_value.unwrap_or(0.0),
            work_time: self.work_hours(record.units),
        }
    }
}
