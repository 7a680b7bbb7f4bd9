//! crew-planner core
//!
//! Plans multi-day field work for mobile crews: filters work locations,
//! places home bases, assigns and orders stops, simulates working days with
//! hotel-or-home decisions, prices the result and searches for the cheapest
//! fleet size.

pub mod assign;
pub mod catalog;
pub mod config;
pub mod cost;
pub mod error;
pub mod filter;
pub mod haversine;
pub mod home_base;
pub mod model;
pub mod polyline;
pub mod route;
pub mod schedule;
pub mod solver;
pub mod traits;

pub use catalog::CandidateBaseCatalog;
pub use config::{FilterMode, HomeBaseMode, PlannerConfig, Profile, TeamPin};
pub use error::{PlannerError, Result};
pub use filter::{ColumnMapping, Record, RecordTable};
pub use model::{CandidateBase, Location, RouteSegment, Team, TeamRoute};
pub use solver::{plan, plan_table, solve, CancelFlag, CandidateOutcome, PlannerResult};
