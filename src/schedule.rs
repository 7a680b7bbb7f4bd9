//! Multi-day execution of a team route.
//!
//! Walks the ordered stops with a simulated clock, tracking per-day drive
//! time, work time, distance and elapsed time. Before each stop the simulator
//! decides whether the day goes on, the team drives home for the night, or
//! the team takes a hotel night where it is and reaches the stop next morning.
//!
//! The first stop of every day is always visited, whatever the weekday or
//! its distance from home. This includes a far stop that opens a Friday: it
//! is worked that Friday, and the Friday rule only sends the team home before
//! the day's second stop.
//!
//! From the second stop of a day, rules apply highest priority first:
//! 1. Stops within 100 km of home never cause a hotel night. The team goes
//!    home first if the stop plus the trip home would break the 8 hour day.
//! 2. On Fridays the team goes home instead of driving to a further stop.
//! 3. If a daily limit would be exceeded, a hotel is mandatory when the trip
//!    home would break the 8 hour day; otherwise the cheaper of hotel and
//!    home return wins, ties going home.
//! 4. Otherwise the day goes on.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use tracing::debug;

use crate::config::PlannerConfig;
use crate::cost::CostModel;
use crate::model::{Location, RouteSegment, Team};
use crate::traits::{DistanceMatrixProvider, Positioned};

/// Hour of day when work starts.
pub const DAY_START_HOUR: i64 = 7;
/// Cap on a day's total time away, from leaving to arriving home or at a hotel.
pub const MAX_ELAPSED_DAY_HOURS: f64 = 8.0;
/// Stops this close to home never cause a hotel night.
pub const NEAR_HOME_KM: f64 = 100.0;
/// A pause is due each time a day's driving crosses a multiple of this.
const PAUSE_INTERVAL_HOURS: f64 = 2.0;

/// What happens before the team heads to the next stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOutcome {
    Continue,
    ReturnHome,
    Hotel,
}

/// Which rule produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionRule {
    FreshDay,
    NearHome,
    Friday,
    MandatoryHotel,
    CostComparison,
    WithinLimits,
}

/// An outcome together with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub outcome: DayOutcome,
    pub rule: DecisionRule,
}

impl Decision {
    fn new(outcome: DayOutcome, rule: DecisionRule) -> Self {
        Self { outcome, rule }
    }
}

/// Accumulators for the day in progress.
#[derive(Debug, Clone)]
pub struct DayState {
    pub clock: NaiveDateTime,
    pub position: (f64, f64),
    pub drive_hours: f64,
    pub work_hours: f64,
    pub distance_km: f64,
    pub elapsed_hours: f64,
    pub stops: usize,
}

impl DayState {
    fn start(clock: NaiveDateTime, position: (f64, f64)) -> Self {
        Self {
            clock,
            position,
            drive_hours: 0.0,
            work_hours: 0.0,
            distance_km: 0.0,
            elapsed_hours: 0.0,
            stops: 0,
        }
    }
}

/// The candidate stop as seen from the current day.
#[derive(Debug, Clone, Copy)]
pub struct StopContext {
    pub drive_km: f64,
    /// Driving including navigation and pauses.
    pub drive_hours: f64,
    pub work_hours: f64,
    pub km_to_home: f64,
    pub hours_to_home: f64,
    /// Distance from home to the stop after this one, zero for the last stop.
    pub km_home_to_next: f64,
}

#[derive(Debug, Clone, Copy)]
struct Leg {
    km: f64,
    hours: f64,
}

/// Daily caps and time overheads applied during simulation.
#[derive(Debug, Clone)]
pub struct DayLimits {
    pub work_hours_per_day: f64,
    pub max_drive_hours_per_day: f64,
    pub max_daily_distance_km: f64,
    pub driving_speed_kmh: f64,
    pub pause_hours: f64,
    pub navigation_hours: f64,
    pub home_return_discount: f64,
    pub work_every_day: bool,
}

impl DayLimits {
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            work_hours_per_day: config.work_hours_per_day,
            max_drive_hours_per_day: config.max_drive_hours_per_day,
            max_daily_distance_km: config.max_daily_distance_km,
            driving_speed_kmh: config.driving_speed_kmh,
            pause_hours: config.pause_minutes_per_two_hours / 60.0,
            navigation_hours: config.navigation_minutes_per_stop / 60.0,
            home_return_discount: config.home_return_discount,
            work_every_day: config.work_every_day,
        }
    }
}

/// Turns an ordered route into timed segments over one or more days.
pub struct DaySimulator<'a, M> {
    limits: DayLimits,
    cost: CostModel,
    start_date: NaiveDate,
    metric: &'a M,
}

impl<'a, M: DistanceMatrixProvider> DaySimulator<'a, M> {
    pub fn new(limits: DayLimits, cost: CostModel, start_date: NaiveDate, metric: &'a M) -> Self {
        Self {
            limits,
            cost,
            start_date,
            metric,
        }
    }

    pub fn from_config(config: &PlannerConfig, metric: &'a M) -> Self {
        Self::new(
            DayLimits::from_config(config),
            CostModel::from_config(config),
            config.first_day(),
            metric,
        )
    }

    /// Simulate the route and return one segment per stop, in order.
    pub fn simulate(&self, team: &Team, route: &[Location]) -> Vec<RouteSegment> {
        let home = team.position();
        let mut day = DayState::start(self.day_start(self.start_date), home);
        let mut segments = Vec::with_capacity(route.len());

        for (i, stop) in route.iter().enumerate() {
            let leg = self.leg(day.position, stop.position(), day.drive_hours);
            let km_to_home = self.metric.distance_km(stop.position(), home);
            let ctx = StopContext {
                drive_km: leg.km,
                drive_hours: leg.hours,
                work_hours: stop.work_time,
                km_to_home,
                hours_to_home: km_to_home / self.limits.driving_speed_kmh,
                km_home_to_next: route
                    .get(i + 1)
                    .map(|next| self.metric.distance_km(home, next.position()))
                    .unwrap_or(0.0),
            };

            let decision = self.decide(&day, &ctx);
            debug!(
                team = team.id,
                stop = %stop.id,
                outcome = ?decision.outcome,
                rule = ?decision.rule,
                "stop decision"
            );

            // The leg actually driven to reach the stop, plus any evening
            // drive home that is booked onto this stop.
            let (leg, extra) = match decision.outcome {
                DayOutcome::Continue => (leg, Leg { km: 0.0, hours: 0.0 }),
                DayOutcome::Hotel => {
                    day = DayState::start(self.next_day(day.clock), day.position);
                    (self.leg(day.position, stop.position(), 0.0), Leg { km: 0.0, hours: 0.0 })
                }
                DayOutcome::ReturnHome => {
                    let km = self.metric.distance_km(day.position, home);
                    let evening = Leg {
                        km,
                        hours: km / self.limits.driving_speed_kmh,
                    };
                    day = DayState::start(self.next_day(day.clock), home);
                    (self.leg(home, stop.position(), 0.0), evening)
                }
            };

            let arrival = day.clock + hours(leg.hours);
            let departure = arrival + hours(stop.work_time);

            segments.push(RouteSegment {
                location: stop.clone(),
                arrival_time: arrival,
                departure_time: departure,
                drive_time: leg.hours + extra.hours,
                drive_distance: leg.km + extra.km,
                work_time: stop.work_time,
                overnight_stay: decision.outcome == DayOutcome::Hotel,
            });

            day.drive_hours += leg.hours;
            day.distance_km += leg.km;
            day.work_hours += stop.work_time;
            day.elapsed_hours += leg.hours + stop.work_time;
            day.stops += 1;
            day.clock = departure;
            day.position = stop.position();
        }

        segments
    }

    /// Apply the rule hierarchy to one candidate stop.
    pub fn decide(&self, day: &DayState, ctx: &StopContext) -> Decision {
        if day.stops == 0 {
            return Decision::new(DayOutcome::Continue, DecisionRule::FreshDay);
        }

        let projected = day.elapsed_hours + ctx.drive_hours + ctx.work_hours;

        if ctx.km_to_home <= NEAR_HOME_KM {
            let outcome = if projected + ctx.hours_to_home > MAX_ELAPSED_DAY_HOURS {
                DayOutcome::ReturnHome
            } else {
                DayOutcome::Continue
            };
            return Decision::new(outcome, DecisionRule::NearHome);
        }

        if !self.limits.work_every_day && day.clock.weekday() == Weekday::Fri {
            return Decision::new(DayOutcome::ReturnHome, DecisionRule::Friday);
        }

        let exceeded = day.drive_hours + ctx.drive_hours > self.limits.max_drive_hours_per_day
            || day.work_hours + ctx.work_hours > self.limits.work_hours_per_day
            || day.distance_km + ctx.drive_km > self.limits.max_daily_distance_km
            || projected > MAX_ELAPSED_DAY_HOURS;

        if !exceeded {
            return Decision::new(DayOutcome::Continue, DecisionRule::WithinLimits);
        }

        if projected + ctx.hours_to_home > MAX_ELAPSED_DAY_HOURS {
            return Decision::new(DayOutcome::Hotel, DecisionRule::MandatoryHotel);
        }

        let round_trip_km = ctx.km_to_home + ctx.km_home_to_next;
        let round_trip_hours = round_trip_km / self.limits.driving_speed_kmh;
        let home_cost =
            self.cost.trip(round_trip_km, round_trip_hours) * (1.0 - self.limits.home_return_discount);
        let hotel_cost = self.cost.hotel_night();

        let outcome = if hotel_cost < home_cost {
            DayOutcome::Hotel
        } else {
            DayOutcome::ReturnHome
        };
        Decision::new(outcome, DecisionRule::CostComparison)
    }

    /// Drive from `from` to `to` given the hours already driven today.
    fn leg(&self, from: (f64, f64), to: (f64, f64), driven_today: f64) -> Leg {
        let km = self.metric.distance_km(from, to);
        let mut hours = km / self.limits.driving_speed_kmh + self.limits.navigation_hours;

        let pauses = ((driven_today + hours) / PAUSE_INTERVAL_HOURS).floor()
            - (driven_today / PAUSE_INTERVAL_HOURS).floor();
        if pauses > 0.0 {
            hours += pauses * self.limits.pause_hours;
        }

        Leg { km, hours }
    }

    fn day_start(&self, date: NaiveDate) -> NaiveDateTime {
        let date = if self.limits.work_every_day {
            date
        } else {
            skip_weekend(date)
        };
        date.and_time(NaiveTime::MIN) + Duration::hours(DAY_START_HOUR)
    }

    fn next_day(&self, clock: NaiveDateTime) -> NaiveDateTime {
        self.day_start(clock.date() + Duration::days(1))
    }
}

/// Roll Saturdays and Sundays forward to Monday.
pub fn skip_weekend(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date + Duration::days(2),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

fn hours(value: f64) -> Duration {
    Duration::milliseconds((value * 3_600_000.0).round() as i64)
}
