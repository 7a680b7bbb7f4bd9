//! Multi-day simulation tests using real Swedish sites.
//!
//! Stockholm is home for every scenario; stops range from the inner
//! suburbs to the far north.

mod fixtures;

use chrono::{Datelike, Weekday};

use crew_planner::cost::CostModel;
use crew_planner::haversine::RoadDistance;
use crew_planner::model::{Location, TeamRoute};
use crew_planner::schedule::{DaySimulator, NEAR_HOME_KM};
use crew_planner::traits::{DistanceMatrixProvider, Positioned};
use crew_planner::PlannerConfig;

use fixtures::{
    STOCKHOLM, STOCKHOLM_CITY, SUNDSVALL, TestLocation, UMEA, UPPSALA_CITY, LULEA, KIRUNA, config,
    friday, generous_config, locations_at, monday, team_at,
};

fn simulate(config: &PlannerConfig, route: &[Location]) -> TeamRoute {
    fixtures::init_tracing();
    let metric = RoadDistance::new(config.road_factor);
    let team = team_at(1, &STOCKHOLM_CITY);
    let segments = DaySimulator::from_config(config, &metric).simulate(&team, route);
    TeamRoute::from_segments(team, segments, &CostModel::from_config(config))
}

fn northbound() -> Vec<Location> {
    vec![
        TestLocation::new("sundsvall").at(&SUNDSVALL).build(),
        TestLocation::new("umea").at(&UMEA).build(),
        TestLocation::new("lulea").at(&LULEA).build(),
        TestLocation::new("kiruna").at(&KIRUNA).build(),
    ]
}

#[test]
fn test_two_nearby_stops_fit_in_one_day() {
    let route = vec![
        TestLocation::new("A").at(&STOCKHOLM_CITY).build(),
        TestLocation::new("B").at(&UPPSALA_CITY).build(),
    ];
    let result = simulate(&generous_config(), &route);

    assert_eq!(result.stop_count(), 2);
    assert_eq!(result.hotel_nights, 0, "Both stops are near home");
    assert_eq!(result.total_days, 1);
    for segment in &result.segments {
        assert_eq!(segment.arrival_time.date(), monday(), "{} must be on day 1", segment.location.id);
    }
}

#[test]
fn test_near_home_stops_never_overnight() {
    // Long jobs force several working days around Stockholm.
    let route: Vec<Location> = STOCKHOLM
        .iter()
        .map(|site| TestLocation::new(site.name).at(site).work_time(3.5).build())
        .collect();
    let result = simulate(&config(1, 1), &route);

    assert!(result.total_days > 1, "Expected the work to span several days");
    assert_eq!(result.hotel_nights, 0);
    assert!(result.segments.iter().all(|s| !s.overnight_stay));
}

#[test]
fn test_friday_sends_team_home_for_the_weekend() {
    let mut cfg = config(1, 1);
    cfg.start_date = Some(friday());
    let result = simulate(&cfg, &northbound()[..2]);

    let first = &result.segments[0];
    let second = &result.segments[1];
    assert_eq!(first.arrival_time.weekday(), Weekday::Fri);
    assert_eq!(second.arrival_time.weekday(), Weekday::Mon, "Friday ends at home, work resumes Monday");
    assert!(!second.overnight_stay, "No hotel over the weekend");

    // The evening drive home is booked onto the Monday stop.
    let metric = RoadDistance::default();
    let home_to_umea = metric.distance_km(STOCKHOLM_CITY.coords(), UMEA.coords());
    assert!(second.drive_distance > home_to_umea);
}

#[test]
fn test_work_every_day_keeps_weekends() {
    let mut cfg = config(1, 1);
    cfg.start_date = Some(friday());
    cfg.work_every_day = true;
    let result = simulate(&cfg, &northbound()[..2]);

    let second = result.segments[1].arrival_time.date();
    assert!(
        second.weekday() == Weekday::Fri || second.weekday() == Weekday::Sat,
        "Expected the second stop before Monday, got {second}"
    );
}

#[test]
fn test_far_stops_use_hotels() {
    let result = simulate(&config(1, 1), &northbound());
    let metric = RoadDistance::default();
    let home = STOCKHOLM_CITY.coords();

    assert!(result.hotel_nights >= 1, "A trip to Kiruna cannot return home nightly");
    for segment in result.segments.iter().filter(|s| s.overnight_stay) {
        let km = metric.distance_km(home, segment.location.position());
        assert!(km > NEAR_HOME_KM, "{} is only {km:.0} km from home", segment.location.id);
    }
}

#[test]
fn test_hotel_flag_marks_stop_after_the_night() {
    let result = simulate(&config(1, 1), &northbound());

    assert!(!result.segments[0].overnight_stay, "The first stop is reached from home");
    for pair in result.segments.windows(2) {
        if pair[1].overnight_stay {
            assert!(
                pair[1].arrival_time.date() > pair[0].departure_time.date(),
                "{} is flagged but reached the same day as {}",
                pair[1].location.id,
                pair[0].location.id
            );
        }
    }
}

#[test]
fn test_segments_are_time_ordered() {
    let mut route = locations_at(STOCKHOLM);
    route.extend(northbound());
    let result = simulate(&config(1, 1), &route);

    for pair in result.segments.windows(2) {
        assert!(
            pair[0].departure_time < pair[1].arrival_time,
            "{} must finish before {} starts",
            pair[0].location.id,
            pair[1].location.id
        );
    }
    for segment in &result.segments {
        assert!(segment.arrival_time <= segment.departure_time);
        assert!(segment.drive_distance >= 0.0 && segment.drive_time >= 0.0);
        assert!(
            !matches!(segment.arrival_time.weekday(), Weekday::Sat | Weekday::Sun),
            "{} scheduled on a weekend",
            segment.location.id
        );
    }
}

#[test]
fn test_route_totals_match_segments() {
    let mut route = locations_at(STOCKHOLM);
    route.extend(northbound());
    let cfg = config(1, 1);
    let result = simulate(&cfg, &route);

    let distance: f64 = result.segments.iter().map(|s| s.drive_distance).sum();
    let drive: f64 = result.segments.iter().map(|s| s.drive_time).sum();
    let work: f64 = result.segments.iter().map(|s| s.work_time).sum();
    assert!((result.total_distance - distance).abs() < 1e-6);
    assert!((result.total_drive_time - drive).abs() < 1e-6);
    assert!((result.total_work_time - work).abs() < 1e-6);

    let recomputed = CostModel::from_config(&cfg).cost(&result);
    assert!((recomputed - result.total_cost).abs() < 1e-6);
}
