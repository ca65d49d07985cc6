//! Capacity calculation tests — the pure multiplier chain.

use sprintcap_core::availability::MemberAvailability;
use sprintcap_core::capacity::{breakdown, sprint_capacity, team_availability};
use sprintcap_core::config::PlannerConfig;

fn row(name: &str, fraction: f64) -> MemberAvailability {
    MemberAvailability {
        name: name.into(),
        fraction,
        active_days: 10,
        available_days: 10,
        absent_days: 0,
        primary_duty_days: 0,
        secondary_duty_days: 0,
        ramp: None,
        joins_this_sprint: false,
        leaves_this_sprint: false,
    }
}

/// Team availability is the plain sum of fractions — members are uniformly
/// weighted at 1.0 each.
#[test]
fn availability_sums_uniformly() {
    let members = vec![row("a", 1.0), row("b", 0.5), row("c", 0.0)];
    assert!((team_availability(&members) - 1.5).abs() < 1e-12);
}

/// The worked example: availability 4.25 with point_capacity 0.85,
/// load_factor 0.8, engineering_split 0.3, points_per_epic 9 yields
/// about 7.803 story points.
#[test]
fn capacity_matches_worked_example() {
    let config = PlannerConfig::default_test();
    let team = &config.teams[0];
    let members = vec![
        row("a", 1.0),
        row("b", 1.0),
        row("c", 1.0),
        row("d", 1.0),
        row("e", 0.25),
    ];
    let availability = team_availability(&members);
    assert!((availability - 4.25).abs() < 1e-12);
    let points = sprint_capacity(team, availability);
    assert!((points - 7.803).abs() < 1e-9, "got {points}");
}

/// The calculator is a pure function: identical inputs give identical
/// outputs, bit for bit.
#[test]
fn capacity_is_deterministic() {
    let config = PlannerConfig::default_test();
    let team = &config.teams[0];
    let a = sprint_capacity(team, 3.7);
    let b = sprint_capacity(team, 3.7);
    assert_eq!(a.to_bits(), b.to_bits());
}

/// The breakdown is internally consistent: engineering plus product equals
/// the total, and the headline capacity is the engineering share.
#[test]
fn breakdown_is_consistent() {
    let config = PlannerConfig::default_test();
    let team = &config.teams[0];
    let split = breakdown(team, 4.25);
    assert!(
        (split.engineering_points + split.product_points - split.total_points).abs() < 1e-9
    );
    assert!((split.engineering_points - sprint_capacity(team, 4.25)).abs() < 1e-12);
}

/// An empty team has zero availability and zero capacity.
#[test]
fn empty_team_has_zero_capacity() {
    let config = PlannerConfig::default_test();
    let team = &config.teams[0];
    assert_eq!(team_availability(&[]), 0.0);
    assert_eq!(sprint_capacity(team, 0.0), 0.0);
}
