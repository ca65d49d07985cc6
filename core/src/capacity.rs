//! Capacity calculation — converts summed availability into story points.
//!
//! Pure arithmetic: deterministic, no I/O, no rounding. Display formatting
//! is the caller's concern.

use crate::{availability::MemberAvailability, config::Team};
use serde::Serialize;

/// Sum of member availability fractions, uniformly weighted at 1.0 each.
/// Per-member FTE weighting is a reserved extension point.
pub fn team_availability(members: &[MemberAvailability]) -> f64 {
    members.iter().map(|m| m.fraction).sum()
}

/// Story-point capacity for one sprint: the engineering share of the
/// team's throughput under the configured multipliers.
pub fn sprint_capacity(team: &Team, team_availability: f64) -> f64 {
    team_availability
        * team.point_capacity
        * team.load_factor
        * team.engineering_split
        * team.points_per_epic
}

/// Point totals retained for reporting. The headline capacity number is
/// the engineering share; the product share is the remainder.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CapacityBreakdown {
    pub total_points: f64,
    pub engineering_points: f64,
    pub product_points: f64,
}

pub fn breakdown(team: &Team, team_availability: f64) -> CapacityBreakdown {
    let total =
        team_availability * team.point_capacity * team.load_factor * team.points_per_epic;
    let engineering = total * team.engineering_split;
    CapacityBreakdown {
        total_points: total,
        engineering_points: engineering,
        product_points: total - engineering,
    }
}
