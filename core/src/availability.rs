//! Availability aggregation — the fraction of each sprint a member is
//! actually present, after clipping the window to their employment period
//! and subtracting every absence-like day exactly once.

use crate::{
    config::TeamMember,
    event::{AbsenceEvent, BankHoliday, DutyAssignment, DutyKind},
    sprint::Sprint,
    types::PersonId,
};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

/// Everything the aggregator needs for one sprint window, already fetched
/// and filtered to it. Duty assignments must use identity names (the
/// planner maps roster aliases back before aggregation).
#[derive(Debug, Clone, Copy, Default)]
pub struct SprintInputs<'a> {
    pub absences:     &'a [AbsenceEvent],
    pub duties:       &'a [DutyAssignment],
    pub holidays:     &'a [BankHoliday],
    pub social_dates: &'a [NaiveDate],
}

/// One member's availability for one sprint.
#[derive(Debug, Clone, Serialize)]
pub struct MemberAvailability {
    pub name: PersonId,
    /// Fraction of the sprint window the member is present, in [0, 1].
    pub fraction: f64,
    /// Window days inside the member's active employment period.
    pub active_days: i64,
    /// Active days left after absences, socials, and bank holidays.
    pub available_days: i64,
    pub absent_days: i64,
    pub primary_duty_days: i64,
    pub secondary_duty_days: i64,
    /// Flat ramp multiplier applied to the fraction, when below 1.
    pub ramp: Option<f64>,
    pub joins_this_sprint: bool,
    pub leaves_this_sprint: bool,
}

/// A person-day simultaneously on duty and covered by an absence.
/// A flagged inconsistency for the caller to surface — processing
/// continues and the availability fraction is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DutyConflict {
    pub person: PersonId,
    pub date:   NaiveDate,
    pub duty:   DutyKind,
}

/// The fraction of `sprint` the member is present and working, in [0, 1].
pub fn available_fraction(member: &TeamMember, sprint: &Sprint, inputs: SprintInputs<'_>) -> f64 {
    assess_member(member, sprint, inputs).fraction
}

/// Full availability assessment for one member and one sprint.
///
/// The fraction is `available_days / window_days` — the denominator stays
/// the full window even when the active period clips it, so a mid-sprint
/// joiner contributes proportionally. Duty days are deliberately not
/// subtracted: a person on call still counts as present for capacity.
pub fn assess_member(
    member: &TeamMember,
    sprint: &Sprint,
    inputs: SprintInputs<'_>,
) -> MemberAvailability {
    let window_days = sprint.len_days();

    let (raw_fraction, active_days, available_days, absent_days) =
        match active_range(member, sprint) {
            None => (0.0, 0, 0, 0),
            Some((start, end)) => {
                let active = (end - start).num_days();
                let excluded = excluded_days(&member.name, start, end, inputs).len() as i64;
                let available = (active - excluded).max(0);
                let fraction = if window_days > 0 {
                    available as f64 / window_days as f64
                } else {
                    0.0
                };
                (fraction, active, available, excluded)
            }
        };

    // Flat multiplier for the whole active period, not a day-by-day taper.
    let ramp = (member.start_date.is_some() && member.start_pct < 1.0 && active_days > 0)
        .then_some(member.start_pct);
    let fraction = (raw_fraction * ramp.unwrap_or(1.0)).clamp(0.0, 1.0);

    let duty_days = |kind: DutyKind| -> i64 {
        inputs
            .duties
            .iter()
            .filter(|d| d.kind == kind && d.person == member.name)
            .map(|d| d.days_within(sprint.start, sprint.end))
            .sum()
    };

    MemberAvailability {
        name: member.name.clone(),
        fraction,
        active_days,
        available_days,
        absent_days,
        primary_duty_days: duty_days(DutyKind::Primary),
        secondary_duty_days: duty_days(DutyKind::Secondary),
        ramp,
        joins_this_sprint: member.start_date.is_some_and(|d| sprint.contains(d)),
        leaves_this_sprint: member.leave_date.is_some_and(|d| sprint.contains(d)),
    }
}

/// Person-days on duty while also absent, in chronological order.
pub fn duty_conflicts(
    absences: &[AbsenceEvent],
    duties: &[DutyAssignment],
) -> Vec<DutyConflict> {
    let mut conflicts = Vec::new();
    for duty in duties {
        let mut date = duty.start;
        while date < duty.end {
            let absent = absences
                .iter()
                .any(|a| a.person == duty.person && a.start <= date && date < a.end);
            if absent {
                conflicts.push(DutyConflict {
                    person: duty.person.clone(),
                    date,
                    duty: duty.kind,
                });
            }
            date += Duration::days(1);
        }
    }
    conflicts.sort_by(|a, b| (a.date, &a.person).cmp(&(b.date, &b.person)));
    conflicts
}

/// Clip the sprint window to the member's active period
/// `[start_date, leave_date)`. None when the member is wholly outside it.
fn active_range(member: &TeamMember, sprint: &Sprint) -> Option<(NaiveDate, NaiveDate)> {
    let mut start = sprint.start;
    let mut end = sprint.end;
    if let Some(joined) = member.start_date {
        if joined >= end {
            return None;
        }
        if joined > start {
            start = joined;
        }
    }
    if let Some(left) = member.leave_date {
        if left <= start {
            return None;
        }
        if left < end {
            end = left;
        }
    }
    (start < end).then_some((start, end))
}

/// Days inside `[start, end)` taken out by an absence, a social date, or a
/// bank holiday. Overlapping ranges collapse into the set — a day is only
/// ever subtracted once, whatever mixture of kinds covers it.
fn excluded_days(
    person: &str,
    start: NaiveDate,
    end: NaiveDate,
    inputs: SprintInputs<'_>,
) -> BTreeSet<NaiveDate> {
    let mut days = BTreeSet::new();
    for event in inputs.absences.iter().filter(|a| a.person == person) {
        let mut date = event.start.max(start);
        let until = event.end.min(end);
        while date < until {
            days.insert(date);
            date += Duration::days(1);
        }
    }
    for date in inputs.social_dates {
        if start <= *date && *date < end {
            days.insert(*date);
        }
    }
    for holiday in inputs.holidays {
        if start <= holiday.date && holiday.date < end {
            days.insert(holiday.date);
        }
    }
    days
}
