//! Plan orchestration — wires sprint windows, cached source fetches,
//! availability aggregation, and capacity into per-sprint results.
//!
//! EXECUTION ORDER (single logical thread):
//!   1. Generate the sprint grid for the configured horizon.
//!   2. Fetch each data category once for the whole horizon, through the
//!      cache store.
//!   3. Per sprint: filter records to the window, assess every member,
//!      collect duty-conflict warnings, compute capacity.
//!
//! RULES:
//!   - A source fetch failure propagates. Partial data is never silently
//!     treated as "zero absences" — that would overstate capacity.
//!   - People of interest are reported for display only; they never enter
//!     the capacity math.

use crate::{
    availability::{self, DutyConflict, MemberAvailability, SprintInputs},
    cache::CacheStore,
    capacity::{self, CapacityBreakdown},
    config::{PlannerConfig, Team},
    error::PlanResult,
    event::{AbsenceEvent, BankHoliday, DutyAssignment},
    source::{self, AbsenceSource, DutySource, HolidaySource},
    sprint::{self, Sprint},
    types::PersonId,
};
use chrono::NaiveDate;
use serde::Serialize;

/// The wired set of upstream adapters. One absence source serves both the
/// team members and the people of interest (separate queries, separate
/// cache scopes).
pub struct SourceSet {
    pub absences: Box<dyn AbsenceSource>,
    pub duties:   Vec<Box<dyn DutySource>>,
    pub holidays: Box<dyn HolidaySource>,
}

/// Everything downstream rendering needs for one sprint window.
#[derive(Debug, Clone, Serialize)]
pub struct SprintPlan {
    pub sprint: Sprint,
    /// One row per team member, sorted by name.
    pub members: Vec<MemberAvailability>,
    /// Absences of people of interest overlapping this window. Display only.
    pub poi_absences: Vec<AbsenceEvent>,
    /// Duty assignments clipped to this window, identity names.
    pub duties: Vec<DutyAssignment>,
    pub conflicts: Vec<DutyConflict>,
    pub holidays: Vec<BankHoliday>,
    pub social_dates: Vec<NaiveDate>,
    pub team_availability: f64,
    /// Story points for the sprint (engineering share).
    pub capacity: f64,
    pub breakdown: CapacityBreakdown,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub team: Team,
    pub sprints: Vec<SprintPlan>,
}

pub struct Planner {
    config: PlannerConfig,
    cache: CacheStore,
    sources: SourceSet,
}

impl Planner {
    pub fn new(config: PlannerConfig, cache: CacheStore, sources: SourceSet) -> Self {
        Self {
            config,
            cache,
            sources,
        }
    }

    /// Build the full per-sprint capacity report for one team, anchored so
    /// `today` falls inside the first upcoming sprint.
    pub fn plan(&self, team_name: &str, today: NaiveDate) -> PlanResult<PlanReport> {
        let team = self.config.team(team_name)?.clone();
        let s = &self.config.settings;

        let sprints = sprint::generate(
            today,
            s.sprint_length_days,
            s.number_of_sprints,
            s.number_of_sprints_back,
            s.first_sprint_date,
            s.first_sprint_number,
        );
        let horizon_start = match sprints.first() {
            Some(first) => first.start,
            None => {
                return Ok(PlanReport {
                    team,
                    sprints: Vec::new(),
                })
            }
        };
        let horizon_end = sprints.last().map(|last| last.end).unwrap_or(horizon_start);
        log::debug!(
            "planning {} sprints for '{}' over {horizon_start}..{horizon_end}",
            sprints.len(),
            team.name
        );

        let member_names: Vec<PersonId> = team.members.iter().map(|m| m.name.clone()).collect();
        let roster_names: Vec<PersonId> = team
            .members
            .iter()
            .map(|m| m.roster_name().to_string())
            .collect();
        // The manager rides along with the people of interest, as in the
        // informational absence display.
        let mut poi_names = team.people_of_interest.clone();
        if !poi_names.contains(&team.manager) {
            poi_names.push(team.manager.clone());
        }

        let absences = self.cached_absences("team", horizon_start, horizon_end, &member_names)?;
        let poi_absences = self.cached_absences("poi", horizon_start, horizon_end, &poi_names)?;
        let duties = self.cached_duties(&team, horizon_start, horizon_end, &roster_names)?;
        let holidays = self.cached_holidays(horizon_start, horizon_end)?;

        let mut plans = Vec::with_capacity(sprints.len());
        for window in sprints {
            plans.push(self.plan_sprint(
                &team, window, &absences, &poi_absences, &duties, &holidays,
            ));
        }
        Ok(PlanReport {
            team,
            sprints: plans,
        })
    }

    /// Discard every cached payload so the next plan refetches everything.
    pub fn purge_cache(&self) -> PlanResult<()> {
        self.cache.purge()
    }

    fn plan_sprint(
        &self,
        team: &Team,
        window: Sprint,
        absences: &[AbsenceEvent],
        poi_absences: &[AbsenceEvent],
        duties: &[DutyAssignment],
        holidays: &[BankHoliday],
    ) -> SprintPlan {
        let window_absences: Vec<AbsenceEvent> = absences
            .iter()
            .filter(|a| a.overlaps(window.start, window.end))
            .cloned()
            .collect();
        let window_poi: Vec<AbsenceEvent> = poi_absences
            .iter()
            .filter(|a| a.overlaps(window.start, window.end))
            .cloned()
            .collect();
        let window_duties: Vec<DutyAssignment> = duties
            .iter()
            .filter(|d| d.overlaps(window.start, window.end))
            .map(|d| DutyAssignment {
                person: d.person.clone(),
                start: d.start.max(window.start),
                end: d.end.min(window.end),
                kind: d.kind,
            })
            .collect();
        let window_holidays: Vec<BankHoliday> = holidays
            .iter()
            .filter(|h| window.contains(h.date))
            .cloned()
            .collect();
        let window_socials: Vec<NaiveDate> = self
            .config
            .settings
            .social_dates
            .iter()
            .copied()
            .filter(|d| window.contains(*d))
            .collect();

        let inputs = SprintInputs {
            absences: &window_absences,
            duties: &window_duties,
            holidays: &window_holidays,
            social_dates: &window_socials,
        };
        let mut members: Vec<MemberAvailability> = team
            .members
            .iter()
            .map(|m| availability::assess_member(m, &window, inputs))
            .collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));

        let conflicts = availability::duty_conflicts(&window_absences, &window_duties);
        for conflict in &conflicts {
            log::warn!(
                "{} is absent on {} but scheduled for {:?} duty",
                conflict.person,
                conflict.date,
                conflict.duty
            );
        }

        let team_availability = capacity::team_availability(&members);
        let breakdown = capacity::breakdown(team, team_availability);
        SprintPlan {
            sprint: window,
            members,
            poi_absences: window_poi,
            duties: window_duties,
            conflicts,
            holidays: window_holidays,
            social_dates: window_socials,
            team_availability,
            capacity: breakdown.engineering_points,
            breakdown,
        }
    }

    fn cached_absences(
        &self,
        scope: &str,
        start: NaiveDate,
        end: NaiveDate,
        people: &[PersonId],
    ) -> PlanResult<Vec<AbsenceEvent>> {
        let sig = source::signature(self.sources.absences.name(), scope, start, end);
        self.cache
            .get_or_fetch(&sig, self.config.settings.api_cache_timeout, || {
                self.sources.absences.fetch_absences(start, end, people)
            })
    }

    fn cached_duties(
        &self,
        team: &Team,
        start: NaiveDate,
        end: NaiveDate,
        roster_names: &[PersonId],
    ) -> PlanResult<Vec<DutyAssignment>> {
        let mut all = Vec::new();
        for duty_source in &self.sources.duties {
            let sig = source::signature(duty_source.name(), "team", start, end);
            let fetched: Vec<DutyAssignment> = self
                .cache
                .get_or_fetch(&sig, self.config.settings.api_cache_timeout, || {
                    duty_source.fetch_duties(start, end, roster_names)
                })?;
            all.extend(fetched);
        }
        // Map roster aliases back to identity names so downstream matching
        // is uniform.
        for duty in &mut all {
            if let Some(member) = team
                .members
                .iter()
                .find(|m| m.roster_name() == duty.person)
            {
                duty.person = member.name.clone();
            }
        }
        Ok(all)
    }

    fn cached_holidays(&self, start: NaiveDate, end: NaiveDate) -> PlanResult<Vec<BankHoliday>> {
        let sig = source::signature(self.sources.holidays.name(), "all", start, end);
        self.cache
            .get_or_fetch(&sig, self.config.settings.api_cache_timeout, || {
                self.sources.holidays.fetch_holidays(start, end)
            })
    }
}
