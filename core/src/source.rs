//! Source adapters — the boundary to upstream availability systems.
//!
//! Each adapter turns one upstream export into normalized records for a
//! date range; transport and raw formats stay behind the trait. Adapters
//! are idempotent and side-effect-free from the engine's perspective, and
//! the planner routes every fetch through the cache store.
//!
//! The shipped implementations read JSON documents exported from the HR
//! system, the duty roster, and the public bank-holiday feed. Upstream
//! exports use inclusive end dates; ingest converts them to half-open.

use crate::{
    error::{PlanError, PlanResult},
    event::{AbsenceEvent, AbsenceKind, BankHoliday, DutyAssignment, DutyKind},
    types::PersonId,
};
use chrono::{Duration, NaiveDate};
use serde::Deserialize;

pub trait AbsenceSource {
    /// Stable identifier used in cache signatures.
    fn name(&self) -> &str;

    /// Absence events overlapping `[start, end)` for the given people.
    fn fetch_absences(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        people: &[PersonId],
    ) -> PlanResult<Vec<AbsenceEvent>>;
}

pub trait DutySource {
    fn name(&self) -> &str;
    fn kind(&self) -> DutyKind;

    /// Duty assignments overlapping `[start, end)` for the given roster names.
    fn fetch_duties(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        names: &[PersonId],
    ) -> PlanResult<Vec<DutyAssignment>>;
}

pub trait HolidaySource {
    fn name(&self) -> &str;

    /// Bank holidays falling inside `[start, end)`.
    fn fetch_holidays(&self, start: NaiveDate, end: NaiveDate) -> PlanResult<Vec<BankHoliday>>;
}

/// Cache signature for a windowed fetch: source, query scope, date range.
/// Distinct scopes (e.g. team members vs people of interest) must never
/// share an entry.
pub fn signature(source: &str, scope: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{source}_{scope}_{}_{}",
        start.format("%Y%m%d"),
        end.format("%Y%m%d")
    )
}

fn read_feed(path: &str, source: &str) -> PlanResult<String> {
    std::fs::read_to_string(path).map_err(|e| PlanError::Source {
        src: source.to_string(),
        message: format!("cannot read {path}: {e}"),
    })
}

fn parse_feed<'a, T: Deserialize<'a>>(raw: &'a str, source: &str) -> PlanResult<T> {
    serde_json::from_str(raw).map_err(|e| PlanError::Source {
        src: source.to_string(),
        message: format!("malformed feed: {e}"),
    })
}

// ── HR leave export ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LeaveExportFile {
    absences: Vec<LeaveRow>,
}

#[derive(Debug, Deserialize)]
struct LeaveRow {
    employee: String,
    start: NaiveDate,
    /// Inclusive in the export.
    end: NaiveDate,
    #[serde(default)]
    kind: Option<String>,
}

pub struct LeaveExportSource {
    name: String,
    path: String,
}

impl LeaveExportSource {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

impl AbsenceSource for LeaveExportSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_absences(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        people: &[PersonId],
    ) -> PlanResult<Vec<AbsenceEvent>> {
        let raw = read_feed(&self.path, &self.name)?;
        let file: LeaveExportFile = parse_feed(&raw, &self.name)?;
        let events = file
            .absences
            .into_iter()
            .filter(|row| people.contains(&row.employee))
            .map(|row| AbsenceEvent {
                kind: match row.kind.as_deref() {
                    Some("company_holiday") => AbsenceKind::CompanyHoliday,
                    Some("social_event") => AbsenceKind::SocialEvent,
                    _ => AbsenceKind::Leave,
                },
                person: row.employee,
                start: row.start,
                end: row.end + Duration::days(1),
            })
            .filter(|ev| ev.overlaps(start, end))
            .collect();
        Ok(events)
    }
}

// ── Duty roster export ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RosterExportFile {
    shifts: Vec<ShiftRow>,
}

#[derive(Debug, Deserialize)]
struct ShiftRow {
    person: String,
    start: NaiveDate,
    /// Inclusive in the export.
    end: NaiveDate,
}

pub struct RosterExportSource {
    name: String,
    path: String,
    kind: DutyKind,
}

impl RosterExportSource {
    pub fn new(name: &str, path: &str, kind: DutyKind) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            kind,
        }
    }
}

impl DutySource for RosterExportSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> DutyKind {
        self.kind
    }

    fn fetch_duties(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        names: &[PersonId],
    ) -> PlanResult<Vec<DutyAssignment>> {
        let raw = read_feed(&self.path, &self.name)?;
        let file: RosterExportFile = parse_feed(&raw, &self.name)?;
        let duties = file
            .shifts
            .into_iter()
            .filter(|row| names.contains(&row.person))
            .map(|row| DutyAssignment {
                person: row.person,
                start: row.start,
                end: row.end + Duration::days(1),
                kind: self.kind,
            })
            .filter(|duty| duty.overlaps(start, end))
            .collect();
        Ok(duties)
    }
}

// ── Bank holiday feed ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct HolidayFeedFile {
    holidays: Vec<BankHoliday>,
}

pub struct BankHolidayFeed {
    name: String,
    path: String,
}

impl BankHolidayFeed {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

impl HolidaySource for BankHolidayFeed {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_holidays(&self, start: NaiveDate, end: NaiveDate) -> PlanResult<Vec<BankHoliday>> {
        let raw = read_feed(&self.path, &self.name)?;
        let file: HolidayFeedFile = parse_feed(&raw, &self.name)?;
        Ok(file
            .holidays
            .into_iter()
            .filter(|h| start <= h.date && h.date < end)
            .collect())
    }
}
