//! Normalized records returned by source adapters.
//!
//! Every interval is half-open `[start, end)`. Adapters convert whatever
//! the upstream export uses (usually inclusive end dates) on ingest.

use crate::types::PersonId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What an absence-like period is. Informational only: the capacity math
/// subtracts covered days regardless of kind, and overlapping kinds are
/// never double-subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceKind {
    Leave,
    CompanyHoliday,
    SocialEvent,
}

/// A period a person is away. Events for the same person may overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceEvent {
    pub person: PersonId,
    pub start:  NaiveDate,
    /// Exclusive.
    pub end:    NaiveDate,
    pub kind:   AbsenceKind,
}

impl AbsenceEvent {
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start < end && start < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyKind {
    Primary,
    Secondary,
}

/// An on-call rotation slot. Distinct from an absence: a person on duty
/// still counts as present for capacity purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyAssignment {
    pub person: PersonId,
    pub start:  NaiveDate,
    /// Exclusive.
    pub end:    NaiveDate,
    pub kind:   DutyKind,
}

impl DutyAssignment {
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start < end && start < self.end
    }

    /// Number of assignment days falling inside `[start, end)`.
    pub fn days_within(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let s = self.start.max(start);
        let e = self.end.min(end);
        (e - s).num_days().max(0)
    }
}

/// A public bank holiday. Applies to every member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankHoliday {
    pub date:  NaiveDate,
    pub label: String,
}
