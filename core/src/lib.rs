//! sprintcap-core — sprint capacity & availability aggregation engine.
//!
//! Aggregates absence-like signals (leave, bank holidays, social events,
//! duty rotations) from independent sources, computes per-member
//! availability fractions per sprint window, and converts aggregate team
//! availability into a story-point capacity estimate.
//!
//! Rendering, transport, and argument parsing live outside this crate;
//! the only persistent state is the expiring cache store.

pub mod availability;
pub mod cache;
pub mod capacity;
pub mod config;
pub mod error;
pub mod event;
pub mod planner;
pub mod source;
pub mod sprint;
pub mod types;

pub use availability::{
    assess_member, available_fraction, duty_conflicts, DutyConflict, MemberAvailability,
    SprintInputs,
};
pub use cache::CacheStore;
pub use capacity::{breakdown, sprint_capacity, team_availability, CapacityBreakdown};
pub use config::{FeedPaths, PlannerConfig, Settings, Team, TeamMember};
pub use error::{PlanError, PlanResult};
pub use event::{AbsenceEvent, AbsenceKind, BankHoliday, DutyAssignment, DutyKind};
pub use planner::{PlanReport, Planner, SourceSet, SprintPlan};
pub use sprint::Sprint;
