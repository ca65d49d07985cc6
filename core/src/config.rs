//! Planner configuration — teams, members, and horizon settings.
//!
//! Loaded once at startup and immutable from then on. The aggregator and
//! calculator receive references; nothing here is shared mutable state.

use crate::error::{PlanError, PlanResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn default_start_pct() -> f64 {
    1.0
}

fn default_sprint_length() -> u32 {
    14
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    /// Name used by the duty-roster source when it differs from `name`.
    #[serde(default)]
    pub roster_alias: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub leave_date: Option<NaiveDate>,
    /// Ramp-up FTE percentage in (0, 1]. Applied as a flat multiplier on
    /// availability while a `start_date` is configured.
    #[serde(default = "default_start_pct")]
    pub start_pct: f64,
}

impl TeamMember {
    /// A full-time member with no ramp or leave dates.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            roster_alias: None,
            start_date: None,
            leave_date: None,
            start_pct: 1.0,
        }
    }

    pub fn roster_name(&self) -> &str {
        self.roster_alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub manager: String,
    pub members: Vec<TeamMember>,
    /// Tracked for absence display only — never part of the capacity math.
    #[serde(default)]
    pub people_of_interest: Vec<String>,
    pub point_capacity: f64,
    pub load_factor: f64,
    pub engineering_split: f64,
    pub points_per_epic: f64,
}

/// Paths to the exported feed documents each source adapter reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPaths {
    pub leave_export: String,
    pub primary_duty_export: String,
    pub secondary_duty_export: String,
    pub bank_holiday_feed: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_sprint_length")]
    pub sprint_length_days: u32,
    pub number_of_sprints: u32,
    #[serde(default)]
    pub number_of_sprints_back: u32,
    /// Cache TTL in seconds.
    pub api_cache_timeout: u64,
    /// Calendar dates that cost every member a day (team socials etc.).
    #[serde(default)]
    pub social_dates: Vec<NaiveDate>,
    /// Start date of the sprint the grid is anchored to, and its number.
    pub first_sprint_date: NaiveDate,
    pub first_sprint_number: i64,
    pub feeds: FeedPaths,
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub settings: Settings,
    pub teams: Vec<Team>,
}

#[derive(Debug, Deserialize)]
struct TeamsFile {
    teams: Vec<Team>,
}

impl PlannerConfig {
    /// Load from the data/ directory. Fails fast on a missing or
    /// unreadable document — nothing runs on partial configuration.
    /// In tests, use `PlannerConfig::default_test()`.
    pub fn load(data_dir: &str) -> PlanResult<Self> {
        let settings_path = format!("{data_dir}/planner.json");
        let content = std::fs::read_to_string(&settings_path)
            .map_err(|e| PlanError::Config(format!("Cannot read {settings_path}: {e}")))?;
        let settings: Settings = serde_json::from_str(&content)?;

        let teams_path = format!("{data_dir}/teams.json");
        let content = std::fs::read_to_string(&teams_path)
            .map_err(|e| PlanError::Config(format!("Cannot read {teams_path}: {e}")))?;
        let file: TeamsFile = serde_json::from_str(&content)?;

        let config = Self {
            settings,
            teams: file.teams,
        };
        config.validate()?;
        Ok(config)
    }

    /// Find a team by name, case-insensitively.
    pub fn team(&self, name: &str) -> PlanResult<&Team> {
        self.teams
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| PlanError::TeamNotFound {
                name: name.to_string(),
            })
    }

    pub fn validate(&self) -> PlanResult<()> {
        for team in &self.teams {
            let mut seen = HashSet::new();
            for member in &team.members {
                if !seen.insert(member.name.as_str()) {
                    return Err(PlanError::Config(format!(
                        "Team '{}' lists member '{}' more than once",
                        team.name, member.name
                    )));
                }
                if member.start_pct <= 0.0 || member.start_pct > 1.0 {
                    return Err(PlanError::Config(format!(
                        "Member '{}': start_pct must be in (0, 1], got {}",
                        member.name, member.start_pct
                    )));
                }
                if let (Some(start), Some(leave)) = (member.start_date, member.leave_date) {
                    if start >= leave {
                        return Err(PlanError::InvalidMemberDates {
                            name: member.name.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Config with hardcoded defaults for use in tests.
    pub fn default_test() -> Self {
        let team = Team {
            name: "Foxglove".into(),
            manager: "Harriet Lowe".into(),
            members: vec![
                TeamMember::named("Ana Petrov"),
                TeamMember::named("Ben Okafor"),
                TeamMember::named("Cara Lindqvist"),
                TeamMember::named("Dev Chauhan"),
                TeamMember::named("Elena Moss"),
            ],
            people_of_interest: vec!["Harriet Lowe".into(), "Piotr Nowak".into()],
            point_capacity: 0.85,
            load_factor: 0.8,
            engineering_split: 0.3,
            points_per_epic: 9.0,
        };

        Self {
            settings: Settings {
                sprint_length_days: 14,
                number_of_sprints: 4,
                number_of_sprints_back: 1,
                api_cache_timeout: 900,
                social_dates: Vec::new(),
                first_sprint_date: NaiveDate::from_ymd_opt(2026, 1, 5)
                    .unwrap_or(NaiveDate::MIN),
                first_sprint_number: 40,
                feeds: FeedPaths {
                    leave_export: "data/leave_export.json".into(),
                    primary_duty_export: "data/duty_primary.json".into(),
                    secondary_duty_export: "data/duty_secondary.json".into(),
                    bank_holiday_feed: "data/bank_holidays.json".into(),
                },
            },
            teams: vec![team],
        }
    }
}

/// Read a required credential from the environment. Adapters that talk to
/// an authenticated upstream call this at construction time, before any
/// aggregation runs — a missing credential is a fatal startup error.
pub fn require_env(name: &str) -> PlanResult<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(PlanError::MissingCredential {
            name: name.to_string(),
        }),
    }
}
