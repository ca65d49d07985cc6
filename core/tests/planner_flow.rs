//! End-to-end planner tests over fixture feed documents.

use chrono::NaiveDate;
use sprintcap_core::cache::CacheStore;
use sprintcap_core::capacity;
use sprintcap_core::config::PlannerConfig;
use sprintcap_core::error::PlanError;
use sprintcap_core::event::DutyKind;
use sprintcap_core::planner::{Planner, SourceSet};
use sprintcap_core::source::{BankHolidayFeed, LeaveExportSource, RosterExportSource};
use std::fs;
use std::path::Path;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Anchor inside the 2026-08-03..2026-08-17 grid window of the test config.
fn anchor() -> NaiveDate {
    date(2026, 8, 6)
}

/// Ana is away 5–6 Aug (2 days) and on primary duty on the 5th; Harriet
/// (a person of interest) is away 10–12 Aug; one bank holiday on 31 Aug.
fn write_feeds(dir: &Path) {
    fs::write(
        dir.join("leave_export.json"),
        r#"{"absences": [
            {"employee": "Ana Petrov", "start": "2026-08-05", "end": "2026-08-06"},
            {"employee": "Harriet Lowe", "start": "2026-08-10", "end": "2026-08-12"}
        ]}"#,
    )
    .unwrap();
    fs::write(
        dir.join("duty_primary.json"),
        r#"{"shifts": [
            {"person": "Ana Petrov", "start": "2026-08-05", "end": "2026-08-05"}
        ]}"#,
    )
    .unwrap();
    fs::write(dir.join("duty_secondary.json"), r#"{"shifts": []}"#).unwrap();
    fs::write(
        dir.join("bank_holidays.json"),
        r#"{"holidays": [
            {"date": "2026-08-31", "label": "Summer bank holiday"}
        ]}"#,
    )
    .unwrap();
}

fn sources_for(dir: &Path) -> SourceSet {
    let feed = |name: &str| dir.join(name).to_str().unwrap().to_string();
    SourceSet {
        absences: Box::new(LeaveExportSource::new("hr_leave", &feed("leave_export.json"))),
        duties: vec![
            Box::new(RosterExportSource::new(
                "duty_primary",
                &feed("duty_primary.json"),
                DutyKind::Primary,
            )),
            Box::new(RosterExportSource::new(
                "duty_secondary",
                &feed("duty_secondary.json"),
                DutyKind::Secondary,
            )),
        ],
        holidays: Box::new(BankHolidayFeed::new(
            "bank_holidays",
            &feed("bank_holidays.json"),
        )),
    }
}

fn planner_over(dir: &Path, config: PlannerConfig) -> Planner {
    write_feeds(dir);
    let cache = CacheStore::in_memory().unwrap();
    cache.migrate().unwrap();
    Planner::new(config, cache, sources_for(dir))
}

/// The report covers the configured horizon in order, one row per member.
#[test]
fn plan_covers_configured_horizon() {
    let dir = tempfile::tempdir().unwrap();
    let planner = planner_over(dir.path(), PlannerConfig::default_test());
    let report = planner.plan("Foxglove", anchor()).unwrap();

    let indices: Vec<i32> = report.sprints.iter().map(|p| p.sprint.index).collect();
    assert_eq!(indices, vec![-1, 0, 1, 2, 3]);
    for plan in &report.sprints {
        assert_eq!(plan.members.len(), 5, "one row per team member");
        let names: Vec<&str> = plan.members.iter().map(|m| m.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted, "member rows are sorted by name");
    }
}

/// The leave feed reduces only the affected member, and people of interest
/// show up in the display rows but never in the capacity math.
#[test]
fn absences_reduce_only_affected_member() {
    let dir = tempfile::tempdir().unwrap();
    let planner = planner_over(dir.path(), PlannerConfig::default_test());
    let report = planner.plan("Foxglove", anchor()).unwrap();

    let current = report.sprints.iter().find(|p| p.sprint.index == 0).unwrap();
    for member in &current.members {
        let expected = if member.name == "Ana Petrov" {
            12.0 / 14.0
        } else {
            1.0
        };
        assert!(
            (member.fraction - expected).abs() < 1e-9,
            "{}: got {}",
            member.name,
            member.fraction
        );
    }
    assert!((current.team_availability - (4.0 + 12.0 / 14.0)).abs() < 1e-9);

    // Harriet appears as an informational POI absence only.
    assert!(current
        .poi_absences
        .iter()
        .any(|a| a.person == "Harriet Lowe"));
    assert!(current.members.iter().all(|m| m.name != "Harriet Lowe"));
}

/// A duty shift during an absence is flagged as a conflict but changes
/// neither the fraction nor the capacity.
#[test]
fn duty_conflict_is_warning_only() {
    let dir = tempfile::tempdir().unwrap();
    let planner = planner_over(dir.path(), PlannerConfig::default_test());
    let report = planner.plan("Foxglove", anchor()).unwrap();

    let current = report.sprints.iter().find(|p| p.sprint.index == 0).unwrap();
    assert_eq!(current.conflicts.len(), 1);
    assert_eq!(current.conflicts[0].person, "Ana Petrov");
    assert_eq!(current.conflicts[0].date, date(2026, 8, 5));
    assert_eq!(current.conflicts[0].duty, DutyKind::Primary);

    let ana = current
        .members
        .iter()
        .find(|m| m.name == "Ana Petrov")
        .unwrap();
    assert!((ana.fraction - 12.0 / 14.0).abs() < 1e-9);
    assert_eq!(ana.primary_duty_days, 1);
}

/// Sprint capacity follows the configured multiplier chain exactly.
#[test]
fn capacity_matches_multipliers() {
    let dir = tempfile::tempdir().unwrap();
    let planner = planner_over(dir.path(), PlannerConfig::default_test());
    let report = planner.plan("Foxglove", anchor()).unwrap();

    let current = report.sprints.iter().find(|p| p.sprint.index == 0).unwrap();
    let expected = capacity::sprint_capacity(&report.team, current.team_availability);
    assert!((current.capacity - expected).abs() < 1e-12);
    assert!(current.capacity > 0.0);
}

/// A bank holiday costs every member its day.
#[test]
fn bank_holiday_affects_all_members() {
    let dir = tempfile::tempdir().unwrap();
    let planner = planner_over(dir.path(), PlannerConfig::default_test());
    let report = planner.plan("Foxglove", anchor()).unwrap();

    // 2026-08-31 falls in the index-2 window (2026-08-31..2026-09-14).
    let window = report.sprints.iter().find(|p| p.sprint.index == 2).unwrap();
    assert_eq!(window.holidays.len(), 1);
    for member in &window.members {
        assert!(
            (member.fraction - 13.0 / 14.0).abs() < 1e-9,
            "{}: got {}",
            member.name,
            member.fraction
        );
    }
}

/// A social date costs every member a day; a member already absent that
/// day is not charged twice.
#[test]
fn social_date_merges_with_absences() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = PlannerConfig::default_test();
    config.settings.social_dates = vec![date(2026, 8, 5)];
    let planner = planner_over(dir.path(), config);
    let report = planner.plan("Foxglove", anchor()).unwrap();

    let current = report.sprints.iter().find(|p| p.sprint.index == 0).unwrap();
    for member in &current.members {
        let expected = if member.name == "Ana Petrov" {
            12.0 / 14.0 // 5 Aug already covered by her leave
        } else {
            13.0 / 14.0
        };
        assert!(
            (member.fraction - expected).abs() < 1e-9,
            "{}: got {}",
            member.name,
            member.fraction
        );
    }
}

/// A missing feed document is a hard error — partial data must never be
/// treated as zero absences.
#[test]
fn missing_feed_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_feeds(dir.path());
    fs::remove_file(dir.path().join("leave_export.json")).unwrap();

    let cache = CacheStore::in_memory().unwrap();
    cache.migrate().unwrap();
    let planner = Planner::new(PlannerConfig::default_test(), cache, sources_for(dir.path()));
    let result = planner.plan("Foxglove", anchor());
    assert!(matches!(result, Err(PlanError::Source { .. })));
}

/// A second run inside the TTL is served from the cache — the upstream
/// documents can disappear entirely and the plan still comes out the same.
#[test]
fn plan_reuses_cached_payloads() {
    let dir = tempfile::tempdir().unwrap();
    let planner = planner_over(dir.path(), PlannerConfig::default_test());

    let first = planner.plan("Foxglove", anchor()).unwrap();
    for name in [
        "leave_export.json",
        "duty_primary.json",
        "duty_secondary.json",
        "bank_holidays.json",
    ] {
        fs::remove_file(dir.path().join(name)).unwrap();
    }
    let second = planner.plan("Foxglove", anchor()).unwrap();

    for (a, b) in first.sprints.iter().zip(&second.sprints) {
        assert_eq!(a.sprint, b.sprint);
        assert!((a.capacity - b.capacity).abs() < 1e-12);
    }
}

/// Purging the cache forces the next plan back to the (now missing)
/// upstream, which fails loudly.
#[test]
fn purge_forces_fresh_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let planner = planner_over(dir.path(), PlannerConfig::default_test());

    planner.plan("Foxglove", anchor()).unwrap();
    fs::remove_file(dir.path().join("leave_export.json")).unwrap();
    planner.purge_cache().unwrap();

    let result = planner.plan("Foxglove", anchor());
    assert!(matches!(result, Err(PlanError::Source { .. })));
}
