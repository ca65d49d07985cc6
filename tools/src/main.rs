//! sprint-planner: command-line runner for the capacity engine.
//!
//! Usage:
//!   sprint-planner <team> --capacity --absences
//!   sprint-planner <team> --data-dir ./data --cache ./.api_cache.db --full
//!   sprint-planner --purge

use anyhow::Result;
use chrono::Local;
use sprintcap_core::{
    cache::CacheStore,
    config::PlannerConfig,
    event::DutyKind,
    planner::{PlanReport, Planner, SourceSet},
    source::{BankHolidayFeed, LeaveExportSource, RosterExportSource},
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data_dir = str_arg(&args, "--data-dir", "./data");
    let cache_path = str_arg(&args, "--cache", "./.api_cache.db");

    let cache = CacheStore::open(cache_path)?;
    cache.migrate()?;

    if has_flag(&args, "--purge") {
        cache.purge()?;
        println!("API cache purged.");
        return Ok(());
    }

    let Some(team_name) = args.get(1).filter(|a| !a.starts_with("--")).cloned() else {
        print_usage();
        std::process::exit(1)
    };

    let config = PlannerConfig::load(data_dir)?;
    if config.team(&team_name).is_err() {
        let available: Vec<&str> = config.teams.iter().map(|t| t.name.as_str()).collect();
        eprintln!("Team '{team_name}' not found. Available teams: {available:?}");
        std::process::exit(1);
    }

    let feeds = &config.settings.feeds;
    let sources = SourceSet {
        absences: Box::new(LeaveExportSource::new("hr_leave", &feeds.leave_export)),
        duties: vec![
            Box::new(RosterExportSource::new(
                "duty_primary",
                &feeds.primary_duty_export,
                DutyKind::Primary,
            )),
            Box::new(RosterExportSource::new(
                "duty_secondary",
                &feeds.secondary_duty_export,
                DutyKind::Secondary,
            )),
        ],
        holidays: Box::new(BankHolidayFeed::new("bank_holidays", &feeds.bank_holiday_feed)),
    };

    let planner = Planner::new(config, cache, sources);
    let report = planner.plan(&team_name, Local::now().date_naive())?;
    log::debug!("planned {} sprint windows", report.sprints.len());

    let full = has_flag(&args, "--full");
    let mut shown = false;
    if full || has_flag(&args, "--capacity") {
        print_capacity(&report);
        shown = true;
    }
    if full || has_flag(&args, "--absences") {
        print_absences(&report);
        shown = true;
    }
    if full || has_flag(&args, "--duties") {
        print_duties(&report);
        shown = true;
    }
    if full || has_flag(&args, "--interest") {
        print_poi_absences(&report);
        shown = true;
    }
    if full || has_flag(&args, "--warnings") {
        print_warnings(&report);
        shown = true;
    }
    if !shown {
        println!("No output option specified");
        print_usage();
    }
    Ok(())
}

fn print_capacity(report: &PlanReport) {
    println!("=== CAPACITY — {} ===", report.team.name);
    for plan in &report.sprints {
        println!(
            "Sprint {:>4} [{} .. {})  availability {:>5.2}  points {:>7.3}  (total {:.3}, product {:.3})",
            plan.sprint.number,
            plan.sprint.start,
            plan.sprint.end,
            plan.team_availability,
            plan.capacity,
            plan.breakdown.total_points,
            plan.breakdown.product_points,
        );
        for member in &plan.members {
            let ramp = member
                .ramp
                .map(|pct| format!(" (ramping at {:.0}%)", pct * 100.0))
                .unwrap_or_default();
            println!(
                "    {:<24} {:>4.2}  available {:>2}/{:<2} days{}",
                member.name,
                member.fraction,
                member.available_days,
                plan.sprint.len_days(),
                ramp,
            );
        }
    }
}

fn print_absences(report: &PlanReport) {
    println!("=== ABSENCES — {} ===", report.team.name);
    for plan in &report.sprints {
        for member in &plan.members {
            if member.absent_days > 0 {
                println!(
                    "Sprint {:>4}  {:<24} {} day(s) out",
                    plan.sprint.number, member.name, member.absent_days
                );
            }
        }
    }
}

fn print_duties(report: &PlanReport) {
    println!("=== DUTY ROSTER — {} ===", report.team.name);
    for plan in &report.sprints {
        for duty in &plan.duties {
            println!(
                "Sprint {:>4}  {:<24} {:?} [{} .. {})",
                plan.sprint.number, duty.person, duty.kind, duty.start, duty.end
            );
        }
    }
}

fn print_poi_absences(report: &PlanReport) {
    println!("=== PEOPLE OF INTEREST — {} ===", report.team.name);
    for plan in &report.sprints {
        for absence in &plan.poi_absences {
            println!(
                "Sprint {:>4}  {:<24} away [{} .. {})",
                plan.sprint.number, absence.person, absence.start, absence.end
            );
        }
    }
}

fn print_warnings(report: &PlanReport) {
    let mut any = false;
    for plan in &report.sprints {
        for conflict in &plan.conflicts {
            println!(
                "WARNING: {} is absent on {} but scheduled for {:?} duty.",
                conflict.person, conflict.date, conflict.duty
            );
            any = true;
        }
    }
    if !any {
        println!("No duty/absence warnings.");
    }
}

fn print_usage() {
    println!("Usage: sprint-planner <team> [options]");
    println!("  --capacity     capacity summary per sprint");
    println!("  --absences     upcoming absences per sprint");
    println!("  --duties       duty roster per sprint");
    println!("  --interest     absences for people of interest and the manager");
    println!("  --warnings     duty shifts colliding with absences");
    println!("  --full         all of the above");
    println!("  --purge        delete all cached API data and exit");
    println!("  --data-dir D   configuration directory (default ./data)");
    println!("  --cache P      cache database path (default ./.api_cache.db)");
}

fn str_arg<'a>(args: &'a [String], flag: &str, default: &'a str) -> &'a str {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .unwrap_or(default)
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}
