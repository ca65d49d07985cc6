//! Sprint window generation tests — grid alignment, contiguity, numbering.

use chrono::NaiveDate;
use sprintcap_core::sprint;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Windows are contiguous and fixed-length: the end of sprint i is the
/// start of sprint i+1, and every window spans sprint_length_days.
#[test]
fn windows_are_contiguous_and_fixed_length() {
    let sprints = sprint::generate(date(2026, 8, 6), 14, 4, 2, date(2026, 1, 5), 40);
    assert_eq!(sprints.len(), 6);
    for window in &sprints {
        assert_eq!(window.len_days(), 14);
    }
    for pair in sprints.windows(2) {
        assert_eq!(pair[0].end, pair[1].start, "gap between consecutive windows");
        assert!(pair[0].start < pair[1].start, "windows out of order");
    }
}

/// The anchor date falls inside the index-0 window.
#[test]
fn anchor_falls_in_first_forward_sprint() {
    let anchor = date(2026, 8, 6);
    let sprints = sprint::generate(anchor, 14, 4, 2, date(2026, 1, 5), 40);
    let first_forward = sprints.iter().find(|s| s.index == 0).unwrap();
    assert!(first_forward.contains(anchor));
    assert_eq!(first_forward.start, date(2026, 8, 3));
    assert_eq!(first_forward.end, date(2026, 8, 17));
}

/// Look-back sprints get negative indices and the absolute numbering
/// follows the grid epoch.
#[test]
fn look_back_indices_and_epoch_numbering() {
    let sprints = sprint::generate(date(2026, 1, 5), 14, 2, 2, date(2026, 1, 5), 40);
    let indices: Vec<i32> = sprints.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![-2, -1, 0, 1]);
    let numbers: Vec<i64> = sprints.iter().map(|s| s.number).collect();
    assert_eq!(numbers, vec![38, 39, 40, 41]);
    assert_eq!(sprints[2].start, date(2026, 1, 5));
}

/// An anchor earlier than the epoch lands on a negative grid slot rather
/// than panicking or snapping to the epoch.
#[test]
fn anchor_before_epoch_uses_negative_slots() {
    let anchor = date(2026, 1, 4);
    let sprints = sprint::generate(anchor, 14, 1, 0, date(2026, 1, 5), 40);
    assert_eq!(sprints.len(), 1);
    assert!(sprints[0].contains(anchor));
    assert_eq!(sprints[0].start, date(2025, 12, 22));
    assert_eq!(sprints[0].number, 39);
}

/// An anchor sitting exactly on a grid boundary belongs to the window it
/// starts — intervals are half-open.
#[test]
fn boundary_anchor_starts_its_own_window() {
    let anchor = date(2026, 1, 19);
    let sprints = sprint::generate(anchor, 14, 1, 0, date(2026, 1, 5), 40);
    assert_eq!(sprints[0].start, anchor);
    assert_eq!(sprints[0].number, 41);
}

/// The day iterator walks every calendar day of the half-open window.
#[test]
fn day_iterator_covers_half_open_window() {
    let sprints = sprint::generate(date(2026, 1, 5), 14, 1, 0, date(2026, 1, 5), 40);
    let days: Vec<NaiveDate> = sprints[0].days().collect();
    assert_eq!(days.len(), 14);
    assert_eq!(days[0], date(2026, 1, 5));
    assert_eq!(days[13], date(2026, 1, 18));
}
