//! Sprint window generation — partitions the planning horizon into
//! fixed-length, half-open date ranges aligned to a configured grid epoch.

use crate::types::SprintIndex;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    pub index:  SprintIndex,
    /// Absolute sprint number, counted from the grid epoch.
    pub number: i64,
    pub start:  NaiveDate,
    /// Exclusive.
    pub end:    NaiveDate,
}

impl Sprint {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Iterate every calendar day in the window.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d < end)
    }
}

/// Materialize `count_back + count_forward` contiguous, non-overlapping
/// windows of `sprint_length_days` each.
///
/// Windows sit on the grid anchored at `epoch` (the start of sprint number
/// `first_number`). Index 0 is the grid window containing `anchor`;
/// look-back sprints get negative indices. The sequence is strictly
/// chronological and the end of window *i* equals the start of *i+1*.
pub fn generate(
    anchor: NaiveDate,
    sprint_length_days: u32,
    count_forward: u32,
    count_back: u32,
    epoch: NaiveDate,
    first_number: i64,
) -> Vec<Sprint> {
    let len = i64::from(sprint_length_days.max(1));
    let offset = (anchor - epoch).num_days().div_euclid(len);
    let back = i64::from(count_back);
    let total = i64::from(count_back) + i64::from(count_forward);

    let mut sprints = Vec::with_capacity(total as usize);
    for i in 0..total {
        let slot = offset - back + i;
        let start = epoch + Duration::days(slot * len);
        sprints.push(Sprint {
            index:  (i - back) as SprintIndex,
            number: first_number + slot,
            start,
            end: start + Duration::days(len),
        });
    }
    sprints
}
