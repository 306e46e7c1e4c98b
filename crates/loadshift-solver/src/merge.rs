//! Multi-source timeline merging
//!
//! Combines weekly timelines computed from independent datasets: hours sum
//! per (resource, week label), capacity keeps the highest value seen, and
//! percentages are recomputed after summing — never summed directly.

use chrono::NaiveDate;
use loadshift_core::WeekLoad;
use std::collections::{BTreeMap, HashMap};

/// Reduce N independently aggregated weekly timelines into one.
///
/// Week buckets align by label (the ISO start date), so sources analyzed
/// over the same range merge bucket-for-bucket; a resource present in only
/// some sources keeps its own weeks. Output weeks are sorted by start date.
pub fn merge_weekly_timelines(
    sources: &[HashMap<String, Vec<WeekLoad>>],
) -> HashMap<String, Vec<WeekLoad>> {
    let mut merged: HashMap<String, BTreeMap<NaiveDate, WeekLoad>> = HashMap::new();

    for source in sources {
        for (resource, loads) in source {
            let weeks = merged.entry(resource.clone()).or_default();
            for load in loads {
                match weeks.get_mut(&load.week.start) {
                    Some(existing) => {
                        existing.hours += load.hours;
                        existing.capacity = existing.capacity.max(load.capacity);
                        if load.week.end > existing.week.end {
                            existing.week.end = load.week.end;
                        }
                    }
                    None => {
                        weeks.insert(load.week.start, load.clone());
                    }
                }
            }
        }
    }

    merged
        .into_iter()
        .map(|(resource, weeks)| {
            let loads = weeks
                .into_values()
                .map(|mut load| {
                    load.percentage = if load.capacity > 0.0 {
                        load.hours / load.capacity * 100.0
                    } else {
                        0.0
                    };
                    load
                })
                .collect();
            (resource, loads)
        })
        .collect()
}
