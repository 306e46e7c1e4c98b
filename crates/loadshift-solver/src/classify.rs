//! Workload classification
//!
//! Buckets workload records into overloaded / optimal / underutilized
//! bands at the 100% and 70% thresholds.

use loadshift_core::WorkloadRecord;
use serde::Serialize;

/// Utilization band for a single percentage value.
///
/// Boundary rule: exactly 100 is Optimal (not Overloaded), exactly 70 is
/// Optimal (not Underutilized).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Band {
    Overloaded,
    Optimal,
    Underutilized,
}

impl Band {
    pub fn of(percentage: f64) -> Self {
        if percentage > 100.0 {
            Band::Overloaded
        } else if percentage >= 70.0 {
            Band::Optimal
        } else {
            Band::Underutilized
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Band::Overloaded => write!(f, "Overloaded"),
            Band::Optimal => write!(f, "Optimal"),
            Band::Underutilized => write!(f, "Underutilized"),
        }
    }
}

/// Workload records partitioned by band
#[derive(Clone, Debug, Default, Serialize)]
pub struct WorkloadAnalysis {
    pub overloaded: Vec<WorkloadRecord>,
    pub optimal: Vec<WorkloadRecord>,
    pub underutilized: Vec<WorkloadRecord>,
}

impl WorkloadAnalysis {
    pub fn is_empty(&self) -> bool {
        self.overloaded.is_empty() && self.optimal.is_empty() && self.underutilized.is_empty()
    }
}

/// Partition records into mutually exclusive bands.
pub fn classify(records: Vec<WorkloadRecord>) -> WorkloadAnalysis {
    let mut analysis = WorkloadAnalysis::default();
    for record in records {
        match Band::of(record.workload_percentage) {
            Band::Overloaded => analysis.overloaded.push(record),
            Band::Optimal => analysis.optimal.push(record),
            Band::Underutilized => analysis.underutilized.push(record),
        }
    }
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, percentage: f64) -> WorkloadRecord {
        WorkloadRecord {
            resource_name: name.into(),
            total_work_hours: percentage,
            max_capacity_hours: 100.0,
            workload_percentage: percentage,
            task_count: 0,
            tasks: Vec::new(),
        }
    }

    #[test]
    fn partitions_are_mutually_exclusive() {
        let records = vec![
            record("over", 140.0),
            record("optimal", 85.0),
            record("under", 40.0),
        ];

        let analysis = classify(records);
        assert_eq!(analysis.overloaded.len(), 1);
        assert_eq!(analysis.optimal.len(), 1);
        assert_eq!(analysis.underutilized.len(), 1);
        assert_eq!(analysis.overloaded[0].resource_name, "over");
        assert_eq!(analysis.underutilized[0].resource_name, "under");
    }

    #[test]
    fn boundary_hundred_is_optimal() {
        assert_eq!(Band::of(100.0), Band::Optimal);
        assert_eq!(Band::of(100.1), Band::Overloaded);
    }

    #[test]
    fn boundary_seventy_is_optimal() {
        assert_eq!(Band::of(70.0), Band::Optimal);
        assert_eq!(Band::of(69.9), Band::Underutilized);
    }

    #[test]
    fn zero_percentage_is_underutilized() {
        assert_eq!(Band::of(0.0), Band::Underutilized);
    }

    #[test]
    fn empty_input_is_valid_empty_state() {
        let analysis = classify(Vec::new());
        assert!(analysis.is_empty());
    }
}
