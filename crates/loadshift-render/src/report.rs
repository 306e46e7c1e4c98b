//! Plain-text analysis report
//!
//! A terminal-friendly summary: per-resource workload table, band counts,
//! shift suggestions and capacity recommendations. Designed to degrade to
//! a readable "nothing to show" body when every section is empty.

use loadshift_core::{ShiftSuggestion, WorkloadRecord};
use loadshift_solver::{Recommendation, WorkloadAnalysis};

/// Render the complete analysis report.
pub fn render_report(
    records: &[WorkloadRecord],
    analysis: &WorkloadAnalysis,
    suggestions: &[ShiftSuggestion],
    recommendations: &[Recommendation],
) -> String {
    let mut out = String::new();

    out.push_str("WORKLOAD ANALYSIS\n");
    out.push_str("=================\n\n");

    if records.is_empty() {
        out.push_str("No resources to analyze.\n");
    } else {
        let name_width = records
            .iter()
            .map(|r| r.resource_name.len())
            .max()
            .unwrap_or(8)
            .max(8);
        out.push_str(&format!(
            "{:<name_width$}  {:>9}  {:>9}  {:>7}  {:>5}\n",
            "Resource", "Hours", "Capacity", "Load", "Tasks"
        ));
        for record in records {
            out.push_str(&format!(
                "{:<name_width$}  {:>9.1}  {:>9.1}  {:>6.1}%  {:>5}\n",
                record.resource_name,
                record.total_work_hours,
                record.max_capacity_hours,
                record.workload_percentage,
                record.task_count,
            ));
        }
        out.push_str(&format!(
            "\nOverloaded: {}   Optimal: {}   Underutilized: {}\n",
            analysis.overloaded.len(),
            analysis.optimal.len(),
            analysis.underutilized.len(),
        ));
    }

    out.push_str("\nSHIFT SUGGESTIONS\n");
    out.push_str("-----------------\n");
    if suggestions.is_empty() {
        out.push_str("Schedule is balanced; no shifts needed.\n");
    } else {
        for (i, s) in suggestions.iter().enumerate() {
            out.push_str(&format!(
                "{}. [{}] Shift \"{}\" ({}) by {} days: {} -> {}\n   {} (frees {:.1}h, adds {:.1}h, -{:.1}pp)\n",
                i + 1,
                s.priority,
                s.task_name,
                s.resource_name,
                s.shift_days,
                s.original_start,
                s.suggested_start,
                s.reason,
                s.hours_freed,
                s.hours_added,
                s.improvement_pct,
            ));
        }
    }

    out.push_str("\nRECOMMENDATIONS\n");
    out.push_str("---------------\n");
    if recommendations.is_empty() {
        out.push_str("No capacity changes recommended.\n");
    } else {
        for rec in recommendations {
            match rec {
                Recommendation::ReassignTasks {
                    from,
                    to,
                    hours,
                    priority,
                } => {
                    out.push_str(&format!(
                        "- [{priority}] Reassign {hours:.1}h from {from} to {to}\n"
                    ));
                }
                Recommendation::HireAdditional {
                    resource,
                    reason,
                    priority,
                } => {
                    out.push_str(&format!(
                        "- [{priority}] Hire support for {resource}: {reason}\n"
                    ));
                }
                Recommendation::IncreaseUtilization {
                    resource,
                    available_pct,
                    available_hours,
                    priority,
                } => {
                    out.push_str(&format!(
                        "- [{priority}] {resource} has {available_pct:.1}% spare capacity ({available_hours:.1}h)\n"
                    ));
                }
            }
        }
    }

    out
}
