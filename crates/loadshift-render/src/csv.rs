//! CSV export
//!
//! One row per record, RFC-4180-style quoting. Consumers are spreadsheet
//! tools; numbers render with one decimal place to match the report view.

use loadshift_core::{ShiftSuggestion, WorkloadRecord};

/// Quote a field when it contains a delimiter, quote or newline.
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| escape(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render workload records as CSV, one row per resource.
pub fn workload_csv(records: &[WorkloadRecord]) -> String {
    let mut out = String::from(
        "resource,total_work_hours,max_capacity_hours,workload_percentage,task_count\n",
    );
    for record in records {
        out.push_str(&row(&[
            record.resource_name.clone(),
            format!("{:.1}", record.total_work_hours),
            format!("{:.1}", record.max_capacity_hours),
            format!("{:.1}", record.workload_percentage),
            record.task_count.to_string(),
        ]));
        out.push('\n');
    }
    out
}

/// Render shift suggestions as CSV, one row per suggestion.
pub fn suggestions_csv(suggestions: &[ShiftSuggestion]) -> String {
    let mut out = String::from(
        "resource,task,task_hours,original_start,original_end,suggested_start,suggested_end,\
         shift_days,improvement_pct,hours_freed,hours_added,priority,reason\n",
    );
    for s in suggestions {
        out.push_str(&row(&[
            s.resource_name.clone(),
            s.task_name.clone(),
            format!("{:.1}", s.task_hours),
            s.original_start.to_string(),
            s.original_end.to_string(),
            s.suggested_start.to_string(),
            s.suggested_end.to_string(),
            s.shift_days.to_string(),
            format!("{:.1}", s.improvement_pct),
            format!("{:.1}", s.hours_freed),
            format!("{:.1}", s.hours_added),
            s.priority.to_string(),
            s.reason.clone(),
        ]));
        out.push('\n');
    }
    out
}
