//! Finish-to-start dependency checking
//!
//! Validates proposed task shifts against predecessor finish dates. This
//! is a single-edge check, not a dependency-graph re-solve: each declared
//! predecessor is tested independently against the proposed start.

use chrono::NaiveDate;
use loadshift_core::{BlockingTask, Task};
use std::collections::HashMap;

/// Task lookup by id, borrowed from the project snapshot
pub type TaskIndex<'a> = HashMap<&'a str, &'a Task>;

/// Build an id-keyed index over the task list.
pub fn task_index(tasks: &[Task]) -> TaskIndex<'_> {
    tasks.iter().map(|t| (t.id.as_str(), t)).collect()
}

/// Check whether a task may start at `new_start` without starting before
/// any predecessor's finish.
///
/// Permissive by default: an unknown task id, a task without predecessors,
/// an unknown predecessor, or a predecessor without a finish date never
/// blocks. Predecessor ids are trusted as-is; a cyclic graph is not
/// detected and can only over-constrain, never loop or panic, since only
/// one level of predecessors is walked.
pub fn can_shift(
    task_id: &str,
    new_start: NaiveDate,
    index: &TaskIndex<'_>,
) -> (bool, Vec<BlockingTask>) {
    let Some(task) = index.get(task_id) else {
        return (true, Vec::new());
    };
    if task.predecessors.is_empty() {
        return (true, Vec::new());
    }

    let mut blocking = Vec::new();
    for pred_id in &task.predecessors {
        let Some(pred) = index.get(pred_id.as_str()) else {
            continue;
        };
        let Some(pred_finish) = pred.finish else {
            continue;
        };
        if new_start < pred_finish {
            blocking.push(BlockingTask {
                id: pred_id.clone(),
                name: pred.name.clone(),
                finish: pred_finish,
            });
        }
    }

    (blocking.is_empty(), blocking)
}
