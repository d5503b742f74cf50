//! Stable priority ordering.

use crate::types::Task;

/// Order tasks by ascending priority in place.
///
/// Equal priorities keep their input order; `sort_by_key` is a stable sort.
pub fn sort_by_priority(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| task.priority);
}
