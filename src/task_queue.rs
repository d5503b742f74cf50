//! Bounded, ordered task queue owned by the caller for one scheduling run.

use crate::error::QueueError;
use crate::sorter;
use crate::types::Task;

/// Maximum number of tasks accepted for a single run.
pub const MAX_TASKS: usize = 10;

/// An ordered collection of at most `MAX_TASKS` tasks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskQueue {
    tasks: Vec<Task>,
}

impl TaskQueue {
    /// Create an empty task queue.
    pub fn new() -> Self {
        Self {
            tasks: Vec::with_capacity(MAX_TASKS),
        }
    }

    /// Build a queue from tasks, rejecting more than `MAX_TASKS`.
    #[allow(dead_code)]
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, QueueError> {
        if tasks.len() > MAX_TASKS {
            return Err(QueueError::Full {
                capacity: MAX_TASKS,
            });
        }
        Ok(Self { tasks })
    }

    /// Push a task; returns the task back if the queue is full.
    pub fn push(&mut self, task: Task) -> Result<(), Task> {
        if self.tasks.len() >= MAX_TASKS {
            return Err(task);
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Reorder by ascending priority, keeping input order among ties.
    pub fn sort_by_priority(&mut self) {
        sorter::sort_by_priority(&mut self.tasks);
    }

    /// Current number of queued tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in their current order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}

impl IntoIterator for TaskQueue {
    type Item = Task;
    type IntoIter = std::vec::IntoIter<Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Vec<Task> {
        (1..=count as u64).map(|id| Task::new(id, 0, 1)).collect()
    }

    #[test]
    fn accepts_up_to_capacity() {
        let queue = TaskQueue::from_tasks(numbered(MAX_TASKS)).expect("queue within capacity");
        assert_eq!(queue.len(), MAX_TASKS);
    }

    #[test]
    fn rejects_over_capacity() {
        let result = TaskQueue::from_tasks(numbered(MAX_TASKS + 1));
        assert_eq!(
            result,
            Err(QueueError::Full {
                capacity: MAX_TASKS
            })
        );
    }

    #[test]
    fn push_fails_when_full() {
        let mut queue = TaskQueue::new();
        for task in numbered(MAX_TASKS) {
            queue.push(task).expect("task queue full too early");
        }
        let late = Task::new(99, 0, 1);
        // The rejected task is handed back untouched.
        assert_eq!(queue.push(late.clone()), Err(late));
        assert_eq!(queue.len(), MAX_TASKS);
    }

    #[test]
    fn empty_queue_is_valid() {
        let queue = TaskQueue::from_tasks(Vec::new()).expect("empty queue");
        assert!(queue.is_empty());
    }

    #[test]
    fn sorting_reorders_in_place() {
        let mut queue = TaskQueue::from_tasks(vec![
            Task::new(1, 5, 2),
            Task::new(2, 1, 3),
            Task::new(3, 3, 4),
        ])
        .expect("queue within capacity");
        queue.sort_by_priority();
        let order: Vec<u64> = queue.into_iter().map(|task| task.id).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }
}
