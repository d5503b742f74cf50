//! Interactive task entry: prompts, parsing, and validation.

use std::io::{BufRead, Write};

use crate::error::{InputError, QueueError};
use crate::task_queue::{MAX_TASKS, TaskQueue};
use crate::types::{Priority, Task, TaskId};

/// Prompt for a task count and each task's fields, assigning ids from 1.
///
/// Any malformed value aborts entry; no partial queue is returned.
pub fn read_tasks<R: BufRead, W: Write>(input: &mut R, prompt: &mut W) -> Result<TaskQueue, InputError> {
    write!(prompt, "Enter number of tasks (Max {MAX_TASKS}): ")?;
    prompt.flush()?;
    let raw = next_value(input, "task count")?;
    let count = parse_count(&raw)?;

    let mut queue = TaskQueue::new();
    for id in 1..=count as TaskId {
        writeln!(prompt, "\nEnter details for Task {id}:")?;

        write!(prompt, "Priority (Lower value = Higher priority): ")?;
        prompt.flush()?;
        let raw = next_value(input, "priority")?;
        let priority: Priority = raw.parse().map_err(|_| InputError::InvalidPriority {
            task: id,
            raw: raw.clone(),
        })?;

        write!(prompt, "Execution Time (in seconds): ")?;
        prompt.flush()?;
        let raw = next_value(input, "execution time")?;
        let execution_time = parse_execution_time(id, &raw)?;

        queue
            .push(Task::new(id, priority, execution_time))
            .map_err(|_| QueueError::Full {
                capacity: MAX_TASKS,
            })?;
    }
    Ok(queue)
}

fn parse_count(raw: &str) -> Result<usize, InputError> {
    let count: i64 = raw.parse().map_err(|_| InputError::InvalidCount {
        raw: raw.to_string(),
    })?;
    if count < 1 || count > MAX_TASKS as i64 {
        return Err(InputError::CountOutOfRange {
            count,
            max: MAX_TASKS,
        });
    }
    Ok(count as usize)
}

fn parse_execution_time(task: TaskId, raw: &str) -> Result<u64, InputError> {
    let value: i64 = raw.parse().map_err(|_| InputError::InvalidExecutionTime {
        task,
        raw: raw.to_string(),
    })?;
    if value < 1 {
        return Err(InputError::NonPositiveExecutionTime { task, value });
    }
    Ok(value as u64)
}

/// Next non-blank line, trimmed.
fn next_value<R: BufRead>(input: &mut R, expected: &'static str) -> Result<String, InputError> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(InputError::UnexpectedEof { expected });
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(text: &str) -> Result<TaskQueue, InputError> {
        let mut input = Cursor::new(text.as_bytes().to_vec());
        let mut prompt = Vec::new();
        read_tasks(&mut input, &mut prompt)
    }

    #[test]
    fn assigns_sequential_ids_in_input_order() {
        let queue = read("3\n5\n1\n1\n2\n3\n1\n").expect("valid input");
        assert_eq!(
            queue.tasks(),
            &[Task::new(1, 5, 1), Task::new(2, 1, 2), Task::new(3, 3, 1)]
        );
    }

    #[test]
    fn tolerates_whitespace_and_blank_lines() {
        let queue = read("  1 \n\n -2 \n 4\n").expect("valid input");
        assert_eq!(queue.tasks(), &[Task::new(1, -2, 4)]);
    }

    #[test]
    fn rejects_non_numeric_count() {
        assert!(matches!(read("abc\n"), Err(InputError::InvalidCount { .. })));
    }

    #[test]
    fn rejects_out_of_range_counts() {
        for raw in ["0\n", "-3\n", "11\n"] {
            assert!(
                matches!(read(raw), Err(InputError::CountOutOfRange { .. })),
                "{raw:?} should be out of range"
            );
        }
        assert!(read("10\n").is_err(), "missing task fields must fail");
    }

    #[test]
    fn rejects_bad_task_fields() {
        assert!(matches!(
            read("1\nhigh\n2\n"),
            Err(InputError::InvalidPriority { task: 1, .. })
        ));
        assert!(matches!(
            read("2\n1\n1\n1\nsoon\n"),
            Err(InputError::InvalidExecutionTime { task: 2, .. })
        ));
        assert!(matches!(
            read("1\n1\n0\n"),
            Err(InputError::NonPositiveExecutionTime { task: 1, value: 0 })
        ));
    }

    #[test]
    fn reports_truncated_input() {
        assert!(matches!(
            read("2\n1\n1\n"),
            Err(InputError::UnexpectedEof { expected: "priority" })
        ));
        assert!(matches!(read(""), Err(InputError::UnexpectedEof { .. })));
    }

    #[test]
    fn prompts_for_each_field() {
        let mut input = Cursor::new(b"1\n4\n2\n".to_vec());
        let mut prompt = Vec::new();
        read_tasks(&mut input, &mut prompt).expect("valid input");
        let text = String::from_utf8(prompt).expect("prompt is utf-8");
        assert!(text.starts_with("Enter number of tasks (Max 10): "));
        assert!(text.contains("Enter details for Task 1:"));
        assert!(text.contains("Priority (Lower value = Higher priority): "));
        assert!(text.contains("Execution Time (in seconds): "));
    }
}
