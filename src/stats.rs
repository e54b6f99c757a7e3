use crate::models::{TaskRecord, TaskStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_tasks: usize,
    pub planned_count: usize,
    pub done_count: usize,
    pub completion_rate: u32,
}

/// Colour band of the completion rate on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionLevel {
    Good,
    Fair,
    Poor,
}

impl Stats {
    pub fn level(&self) -> CompletionLevel {
        match self.completion_rate {
            80.. => CompletionLevel::Good,
            50.. => CompletionLevel::Fair,
            _ => CompletionLevel::Poor,
        }
    }
}

/// Completion is measured against planned work only: a task marked done
/// without being planned does not count.
pub fn compute_stats(tasks: &[TaskRecord]) -> Stats {
    let planned_count = tasks.iter().filter(|task| task.is_planned()).count();
    let done_count = tasks
        .iter()
        .filter(|task| task.is_planned() && task.status == Some(TaskStatus::Done))
        .count();

    Stats {
        total_tasks: tasks.len(),
        planned_count,
        done_count,
        completion_rate: completion_rate(done_count, planned_count),
    }
}

// Integer percentage, rounded half-up.
fn completion_rate(done: usize, planned: usize) -> u32 {
    if planned == 0 {
        return 0;
    }
    ((done * 200 + planned) / (planned * 2)) as u32
}
