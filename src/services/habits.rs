use std::collections::BTreeMap;

use crate::storage::models::HabitSample;

/// Samples needed before any suggestion is made.
pub const MIN_SAMPLES: usize = 5;
/// Times a task must repeat to count as a habit.
pub const MIN_REPEATS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitSuggestion {
    pub task: String,
    /// Mean local hour, rounded down.
    pub hour: u32,
    pub frequency: usize,
}

/// Tasks the user keeps setting by hand, most frequent first.
pub fn analyze(samples: &[HabitSample]) -> Vec<HabitSuggestion> {
    if samples.len() < MIN_SAMPLES {
        return Vec::new();
    }

    let mut hours_by_task: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
    for sample in samples {
        hours_by_task.entry(sample.message.as_str()).or_default().push(sample.hour);
    }

    let mut suggestions: Vec<HabitSuggestion> = hours_by_task
        .into_iter()
        .filter(|(_, hours)| hours.len() >= MIN_REPEATS)
        .map(|(task, hours)| HabitSuggestion {
            task: task.to_string(),
            hour: hours.iter().sum::<u32>() / hours.len() as u32,
            frequency: hours.len(),
        })
        .collect();
    suggestions.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.task.cmp(&b.task)));
    suggestions
}
