//! Exercise completion tracking.
//!
//! The prescribed plan (names, sets, reps) comes from outside this core;
//! only completion state and the adherence percentage live here.

use std::collections::HashSet;

use crate::metrics;

/// Tracks which exercises of a prescribed plan are done today.
#[derive(Debug, Clone, Default)]
pub struct AdherenceTracker {
    plan: Vec<String>,
    completed: HashSet<String>,
}

impl AdherenceTracker {
    pub fn new(plan: Vec<String>) -> Self {
        AdherenceTracker {
            plan,
            completed: HashSet::new(),
        }
    }

    /// Flip completion for one exercise. Ids outside the plan are ignored.
    /// Returns the new completion state.
    pub fn toggle(&mut self, exercise_id: &str) -> bool {
        if !self.plan.iter().any(|id| id == exercise_id) {
            return false;
        }
        if self.completed.remove(exercise_id) {
            false
        } else {
            self.completed.insert(exercise_id.to_string());
            true
        }
    }

    pub fn is_complete(&self, exercise_id: &str) -> bool {
        self.completed.contains(exercise_id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn plan_len(&self) -> usize {
        self.plan.len()
    }

    /// Completed / total as a rounded whole percentage.
    pub fn adherence_pct(&self) -> u32 {
        metrics::adherence_pct(self.completed.len(), self.plan.len())
    }
}
