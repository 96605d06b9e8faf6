use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::solver::merger::{SuggestionMerger, SuggestionsSnapshot};
use crate::solver::Suggestion;

/// Where the computation for a generation currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Filtering,
    Scoring,
    Complete,
    /// A newer guess was made before the computation finished
    Stale,
    /// The history left no possible answer, or filtering failed
    Failed,
    /// The advisor shut down before the computation finished
    Cancelled,
}

#[derive(Debug)]
struct Progress {
    generation: usize,
    fraction: f64,
    phase: Phase,
}

/// The state shared between the background computation and its readers.
///
/// Every field has its own lock. Values are tagged with the generation they
/// were computed for, and readers pass in the live generation so that
/// results for an older puzzle state are never handed out.
#[derive(Debug)]
pub struct AdvisorContext {
    suggestions: Mutex<SuggestionMerger>,
    progress: Mutex<Progress>,
    shutdown: CancellationToken,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AdvisorContext {
    pub fn new(k: usize) -> Self {
        AdvisorContext {
            suggestions: Mutex::new(SuggestionMerger::new(k)),
            progress: Mutex::new(Progress {
                generation: 0,
                fraction: 0.0,
                phase: Phase::Idle,
            }),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    pub(crate) fn start_generation(&self, generation: usize) {
        lock(&self.suggestions).reset(generation);
        *lock(&self.progress) = Progress {
            generation,
            fraction: 0.0,
            phase: Phase::Filtering,
        };
    }

    pub(crate) fn set_phase(&self, generation: usize, phase: Phase) {
        let mut progress = lock(&self.progress);
        if progress.generation == generation {
            progress.phase = phase;
        }
    }

    /// Progress never moves backwards within a generation.
    pub(crate) fn advance(&self, generation: usize, fraction: f64) {
        let mut progress = lock(&self.progress);
        if progress.generation == generation {
            progress.fraction = progress.fraction.max(fraction.clamp(0.0, 1.0));
        }
    }

    pub(crate) fn merge(&self, generation: usize, batch: &[Suggestion]) {
        let mut suggestions = lock(&self.suggestions);
        if suggestions.generation() == generation {
            suggestions.merge(batch);
        }
    }

    pub fn suggestions(&self, live_generation: usize) -> SuggestionsSnapshot {
        let suggestions = lock(&self.suggestions);
        if suggestions.generation() == live_generation {
            suggestions.snapshot()
        } else {
            SuggestionsSnapshot::default()
        }
    }

    pub fn progress(&self, live_generation: usize) -> f64 {
        let progress = lock(&self.progress);
        if progress.generation == live_generation {
            progress.fraction
        } else {
            0.0
        }
    }

    pub fn phase(&self, live_generation: usize) -> Phase {
        let progress = lock(&self.progress);
        if progress.generation == live_generation {
            progress.phase
        } else {
            Phase::Idle
        }
    }

    /// Suggestions as stored, whatever generation they belong to.
    #[cfg(test)]
    pub(crate) fn stored_suggestions(&self) -> (usize, SuggestionsSnapshot) {
        let suggestions = lock(&self.suggestions);
        (suggestions.generation(), suggestions.snapshot())
    }
}
