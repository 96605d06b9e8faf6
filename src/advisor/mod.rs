//! The live advisor: recomputes ranked suggestions in the background every
//! time the puzzle state moves on, and lets the caller read the best results
//! found so far at any time.

pub mod context;
mod coordinator;

use std::num::NonZeroUsize;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::solver::merger::SuggestionsSnapshot;
use crate::wordle::{History, Word};
use context::{AdvisorContext, Phase};
use coordinator::Job;

/// Number of suggestions kept.
pub const N_SUGGESTIONS: usize = 6;
/// Scales the chunk size, see [`AdvisorConfig::chunk_factor`].
pub const CHUNK_SIZE_FACTOR: usize = 8;

/// The puzzle state the advisor reads from.
///
/// The generation is the number of guesses made. Implementations must keep
/// `current_history().len() == current_generation()` whenever both are read
/// under the same state.
pub trait TurnState: Send + Sync {
    fn current_history(&self) -> History;
    fn current_generation(&self) -> usize;
    fn word_list(&self) -> Arc<[Word]>;
}

/// A turn state that never changes, for one-off computations.
#[derive(Debug, Clone)]
pub struct FixedTurnState {
    words: Arc<[Word]>,
    history: History,
}

impl FixedTurnState {
    pub fn new(words: Arc<[Word]>, history: History) -> Self {
        FixedTurnState { words, history }
    }
}

impl TurnState for FixedTurnState {
    fn current_history(&self) -> History {
        self.history.clone()
    }

    fn current_generation(&self) -> usize {
        self.history.len()
    }

    fn word_list(&self) -> Arc<[Word]> {
        Arc::clone(&self.words)
    }
}

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("could not build the worker pool")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("no word in the dictionary is consistent with the guesses")]
    NoPossibleAnswers,
    #[error("worker panicked: {0}")]
    WorkerPanicked(String),
    #[error("worker pool dropped the task")]
    WorkerLost,
}

#[derive(Clone, Debug)]
pub struct AdvisorConfig {
    /// Size of the scoring pool
    pub threads: usize,
    /// Number of suggestions kept
    pub top_k: usize,
    /// Chunks hold `chunk_factor * ceil(words / possible answers)` words, so
    /// chunks get larger as scoring each word gets cheaper.
    pub chunk_factor: usize,
    /// Seed for the per generation shuffle, random when unset
    pub seed: Option<u64>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        AdvisorConfig {
            threads: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            top_k: N_SUGGESTIONS,
            chunk_factor: CHUNK_SIZE_FACTOR,
            seed: None,
        }
    }
}

/// Handle to the background advisor task.
pub struct Advisor {
    context: Arc<AdvisorContext>,
    turn_state: Arc<dyn TurnState>,
    jobs: Option<mpsc::UnboundedSender<Job>>,
    task: Option<JoinHandle<()>>,
}

impl Advisor {
    /// Builds the worker pool and starts the background task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(turn_state: Arc<dyn TurnState>, config: AdvisorConfig) -> Result<Self, AdvisorError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("advisor-worker-{i}"))
            .build()?;
        let context = Arc::new(AdvisorContext::new(config.top_k));
        let (tx, rx) = mpsc::unbounded_channel();

        log::debug!("starting advisor with {} workers", pool.current_num_threads());
        let task = tokio::spawn(coordinator::run(
            rx,
            Arc::clone(&context),
            Arc::clone(&turn_state),
            pool,
            config,
        ));

        Ok(Advisor {
            context,
            turn_state,
            jobs: Some(tx),
            task: Some(task),
        })
    }

    /// Queues a computation for the live puzzle state. Does nothing once the
    /// puzzle is over or the advisor was shut down.
    pub fn request_computation_for_current_state(&self) {
        let Some(jobs) = &self.jobs else {
            return;
        };
        if self.context.is_shut_down() || self.turn_state.current_history().is_over() {
            return;
        }
        let generation = self.turn_state.current_generation();
        if jobs.send(Job { generation }).is_err() {
            log::warn!("advisor task is gone, dropping request for generation {generation}");
        }
    }

    /// Stops the advisor: no new requests are accepted, the chunk in flight
    /// is allowed to finish and the worker pool is released.
    pub async fn cancel_all(&mut self) {
        self.context.shutdown_token().cancel();
        self.jobs.take();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                log::error!("advisor task ended abnormally: {err}");
            }
        }
    }

    pub fn snapshot_suggestions(&self) -> SuggestionsSnapshot {
        self.context
            .suggestions(self.turn_state.current_generation())
    }

    /// Fraction of the dictionary scored for the live generation, in `[0, 1]`.
    pub fn snapshot_progress(&self) -> f64 {
        self.context.progress(self.turn_state.current_generation())
    }

    pub fn snapshot_phase(&self) -> Phase {
        self.context.phase(self.turn_state.current_generation())
    }
}

impl Drop for Advisor {
    fn drop(&mut self) {
        self.context.shutdown_token().cancel();
    }
}
