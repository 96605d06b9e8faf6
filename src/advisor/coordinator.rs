use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::ThreadPool;
use tokio::sync::{mpsc, oneshot};

use super::context::{AdvisorContext, Phase};
use super::{AdvisorConfig, AdvisorError, TurnState};
use crate::solver::trie::PrefixSet;
use crate::solver::{possible_answers, score_chunk, Suggestion};
use crate::wordle::Word;

/// A request to compute suggestions, tagged with the generation that was
/// live when it was made.
#[derive(Debug)]
pub(crate) struct Job {
    pub generation: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The puzzle is over, nothing to compute
    Finished,
    Complete,
    Stale,
    Cancelled,
}

/// The background task. Runs one generation at a time until the advisor
/// shuts down, then drops the worker pool.
pub(crate) async fn run(
    mut jobs: mpsc::UnboundedReceiver<Job>,
    context: Arc<AdvisorContext>,
    turn_state: Arc<dyn TurnState>,
    pool: ThreadPool,
    config: AdvisorConfig,
) {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let token = context.shutdown_token().clone();

    loop {
        let mut job = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            job = jobs.recv() => match job {
                Some(job) => job,
                None => break,
            },
        };

        // Only the live state matters, anything queued behind this job supersedes it.
        let mut skipped = 0;
        while let Ok(newer) = jobs.try_recv() {
            job = newer;
            skipped += 1;
        }
        if skipped > 0 {
            log::debug!("skipped {skipped} queued requests, now at generation {}", job.generation);
        }

        match run_generation(&context, turn_state.as_ref(), &pool, &config, &mut rng).await {
            Ok(outcome) => log::debug!("request for generation {} ended: {outcome:?}", job.generation),
            Err(err) => log::error!("request for generation {} failed: {err}", job.generation),
        }
    }
    log::debug!("advisor task stopped");
}

fn is_stale(turn_state: &dyn TurnState, generation: usize) -> bool {
    turn_state.current_generation() != generation
}

fn stale(context: &AdvisorContext, generation: usize) -> Outcome {
    log::trace!("generation {generation} went stale");
    context.set_phase(generation, Phase::Stale);
    Outcome::Stale
}

fn cancelled(context: &AdvisorContext, generation: usize) -> Outcome {
    log::debug!("generation {generation} cancelled by shutdown");
    context.set_phase(generation, Phase::Cancelled);
    Outcome::Cancelled
}

/// Computes suggestions for the puzzle state that is live right now.
///
/// Staleness is checked before and after every chunk. A chunk that was in
/// flight when a new guess arrived is allowed to finish, but its results are
/// dropped.
pub(crate) async fn run_generation(
    context: &AdvisorContext,
    turn_state: &dyn TurnState,
    pool: &ThreadPool,
    config: &AdvisorConfig,
    rng: &mut StdRng,
) -> Result<Outcome, AdvisorError> {
    run_generation_with(context, turn_state, pool, config, rng, score_chunk).await
}

/// Scores one chunk of words against the possible answers.
type ChunkScorer = fn(&[Word], &[Word], &PrefixSet) -> Vec<Suggestion>;

async fn run_generation_with(
    context: &AdvisorContext,
    turn_state: &dyn TurnState,
    pool: &ThreadPool,
    config: &AdvisorConfig,
    rng: &mut StdRng,
    score: ChunkScorer,
) -> Result<Outcome, AdvisorError> {
    let generation = turn_state.current_generation();
    let history = turn_state.current_history();
    if history.len() != generation {
        // a guess landed between the two reads, a newer request follows
        return Ok(Outcome::Stale);
    }
    if history.is_over() {
        return Ok(Outcome::Finished);
    }

    let started = Instant::now();
    context.start_generation(generation);

    let mut words = turn_state.word_list().to_vec();
    words.shuffle(rng);
    let words: Arc<[Word]> = words.into();

    let possible = {
        let words = Arc::clone(&words);
        run_on_pool(pool, move || possible_answers(&words, &history)).await
    };
    let possible = match possible {
        Ok(possible) if !possible.is_empty() => possible,
        Ok(_) => {
            context.set_phase(generation, Phase::Failed);
            return Err(AdvisorError::NoPossibleAnswers);
        }
        Err(err) => {
            context.set_phase(generation, Phase::Failed);
            return Err(err);
        }
    };

    let valid: Arc<PrefixSet> = Arc::new(possible.iter().collect());
    let possible: Arc<[Word]> = possible.into();
    let chunk_size = (config.chunk_factor * words.len().div_ceil(possible.len())).max(1);
    log::debug!(
        "generation {generation}: {} possible answers, scoring {} words in chunks of {chunk_size}",
        possible.len(),
        words.len()
    );
    context.set_phase(generation, Phase::Scoring);

    let mut start = 0;
    while start < words.len() {
        if context.is_shut_down() {
            return Ok(cancelled(context, generation));
        }
        if is_stale(turn_state, generation) {
            return Ok(stale(context, generation));
        }

        let end = (start + chunk_size).min(words.len());
        let scored = {
            let words = Arc::clone(&words);
            let possible = Arc::clone(&possible);
            let valid = Arc::clone(&valid);
            run_on_pool(pool, move || score(&words[start..end], &possible, &valid)).await
        };

        if context.is_shut_down() {
            return Ok(cancelled(context, generation));
        }
        if is_stale(turn_state, generation) {
            return Ok(stale(context, generation));
        }

        match scored {
            Ok(batch) => context.merge(generation, &batch),
            Err(err) => {
                log::warn!("generation {generation}: words {start}..{end} produced no results: {err}")
            }
        }
        context.advance(generation, end as f64 / words.len() as f64);
        start = end;
    }

    context.set_phase(generation, Phase::Complete);
    log::info!(
        "generation {generation}: scored {} words in {:.2}s",
        words.len(),
        started.elapsed().as_secs_f64()
    );
    Ok(Outcome::Complete)
}

/// Runs `f` on the worker pool and waits for its result without blocking the
/// async runtime. A panic inside `f` is returned as an error.
pub(crate) async fn run_on_pool<T, F>(pool: &ThreadPool, f: F) -> Result<T, AdvisorError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    pool.spawn(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(f));
        // the receiver is gone if the advisor was dropped mid-chunk
        let _ = tx.send(result);
    });
    match rx.await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(payload)) => Err(AdvisorError::WorkerPanicked(panic_message(payload))),
        Err(_) => Err(AdvisorError::WorkerLost),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
