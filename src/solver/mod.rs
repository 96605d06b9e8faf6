pub mod data;
pub mod merger;
pub mod trie;

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::wordle::{coloring, decode_pattern_id, pattern_id, Coloring, History, Word, NPATTERNS};
use trie::PrefixSet;

/// A scored guess.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Suggestion {
    pub word: Word,
    /// Expected information of the guess in bits
    pub entropy: f64,
    /// The word itself is still a possible answer
    pub is_valid_answer: bool,
}

impl Suggestion {
    /// Higher entropy first, valid answers first on ties.
    pub fn rank(&self, other: &Suggestion) -> Ordering {
        other
            .entropy
            .total_cmp(&self.entropy)
            .then(other.is_valid_answer.cmp(&self.is_valid_answer))
    }
}

fn keep_word(word: &Word, history: &History) -> bool {
    history
        .guesses()
        .iter()
        .all(|guess| coloring(&guess.word, word) == guess.coloring)
}

/// Returns the words that would have produced every coloring in `history`.
///
/// # Example
///
/// ```
/// use wordle_advisor::solver::possible_answers;
/// use wordle_advisor::wordle::*;
///
/// let words: Vec<Word> = ["crane", "crash", "slate"]
///     .iter()
///     .map(|w| w.parse().unwrap())
///     .collect();
/// let mut history = History::new();
/// history.push(Guess::against(words[0], &words[1]));
/// assert_eq!(possible_answers(&words, &history), vec![words[1]]);
/// ```
pub fn possible_answers(words: &[Word], history: &History) -> Vec<Word> {
    if history.is_empty() {
        return words.to_vec();
    }
    words
        .par_iter()
        .filter(|word| keep_word(word, history))
        .copied()
        .collect()
}

fn pattern_counts(word: &Word, possible_answers: &[Word]) -> [u32; NPATTERNS] {
    let mut counts = [0u32; NPATTERNS];
    for answer in possible_answers {
        counts[pattern_id(&coloring(word, answer)) as usize] += 1;
    }
    counts
}

/// Shannon entropy, in bits, of the colorings `word` produces over
/// `possible_answers`.
///
/// # Panics
///
/// Panics if `possible_answers` is empty. An empty answer set means the
/// history contradicts itself and there is nothing to score against.
pub fn entropy(word: &Word, possible_answers: &[Word]) -> f64 {
    assert!(
        !possible_answers.is_empty(),
        "entropy of {word} over an empty answer set"
    );
    let counts = pattern_counts(word, possible_answers);

    let total = possible_answers.len() as f64;
    let entropy: f64 = counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum();
    // A single bucket gives -1 * log2(1) = -0.0
    entropy.max(0.0)
}

/// The coloring `word` most often produces over `possible_answers`, the
/// lowest pattern id wins ties. `None` for an empty answer set.
pub fn likely_coloring(word: &Word, possible_answers: &[Word]) -> Option<Coloring> {
    if possible_answers.is_empty() {
        return None;
    }
    let counts = pattern_counts(word, possible_answers);
    let (id, _) = counts
        .iter()
        .enumerate()
        .max_by(|(a, x), (b, y)| x.cmp(y).then(b.cmp(a)))?;
    Some(decode_pattern_id(id as u8))
}

/// Scores every word of `chunk` in parallel on the current rayon pool.
pub fn score_chunk(chunk: &[Word], possible_answers: &[Word], valid: &PrefixSet) -> Vec<Suggestion> {
    chunk
        .par_iter()
        .map(|word| Suggestion {
            word: *word,
            entropy: entropy(word, possible_answers),
            is_valid_answer: valid.contains(word),
        })
        .collect()
}
