use std::sync::{Arc, Mutex, PoisonError};

use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::advisor::TurnState;
use crate::wordle::{Guess, History, Word, MAX_GUESSES};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("{0} is not in the word list")]
    NotInWordList(Word),
    #[error("the game has ended")]
    GameOver,
    #[error("the word list is empty")]
    EmptyWordList,
}

/// One round of the puzzle: a hidden answer and the guesses made so far.
#[derive(Debug)]
pub struct Wordle {
    words: Arc<[Word]>,
    dictionary: FxHashSet<Word>,
    answer: Word,
    history: History,
}

impl Wordle {
    pub fn new(words: Arc<[Word]>, answer: Word) -> Result<Self, GameError> {
        let dictionary: FxHashSet<Word> = words.iter().copied().collect();
        if !dictionary.contains(&answer) {
            return Err(GameError::NotInWordList(answer));
        }
        Ok(Wordle {
            words,
            dictionary,
            answer,
            history: History::new(),
        })
    }

    /// Starts a round with an answer picked at random from `words`.
    pub fn random(words: Arc<[Word]>) -> Result<Self, GameError> {
        let answer = *words
            .choose(&mut rand::thread_rng())
            .ok_or(GameError::EmptyWordList)?;
        Self::new(words, answer)
    }

    pub fn is_valid_guess(&self, word: &Word) -> bool {
        self.dictionary.contains(word)
    }

    pub fn guess_word(&mut self, word: Word) -> Result<&Guess, GameError> {
        if !self.is_active() {
            return Err(GameError::GameOver);
        }
        if !self.is_valid_guess(&word) {
            return Err(GameError::NotInWordList(word));
        }
        self.history.push(Guess::against(word, &self.answer));
        Ok(&self.history.guesses()[self.history.len() - 1])
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn guesses_made(&self) -> usize {
        self.history.len()
    }

    pub fn answer(&self) -> Word {
        self.answer
    }

    pub fn won(&self) -> bool {
        self.history.is_solved()
    }

    pub fn is_active(&self) -> bool {
        !self.won() && self.history.len() < MAX_GUESSES
    }
}

impl TurnState for Mutex<Wordle> {
    fn current_history(&self) -> History {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .clone()
    }

    fn current_generation(&self) -> usize {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .guesses_made()
    }

    fn word_list(&self) -> Arc<[Word]> {
        Arc::clone(&self.lock().unwrap_or_else(PoisonError::into_inner).words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordle::{w, LetterStatus::*};

    fn words() -> Arc<[Word]> {
        ["crane", "crash", "slate", "trace"].iter().map(|s| w(s)).collect()
    }

    #[test]
    fn guesses_are_colored() {
        let mut game = Wordle::new(words(), w("crash")).unwrap();
        let guess = game.guess_word(w("crane")).unwrap();
        assert_eq!(guess.coloring, [Correct, Correct, Correct, Absent, Absent]);
        assert_eq!(game.guesses_made(), 1);
        assert!(game.is_active());
    }

    #[test]
    fn unknown_words_are_rejected() {
        let mut game = Wordle::new(words(), w("crash")).unwrap();
        assert_eq!(
            game.guess_word(w("fuzzy")),
            Err(GameError::NotInWordList(w("fuzzy")))
        );
        assert_eq!(game.guesses_made(), 0);
        assert!(Wordle::new(words(), w("fuzzy")).is_err());
    }

    #[test]
    fn winning_ends_the_game() {
        let mut game = Wordle::new(words(), w("slate")).unwrap();
        game.guess_word(w("slate")).unwrap();
        assert!(game.won());
        assert!(!game.is_active());
        assert_eq!(game.guess_word(w("crane")), Err(GameError::GameOver));
    }

    #[test]
    fn six_misses_end_the_game() {
        let mut game = Wordle::new(words(), w("slate")).unwrap();
        for _ in 0..MAX_GUESSES {
            game.guess_word(w("crane")).unwrap();
        }
        assert!(!game.won());
        assert!(!game.is_active());
    }

    #[test]
    fn turn_state_tracks_guesses() {
        let state = Mutex::new(Wordle::new(words(), w("crash")).unwrap());
        assert_eq!(state.current_generation(), 0);
        state.lock().unwrap().guess_word(w("trace")).unwrap();
        assert_eq!(state.current_generation(), 1);
        assert_eq!(state.current_history().len(), 1);
        assert_eq!(state.word_list().len(), 4);
    }
}
