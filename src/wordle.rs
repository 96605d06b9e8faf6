use std::fmt;
use std::str::FromStr;

use colored::Colorize;
use thiserror::Error;

pub const NLETTER: usize = 5;
/// Number of distinct colorings of a word, 3^5.
pub const NPATTERNS: usize = 243;
pub const MAX_GUESSES: usize = 6;
const ALPHABET_SIZE: usize = 26;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LetterStatus {
    Absent = 0,
    Present = 1,
    Correct = 2,
}

/// The feedback for a whole guess, one status per position.
pub type Coloring = [LetterStatus; NLETTER];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {NLETTER} letters, got {0}")]
    WordLength(usize),
    #[error("'{0}' is not a letter")]
    NotALetter(char),
    #[error("expected {NLETTER} colors, got {0}")]
    ColoringLength(usize),
    #[error("'{0}' is not a color (use g/y/x or 2/1/0)")]
    NotAColor(char),
    #[error("expected WORD:COLORS, got \"{0}\"")]
    MissingSeparator(String),
}

/// A five letter word, stored as uppercase ASCII.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word([u8; NLETTER]);

impl Word {
    pub fn letters(&self) -> &[u8; NLETTER] {
        &self.0
    }

    /// Counts the occurences of a letter in the word
    ///
    /// # Example
    ///
    /// ```
    /// use wordle_advisor::wordle::Word;
    ///
    /// let word: Word = "goose".parse().unwrap();
    /// assert_eq!(word.count_letter(b'G'), 1);
    /// assert_eq!(word.count_letter(b'T'), 0);
    /// assert_eq!(word.count_letter(b'O'), 2);
    /// ```
    pub fn count_letter(&self, letter: u8) -> usize {
        self.0.iter().filter(|&&l| l == letter).count()
    }
}

fn letter_index(letter: u8) -> usize {
    (letter - b'A') as usize
}

impl FromStr for Word {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n_chars = s.chars().count();
        if n_chars != NLETTER {
            return Err(ParseError::WordLength(n_chars));
        }
        let mut letters = [b'A'; NLETTER];
        for (slot, c) in letters.iter_mut().zip(s.chars()) {
            if !c.is_ascii_alphabetic() {
                return Err(ParseError::NotALetter(c));
            }
            *slot = c.to_ascii_uppercase() as u8;
        }
        Ok(Word(letters))
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &l in &self.0 {
            write!(f, "{}", l as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({self})")
    }
}

/// Compares a guess to an answer and returns the coloring the puzzle shows.
///
/// Exact matches are marked first. The remaining positions are then scanned
/// left to right and marked present while the answer still has unmatched
/// copies of that letter.
///
/// # Example
///
/// ```
/// use wordle_advisor::wordle::*;
/// use wordle_advisor::wordle::LetterStatus::*;
/// let answer: Word = "tarse".parse().unwrap();
/// let guess: Word = "slate".parse().unwrap();
/// assert_eq!(coloring(&guess, &answer), [Present, Absent, Present, Present, Correct]);
/// ```
pub fn coloring(guess: &Word, answer: &Word) -> Coloring {
    let mut result = [LetterStatus::Absent; NLETTER];
    let mut remaining = [0u8; ALPHABET_SIZE];

    // Find all correct letters
    for (i, (&g, &a)) in guess.0.iter().zip(answer.0.iter()).enumerate() {
        if g == a {
            result[i] = LetterStatus::Correct;
        } else {
            remaining[letter_index(a)] += 1;
        }
    }

    for (i, &g) in guess.0.iter().enumerate() {
        if result[i] == LetterStatus::Correct {
            continue;
        }
        let count = &mut remaining[letter_index(g)];
        if *count > 0 {
            result[i] = LetterStatus::Present;
            *count -= 1;
        }
    }

    result
}

/// Base 3 encoding of a coloring, position 0 is the least significant digit.
pub fn pattern_id(coloring: &Coloring) -> u8 {
    coloring
        .iter()
        .enumerate()
        .map(|(i, x)| 3_u8.pow(i as u32) * *x as u8)
        .sum()
}

/// Inverse of [`pattern_id`].
///
/// # Panics
///
/// Panics if `id` is not below [`NPATTERNS`].
pub fn decode_pattern_id(id: u8) -> Coloring {
    assert!((id as usize) < NPATTERNS, "invalid pattern id {id}");
    let mut status = [LetterStatus::Absent; NLETTER];

    for (i, item) in status.iter_mut().enumerate() {
        let pow = 3_u8.pow(i as u32);
        *item = match id / pow % 3 {
            0 => LetterStatus::Absent,
            1 => LetterStatus::Present,
            2 => LetterStatus::Correct,
            _ => unreachable!(),
        };
    }
    status
}

/// Reads a coloring typed by a user, e.g. `"ggxyx"` or `"22010"`.
pub fn parse_coloring(s: &str) -> Result<Coloring, ParseError> {
    let n_chars = s.chars().count();
    if n_chars != NLETTER {
        return Err(ParseError::ColoringLength(n_chars));
    }
    let mut status = [LetterStatus::Absent; NLETTER];
    for (slot, c) in status.iter_mut().zip(s.chars()) {
        *slot = match c.to_ascii_lowercase() {
            'g' | '2' => LetterStatus::Correct,
            'y' | '1' => LetterStatus::Present,
            'x' | 'b' | '0' => LetterStatus::Absent,
            _ => return Err(ParseError::NotAColor(c)),
        };
    }
    Ok(status)
}

pub fn is_solved(coloring: &Coloring) -> bool {
    coloring.iter().all(|s| *s == LetterStatus::Correct)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Guess {
    pub word: Word,
    pub coloring: Coloring,
}

impl Guess {
    pub fn new(word: Word, coloring: Coloring) -> Guess {
        Guess { word, coloring }
    }

    /// The guess as the puzzle would color it for `answer`.
    pub fn against(word: Word, answer: &Word) -> Guess {
        Guess {
            word,
            coloring: coloring(&word, answer),
        }
    }
}

/// Parses `WORD:COLORS`, e.g. `crane:ggxxx`.
impl FromStr for Guess {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (word, colors) = s
            .split_once(':')
            .ok_or_else(|| ParseError::MissingSeparator(s.to_string()))?;
        Ok(Guess {
            word: word.trim().parse()?,
            coloring: parse_coloring(colors.trim())?,
        })
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (l, s) in self.word.letters().iter().zip(self.coloring.iter()) {
            let ch = (*l as char).to_string();
            match s {
                LetterStatus::Absent => write!(f, "{}", ch.on_bright_black())?,
                LetterStatus::Present => write!(f, "{}", ch.on_yellow())?,
                LetterStatus::Correct => write!(f, "{}", ch.on_green())?,
            }
        }
        Ok(())
    }
}

/// The guesses made so far, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History(Vec<Guess>);

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, guess: Guess) {
        self.0.push(guess)
    }

    pub fn guesses(&self) -> &[Guess] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_solved(&self) -> bool {
        self.0.last().is_some_and(|g| is_solved(&g.coloring))
    }

    /// No more suggestions are needed once the puzzle is solved or out of guesses.
    pub fn is_over(&self) -> bool {
        self.is_solved() || self.0.len() >= MAX_GUESSES
    }
}

impl From<Vec<Guess>> for History {
    fn from(guesses: Vec<Guess>) -> Self {
        History(guesses)
    }
}

#[cfg(test)]
pub(crate) fn w(word: &str) -> Word {
    word.parse().unwrap()
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::collections::HashSet;
    use LetterStatus::*;

    #[test]
    fn test_pattern_id() {
        assert_eq!(pattern_id(&[Absent, Absent, Absent, Absent, Absent]), 0);
        assert_eq!(pattern_id(&[Present, Absent, Absent, Absent, Absent]), 1);
        assert_eq!(pattern_id(&[Present, Absent, Present, Absent, Absent]), 10);
        assert_eq!(pattern_id(&[Correct, Correct, Correct, Correct, Correct]), 242);
        assert_eq!(pattern_id(&[Correct, Correct, Present, Correct, Correct]), 233);
    }

    #[test]
    fn test_decode_pattern_id() {
        assert_eq!(decode_pattern_id(0), [Absent, Absent, Absent, Absent, Absent]);
        assert_eq!(decode_pattern_id(10), [Present, Absent, Present, Absent, Absent]);
        assert_eq!(decode_pattern_id(233), [Correct, Correct, Present, Correct, Correct]);
    }

    #[test]
    fn pattern_ids_never_collide() {
        let ids: HashSet<u8> = (0..NPATTERNS as u8)
            .map(|id| pattern_id(&decode_pattern_id(id)))
            .collect();
        assert_eq!(ids.len(), NPATTERNS);
        for id in 0..NPATTERNS as u8 {
            assert_eq!(pattern_id(&decode_pattern_id(id)), id);
        }
    }

    #[test]
    #[should_panic]
    fn decode_rejects_out_of_range() {
        decode_pattern_id(243);
    }

    #[test]
    fn compare_words() {
        let answer = w("water");

        let expected = [Absent, Absent, Present, Present, Present];
        assert_eq!(coloring(&w("slate"), &answer), expected);

        let expected = [Present, Absent, Present, Absent, Absent];
        assert_eq!(coloring(&w("eerie"), &answer), expected);

        let expected = [Absent, Correct, Correct, Correct, Correct];
        assert_eq!(coloring(&w("eater"), &answer), expected);

        let expected = [Absent, Absent, Present, Absent, Present];
        assert_eq!(coloring(&w("speed"), &w("abide")), expected);

        let expected = [Present, Absent, Present, Present, Absent];
        assert_eq!(coloring(&w("speed"), &w("erase")), expected);

        let expected = [Correct, Absent, Correct, Absent, Absent];
        assert_eq!(coloring(&w("speed"), &w("steal")), expected);

        let expected = [Absent, Present, Correct, Present, Absent];
        assert_eq!(coloring(&w("speed"), &w("crepe")), expected);
    }

    #[test]
    fn crane_against_crash() {
        assert_eq!(
            coloring(&w("CRANE"), &w("CRASH")),
            [Correct, Correct, Correct, Absent, Absent]
        );
        assert_eq!(
            coloring(&w("CRONY"), &w("CRASH")),
            [Correct, Correct, Absent, Absent, Absent]
        );
    }

    #[test]
    fn coloring_respects_letter_counts() {
        let words = [
            "speed", "erase", "crepe", "eerie", "geese", "abbey", "llama", "allay", "mamma",
            "sassy", "tarse", "slate", "water", "goose", "esses",
        ];
        for g in words {
            for a in words {
                let (g, a) = (w(g), w(a));
                let c = coloring(&g, &a);
                let exact = (0..NLETTER)
                    .filter(|&i| g.letters()[i] == a.letters()[i])
                    .count();
                assert_eq!(c.iter().filter(|s| **s == Correct).count(), exact);
                for &letter in g.letters() {
                    let marked = (0..NLETTER)
                        .filter(|&i| g.letters()[i] == letter && c[i] != Absent)
                        .count();
                    assert!(marked <= a.count_letter(letter), "{g} vs {a}");
                }
            }
        }
    }

    #[test]
    fn parse_words() {
        assert_eq!(w("crane").to_string(), "CRANE");
        assert_eq!("cran".parse::<Word>(), Err(ParseError::WordLength(4)));
        assert_eq!("cr4ne".parse::<Word>(), Err(ParseError::NotALetter('4')));
    }

    #[test]
    fn parse_guesses() {
        let guess: Guess = "crane:ggxyx".parse().unwrap();
        assert_eq!(guess.word, w("CRANE"));
        assert_eq!(guess.coloring, [Correct, Correct, Absent, Present, Absent]);
        assert_eq!(parse_coloring("22010"), Ok(guess.coloring));
        assert_eq!(parse_coloring("ggxqx"), Err(ParseError::NotAColor('q')));
        assert!(matches!(
            "crane".parse::<Guess>(),
            Err(ParseError::MissingSeparator(_))
        ));
    }

    #[test]
    fn history_is_over() {
        let mut history = History::new();
        assert!(!history.is_over());
        history.push(Guess::against(w("slate"), &w("crane")));
        assert!(!history.is_solved());
        history.push(Guess::against(w("crane"), &w("crane")));
        assert!(history.is_solved());
        assert!(history.is_over());

        let history: History = (0..MAX_GUESSES)
            .map(|_| Guess::against(w("slate"), &w("crane")))
            .collect::<Vec<_>>()
            .into();
        assert!(history.is_over());
    }
}
