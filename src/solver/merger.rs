use super::Suggestion;

/// What the caller sees: the ranked top-k and the best guess that can still
/// win on its own.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SuggestionsSnapshot {
    pub top_k: Vec<Suggestion>,
    pub best_valid: Option<Suggestion>,
}

impl SuggestionsSnapshot {
    pub fn is_empty(&self) -> bool {
        self.top_k.is_empty() && self.best_valid.is_none()
    }

    /// The list to show: the best valid suggestion first, then the rest of
    /// the top-k, at most `k` entries when the best valid one was not
    /// already part of it.
    pub fn display_list(&self, k: usize) -> Vec<Suggestion> {
        let Some(best) = self.best_valid else {
            return self.top_k.clone();
        };
        let mut list = vec![best];
        if self.top_k.contains(&best) {
            list.extend(self.top_k.iter().filter(|s| **s != best));
        } else {
            list.extend(self.top_k.iter().copied());
            list.truncate(k);
        }
        list
    }
}

/// Keeps the best `k` suggestions of one generation.
#[derive(Debug)]
pub struct SuggestionMerger {
    k: usize,
    generation: usize,
    top_k: Vec<Suggestion>,
    best_valid: Option<Suggestion>,
}

impl SuggestionMerger {
    pub fn new(k: usize) -> Self {
        SuggestionMerger {
            k,
            generation: 0,
            top_k: Vec::with_capacity(k),
            best_valid: None,
        }
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Forgets everything and starts collecting for `generation`.
    pub fn reset(&mut self, generation: usize) {
        self.generation = generation;
        self.top_k.clear();
        self.best_valid = None;
    }

    /// Folds a freshly scored batch into the running top-k.
    pub fn merge(&mut self, batch: &[Suggestion]) {
        let batch_best_valid = batch
            .iter()
            .filter(|s| s.is_valid_answer)
            .min_by(|a, b| a.rank(b));
        if let Some(candidate) = batch_best_valid {
            match self.best_valid {
                Some(current) if current.entropy >= candidate.entropy => {}
                _ => self.best_valid = Some(*candidate),
            }
        }

        self.top_k.extend_from_slice(batch);
        self.top_k.sort_by(Suggestion::rank);
        while let Some(last) = self.top_k.last() {
            let worthless = last.entropy == 0.0 && !last.is_valid_answer;
            if self.top_k.len() > self.k || worthless {
                self.top_k.pop();
            } else {
                break;
            }
        }
    }

    pub fn snapshot(&self) -> SuggestionsSnapshot {
        SuggestionsSnapshot {
            top_k: self.top_k.clone(),
            best_valid: self.best_valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordle::w;

    fn s(word: &str, entropy: f64, is_valid_answer: bool) -> Suggestion {
        Suggestion {
            word: w(word),
            entropy,
            is_valid_answer,
        }
    }

    fn words(list: &[Suggestion]) -> Vec<String> {
        list.iter().map(|s| s.word.to_string()).collect()
    }

    #[test]
    fn keeps_best_k_sorted() {
        let mut merger = SuggestionMerger::new(3);
        merger.merge(&[s("aaaaa", 1.0, false), s("bbbbb", 4.0, false)]);
        merger.merge(&[s("ccccc", 3.0, false), s("ddddd", 2.0, true), s("eeeee", 0.5, true)]);

        let snapshot = merger.snapshot();
        assert_eq!(words(&snapshot.top_k), vec!["BBBBB", "CCCCC", "DDDDD"]);
        assert!(snapshot
            .top_k
            .windows(2)
            .all(|pair| pair[0].rank(&pair[1]).is_le()));
    }

    #[test]
    fn valid_words_win_ties() {
        let mut merger = SuggestionMerger::new(1);
        merger.merge(&[s("aaaaa", 2.0, false)]);
        merger.merge(&[s("bbbbb", 2.0, true)]);
        assert_eq!(words(&merger.snapshot().top_k), vec!["BBBBB"]);
    }

    #[test]
    fn drops_zero_information_invalid_words() {
        let mut merger = SuggestionMerger::new(6);
        merger.merge(&[
            s("aaaaa", 0.0, false),
            s("bbbbb", 1.5, false),
            s("ccccc", 0.0, true),
            s("ddddd", 0.0, false),
        ]);
        assert_eq!(words(&merger.snapshot().top_k), vec!["BBBBB", "CCCCC"]);
    }

    #[test]
    fn only_zero_information_invalid_words() {
        let mut merger = SuggestionMerger::new(6);
        merger.merge(&[s("aaaaa", 0.0, false)]);
        assert!(merger.snapshot().is_empty());
    }

    #[test]
    fn best_valid_survives_eviction() {
        let mut merger = SuggestionMerger::new(2);
        merger.merge(&[s("aaaaa", 1.0, true), s("bbbbb", 0.5, true)]);
        merger.merge(&[s("ccccc", 3.0, false), s("ddddd", 2.0, false)]);

        let snapshot = merger.snapshot();
        assert_eq!(words(&snapshot.top_k), vec!["CCCCC", "DDDDD"]);
        assert_eq!(snapshot.best_valid, Some(s("aaaaa", 1.0, true)));

        // only a strictly better valid word replaces it
        merger.merge(&[s("eeeee", 1.0, true)]);
        assert_eq!(merger.snapshot().best_valid, Some(s("aaaaa", 1.0, true)));
        merger.merge(&[s("fffff", 1.2, true)]);
        assert_eq!(merger.snapshot().best_valid, Some(s("fffff", 1.2, true)));
    }

    #[test]
    fn reset_clears_state() {
        let mut merger = SuggestionMerger::new(2);
        merger.merge(&[s("aaaaa", 1.0, true)]);
        merger.reset(3);
        assert_eq!(merger.generation(), 3);
        assert!(merger.snapshot().is_empty());
    }

    #[test]
    fn display_list_puts_best_valid_first() {
        let snapshot = SuggestionsSnapshot {
            top_k: vec![s("ccccc", 3.0, false), s("aaaaa", 2.0, true), s("ddddd", 1.0, false)],
            best_valid: Some(s("aaaaa", 2.0, true)),
        };
        assert_eq!(words(&snapshot.display_list(3)), vec!["AAAAA", "CCCCC", "DDDDD"]);

        let snapshot = SuggestionsSnapshot {
            top_k: vec![s("ccccc", 3.0, false), s("ddddd", 2.5, false)],
            best_valid: Some(s("aaaaa", 1.0, true)),
        };
        assert_eq!(words(&snapshot.display_list(2)), vec!["AAAAA", "CCCCC"]);
    }
}
