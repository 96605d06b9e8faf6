use crate::wordle::Word;

const ALPHABET_SIZE: usize = 26;

#[derive(Debug, Default)]
struct Node {
    children: [Option<Box<Node>>; ALPHABET_SIZE],
    is_end: bool,
}

/// A 26-ary trie over uppercase words, used to answer "is this word still a
/// possible answer" while tagging scored guesses.
#[derive(Debug, Default)]
pub struct PrefixSet {
    root: Node,
    len: usize,
}

impl PrefixSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: &Word) {
        let mut node = &mut self.root;
        for &l in word.letters() {
            node = node.children[(l - b'A') as usize].get_or_insert_with(Box::default);
        }
        if !node.is_end {
            node.is_end = true;
            self.len += 1;
        }
    }

    /// # Example
    ///
    /// ```
    /// use wordle_advisor::solver::trie::PrefixSet;
    /// use wordle_advisor::wordle::Word;
    ///
    /// let crane: Word = "crane".parse().unwrap();
    /// let crate_: Word = "crate".parse().unwrap();
    /// let set: PrefixSet = [crane].iter().collect();
    /// assert!(set.contains(&crane));
    /// assert!(!set.contains(&crate_));
    /// ```
    pub fn contains(&self, word: &Word) -> bool {
        let mut node = &self.root;
        for &l in word.letters() {
            match &node.children[(l - b'A') as usize] {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.is_end
    }

    /// Number of distinct words stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<'a> FromIterator<&'a Word> for PrefixSet {
    fn from_iter<I: IntoIterator<Item = &'a Word>>(iter: I) -> Self {
        let mut set = PrefixSet::new();
        for word in iter {
            set.insert(word);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordle::w;

    #[test]
    fn membership() {
        let words = [w("slate"), w("slant"), w("plate")];
        let set: PrefixSet = words.iter().collect();

        for word in &words {
            assert!(set.contains(word));
        }
        assert!(!set.contains(&w("slats")));
        assert!(!set.contains(&w("crane")));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn duplicates_are_counted_once() {
        let words = [w("slate"), w("slate")];
        let set: PrefixSet = words.iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn empty_set() {
        let set = PrefixSet::new();
        assert!(set.is_empty());
        assert!(!set.contains(&w("slate")));
    }
}
