use std::fs::File;
use std::io::{prelude::*, BufReader};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::wordle::Word;

const DATA: &[u8] = include_bytes!("../../data/words.txt");

/// The word list shipped with the binary.
pub fn default_words() -> Result<Arc<[Word]>> {
    parse(BufReader::new(DATA)).context("Parsing the embedded word list")
}

pub fn load(path: &Path) -> Result<Arc<[Word]>> {
    let file = File::open(path).with_context(|| format!("Opening {}", path.display()))?;
    parse(BufReader::new(file)).with_context(|| format!("Parsing {}", path.display()))
}

/// One word per line. Blank lines and lines starting with `#` are skipped.
pub fn parse<R: BufRead>(reader: R) -> Result<Arc<[Word]>> {
    let mut words = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.context("Error reading line")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let word: Word = line
            .parse()
            .with_context(|| format!("Line {}: \"{line}\"", i + 1))?;
        words.push(word);
    }
    if words.is_empty() {
        bail!("The word list is empty");
    }
    Ok(words.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordle::w;

    #[test]
    fn parses_words_and_skips_comments() {
        let text = "# five letter words\ncrane\n\n  Slate \nTRACE\n";
        let words = parse(text.as_bytes()).unwrap();
        assert_eq!(&*words, &[w("crane"), w("slate"), w("trace")]);
    }

    #[test]
    fn reports_the_bad_line() {
        let err = parse("crane\ncranes\n".as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("Line 2"));
    }

    #[test]
    fn rejects_empty_lists() {
        assert!(parse("# nothing\n".as_bytes()).is_err());
    }

    #[test]
    fn embedded_list_loads() {
        let words = default_words().unwrap();
        assert!(words.len() > 2000);
        assert!(words.contains(&w("crane")));
    }
}
