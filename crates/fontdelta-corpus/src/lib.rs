// this_file: crates/fontdelta-corpus/src/lib.rs

//! Builds the per-script word lists the shaping checks read.
//!
//! Text is streamed line by line and split on whitespace. A word survives
//! when every character belongs to the allowed set, and the final list drops
//! any word that already appears inside a longer one: `cat` adds nothing once
//! `category` is being shaped.

use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use aho_corasick::AhoCorasick;
use fontdelta_core::{
    error::{CorpusError, Result},
    report::{Diagnostic, Reporter},
};

/// Quote marks wrap obscure words in wiki dumps; they are not part of the word
const QUOTE: char = '\'';

/// Accumulates candidate words from any number of text sources
pub struct CorpusBuilder<'a> {
    allowed: HashSet<char>,
    bank: BTreeSet<String>,
    seen: HashSet<char>,
    reporter: &'a dyn Reporter,
}

impl<'a> CorpusBuilder<'a> {
    pub fn new(allowed: HashSet<char>, reporter: &'a dyn Reporter) -> Self {
        Self {
            allowed,
            bank: BTreeSet::new(),
            seen: HashSet::new(),
            reporter,
        }
    }

    /// Streams one source; `name` only labels errors
    pub fn add_source<R: BufRead>(&mut self, name: &Path, reader: R) -> Result<()> {
        for line in reader.lines() {
            let line = line.map_err(|source| CorpusError::SourceUnreadable {
                path: name.to_path_buf(),
                source,
            })?;
            for raw in line.split_whitespace() {
                self.add_word(raw);
            }
        }
        Ok(())
    }

    /// Opens and streams a file
    pub fn add_path(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|source| CorpusError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Reading words from {}", path.display());
        self.add_source(path, BufReader::new(file))
    }

    fn add_word(&mut self, raw: &str) {
        let word: String = raw.chars().filter(|&c| c != QUOTE).collect();
        if word.is_empty() || !word.chars().all(|c| self.allowed.contains(&c)) {
            return;
        }
        self.seen.extend(word.chars());
        self.bank.insert(word);
    }

    /// Reports coverage and returns the minimal word set
    pub fn finish(self) -> Result<BTreeSet<String>> {
        let unseen: BTreeSet<char> = self
            .allowed
            .iter()
            .filter(|c| !self.seen.contains(c))
            .copied()
            .collect();
        self.reporter.report(Diagnostic::UnseenCharacters {
            unseen,
            total: self.allowed.len(),
        });

        remove_substring_words(&self.bank)
    }
}

/// Drops every word that occurs inside another word of the set
///
/// One automaton is built over all words; each word is then scanned with
/// overlapping matches so nested and adjacent occurrences are all found.
pub fn remove_substring_words(words: &BTreeSet<String>) -> Result<BTreeSet<String>> {
    if words.is_empty() {
        return Ok(BTreeSet::new());
    }

    let patterns: Vec<&str> = words.iter().map(String::as_str).collect();
    let automaton =
        AhoCorasick::new(&patterns).map_err(|e| CorpusError::Matcher(e.to_string()))?;

    let mut contained = vec![false; patterns.len()];
    for (idx, word) in patterns.iter().enumerate() {
        for found in automaton.find_overlapping_iter(word) {
            let pattern = found.pattern().as_usize();
            if pattern != idx {
                contained[pattern] = true;
            }
        }
    }

    Ok(patterns
        .into_iter()
        .zip(contained)
        .filter(|(_, inside)| !inside)
        .map(|(word, _)| word.to_string())
        .collect())
}

/// Builds a corpus from readers that are already open
pub fn build_corpus<I, R>(
    sources: I,
    allowed: &HashSet<char>,
    reporter: &dyn Reporter,
) -> Result<BTreeSet<String>>
where
    I: IntoIterator<Item = R>,
    R: BufRead,
{
    let mut builder = CorpusBuilder::new(allowed.clone(), reporter);
    for (idx, reader) in sources.into_iter().enumerate() {
        builder.add_source(&PathBuf::from(format!("<source {idx}>")), reader)?;
    }
    builder.finish()
}

/// Builds a corpus from text files on disk
pub fn build_corpus_from_paths<P: AsRef<Path>>(
    paths: &[P],
    allowed: &HashSet<char>,
    reporter: &dyn Reporter,
) -> Result<BTreeSet<String>> {
    let mut builder = CorpusBuilder::new(allowed.clone(), reporter);
    for path in paths {
        builder.add_path(path.as_ref())?;
    }
    builder.finish()
}

/// Writes one word per line
pub fn write_corpus(words: &BTreeSet<String>, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for word in words {
        writeln!(out, "{word}")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod proptests;
