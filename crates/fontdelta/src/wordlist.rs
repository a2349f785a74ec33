//! Word lists: where they live and how their lines read
//!
//! Each line is either a bare word or `word,script,lang,feature,...` with
//! OpenType tags for script, language and features. A bare word lets the
//! shaper guess its segment properties.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use fontdelta_core::{error::WordlistError, ShapingParams};

use crate::tables::html_lang;

/// One parsed word-list line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordlistEntry {
    pub word: String,
    pub script: Option<String>,
    pub lang: Option<String>,
    /// Features to enable, first occurrence order, no repeats
    pub features: Vec<String>,
    /// Whether the line had any columns after the word, even empty ones
    pub tagged: bool,
}

impl WordlistEntry {
    /// A word with nothing pinned
    pub fn bare(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            script: None,
            lang: None,
            features: Vec::new(),
            tagged: false,
        }
    }

    /// Parses one line; blank lines yield `None`
    ///
    /// Missing or empty fields are absent, so `word,latn` pins the script and
    /// leaves the language to the shaper. [`WordlistEntry::tagged`] still
    /// tells `word,,,smcp` apart from a bare `word`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut fields = line.split(',');
        let word = fields.next().filter(|w| !w.is_empty())?;
        let tagged = word.len() < line.len();

        let non_empty =
            |field: Option<&str>| field.filter(|f| !f.is_empty()).map(str::to_string);
        let script = non_empty(fields.next());
        let lang = non_empty(fields.next());

        let mut features: Vec<String> = Vec::new();
        for feature in fields.filter(|f| !f.is_empty()) {
            if !features.iter().any(|f| f == feature) {
                features.push(feature.to_string());
            }
        }

        Some(Self {
            word: word.to_string(),
            script,
            lang,
            features,
            tagged,
        })
    }

    /// Display language for reports
    ///
    /// Only an untagged word reads as English; `word,,,smcp` names no pair
    /// and resolves to nothing.
    pub fn display_lang(&self) -> Option<&'static str> {
        if !self.tagged {
            return html_lang(None, None);
        }
        html_lang(
            Some(self.script.as_deref().unwrap_or_default()),
            Some(self.lang.as_deref().unwrap_or_default()),
        )
    }

    /// Shaping settings for this entry at a given size
    pub fn shaping_params(&self, size: f32, variations: Vec<(String, f32)>) -> ShapingParams {
        ShapingParams {
            size,
            script: self.script.clone(),
            language: self.lang.clone(),
            features: self.features.iter().map(|f| (f.clone(), 1)).collect(),
            variations,
            ..Default::default()
        }
    }
}

/// Reads every entry from an open word list
pub fn parse_wordlist<R: BufRead>(
    path: &Path,
    reader: R,
) -> Result<Vec<WordlistEntry>, WordlistError> {
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|source| WordlistError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        entries.extend(WordlistEntry::parse(&line));
    }
    Ok(entries)
}

/// Opens and reads a word list, telling absence apart from damage
pub fn read_wordlist(script: &str, path: &Path) -> Result<Vec<WordlistEntry>, WordlistError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => WordlistError::NotFound {
            script: script.to_string(),
            path: path.to_path_buf(),
        },
        _ => WordlistError::Parse {
            path: path.to_path_buf(),
            source,
        },
    })?;
    parse_wordlist(path, BufReader::new(file))
}

/// Anything that can hand over the word list for a script
pub trait WordlistSource: Send + Sync {
    fn load(&self, script: &str) -> Result<Vec<WordlistEntry>, WordlistError>;
}

/// Word lists stored as `<root>/<Script>.txt`
#[derive(Debug, Clone)]
pub struct WordlistDir {
    root: PathBuf,
}

impl WordlistDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, script: &str) -> PathBuf {
        self.root.join(format!("{script}.txt"))
    }
}

impl WordlistSource for WordlistDir {
    fn load(&self, script: &str) -> Result<Vec<WordlistEntry>, WordlistError> {
        read_wordlist(script, &self.path_for(script))
    }
}

/// Word lists held in memory, keyed by script
#[derive(Debug, Clone, Default)]
pub struct MemoryWordlists {
    lists: BTreeMap<String, Vec<WordlistEntry>>,
}

impl MemoryWordlists {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a script's list from raw lines
    pub fn with_lines<I, S>(mut self, script: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = lines
            .into_iter()
            .filter_map(|line| WordlistEntry::parse(line.as_ref()))
            .collect();
        self.lists.insert(script.to_string(), entries);
        self
    }
}

impl WordlistSource for MemoryWordlists {
    fn load(&self, script: &str) -> Result<Vec<WordlistEntry>, WordlistError> {
        self.lists
            .get(script)
            .cloned()
            .ok_or_else(|| WordlistError::NotFound {
                script: script.to_string(),
                path: PathBuf::from(format!("{script}.txt")),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_bare_word() {
        let entry = WordlistEntry::parse("hamburg").unwrap();
        assert_eq!(entry, WordlistEntry::bare("hamburg"));
    }

    #[test]
    fn test_full_line() {
        let entry = WordlistEntry::parse("café,latn,FRA,liga,kern,liga\r").unwrap();
        assert_eq!(entry.word, "café");
        assert_eq!(entry.script.as_deref(), Some("latn"));
        assert_eq!(entry.lang.as_deref(), Some("FRA"));
        assert_eq!(entry.features, vec!["liga", "kern"]);
    }

    #[test]
    fn test_partial_and_empty_fields() {
        let entry = WordlistEntry::parse("word,latn").unwrap();
        assert_eq!(entry.script.as_deref(), Some("latn"));
        assert_eq!(entry.lang, None);

        let entry = WordlistEntry::parse("word,,,smcp,").unwrap();
        assert_eq!(entry.script, None);
        assert_eq!(entry.lang, None);
        assert_eq!(entry.features, vec!["smcp"]);
    }

    #[test]
    fn test_empty_tag_columns_resolve_no_language() {
        assert_eq!(WordlistEntry::parse("word").unwrap().display_lang(), Some("en"));
        assert_eq!(WordlistEntry::parse("word,,,smcp").unwrap().display_lang(), None);
        assert_eq!(WordlistEntry::parse("word,").unwrap().display_lang(), None);
        assert_eq!(WordlistEntry::parse("word,latn").unwrap().display_lang(), None);
        assert_eq!(
            WordlistEntry::parse("word,latn,dflt").unwrap().display_lang(),
            Some("en")
        );
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert!(WordlistEntry::parse("").is_none());
        assert!(WordlistEntry::parse("\r").is_none());
        assert!(WordlistEntry::parse(",latn,dflt").is_none());
    }

    #[test]
    fn test_shaping_params_enable_features() {
        let entry = WordlistEntry::parse("fi,latn,dflt,liga").unwrap();
        let params = entry.shaping_params(1000.0, vec![("wght".into(), 700.0)]);
        assert_eq!(params.size, 1000.0);
        assert_eq!(params.features, vec![("liga".to_string(), 1)]);
        assert_eq!(params.script.as_deref(), Some("latn"));
        assert_eq!(params.language.as_deref(), Some("dflt"));
        assert!(params.direction.is_none());
    }

    #[test]
    fn test_wordlist_dir_distinguishes_missing_from_broken() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Latin.txt"), "one\n\ntwo,latn,dflt\n").unwrap();
        fs::write(dir.path().join("Greek.txt"), [0xffu8, 0xfe, b'\n']).unwrap();
        let lists = WordlistDir::new(dir.path());

        let latin = lists.load("Latin").unwrap();
        assert_eq!(latin.len(), 2);

        assert!(matches!(
            lists.load("Cyrillic"),
            Err(WordlistError::NotFound { .. })
        ));
        assert!(matches!(lists.load("Greek"), Err(WordlistError::Parse { .. })));
    }

    #[test]
    fn test_memory_wordlists() {
        let lists = MemoryWordlists::new().with_lines("Latin", ["a", "b,latn"]);
        assert_eq!(lists.load("Latin").unwrap().len(), 2);
        assert!(lists.load("Arabic").is_err());
    }
}
