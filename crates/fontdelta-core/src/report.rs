//! Diagnostics that are worth telling the caller about
//!
//! A comparison run has a handful of non-fatal outcomes the caller may want
//! to surface: a script too sparse to test, a script without a word list,
//! characters no corpus word covered. Components receive a [`Reporter`]
//! instead of writing to a global logger, so tests can inspect exactly what
//! was reported.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use parking_lot::Mutex;

/// Something noteworthy that did not stop the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Allowed corpus characters that no kept word used
    UnseenCharacters { unseen: BTreeSet<char>, total: usize },
    /// Script skipped because the font covers too few of its codepoints
    SparseScript {
        script: String,
        codepoints: usize,
        minimum: usize,
    },
    /// Script skipped because no word list exists for it
    MissingWordlist { script: String, path: PathBuf },
    /// A word list is about to be tested
    TestingWords { script: String, count: usize },
}

impl Diagnostic {
    /// Whether the run lost coverage because of this
    pub fn is_warning(&self) -> bool {
        matches!(self, Diagnostic::MissingWordlist { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnseenCharacters { unseen, total } => {
                let chars: String = unseen.iter().collect();
                write!(
                    f,
                    "Following {}/{} characters not seen in any words: {:?}",
                    unseen.len(),
                    total,
                    chars
                )
            },
            Diagnostic::SparseScript {
                script,
                codepoints,
                minimum,
            } => write!(
                f,
                "Skipping {script}: {codepoints} codepoints, need at least {minimum}"
            ),
            Diagnostic::MissingWordlist { script, path } => {
                write!(f, "No wordlist for {script} ({})", path.display())
            },
            Diagnostic::TestingWords { script, count } => {
                write!(f, "Testing {count} words for {script}")
            },
        }
    }
}

/// Receives diagnostics from fontdelta components
pub trait Reporter: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, diagnostic: Diagnostic) {
        if diagnostic.is_warning() {
            log::warn!("{diagnostic}");
        } else {
            log::info!("{diagnostic}");
        }
    }
}

/// Keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far, in arrival order
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    /// Drains the collected diagnostics
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries.lock().push(diagnostic);
    }
}
