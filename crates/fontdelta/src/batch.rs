//! Comparing many already-matched font pairs at once

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use fontdelta_core::{error::Result, FontHandle};

use crate::{Differ, FontDiff};

/// A style whose before and after fonts have already been paired up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    /// Display name, e.g. `Bold Italic`
    pub style: String,
    pub before: PathBuf,
    pub after: PathBuf,
    /// Variable font instance both sides are compared at; empty for statics
    #[serde(default)]
    pub coordinates: BTreeMap<String, f32>,
}

/// Outcome for one pair; a failure here leaves the other pairs untouched
#[derive(Debug)]
pub struct PairResult {
    pub style: String,
    pub result: Result<FontDiff>,
}

impl Differ {
    /// Compares every pair in parallel
    ///
    /// `load` opens a font file as a handle pinned to the pair's coordinates.
    /// Results come back ordered by style.
    pub fn diff_pairs<L>(&self, pairs: &[MatchedPair], load: L) -> Vec<PairResult>
    where
        L: Fn(&Path, &BTreeMap<String, f32>) -> Result<FontHandle> + Sync,
    {
        let mut results: Vec<PairResult> = pairs
            .par_iter()
            .map(|pair| {
                log::info!("Comparing {}", pair.style);
                let result = load(&pair.before, &pair.coordinates).and_then(|before| {
                    let after = load(&pair.after, &pair.coordinates)?;
                    self.diff_fonts(&before, &after)
                });
                if let Err(ref e) = result {
                    log::warn!("{}: {}", pair.style, e);
                }
                PairResult {
                    style: pair.style.clone(),
                    result,
                }
            })
            .collect();

        results.sort_by(|a, b| a.style.cmp(&b.style));
        results
    }
}
