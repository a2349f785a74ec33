//! CLI argument definitions using Clap v4

use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand, ValueEnum};
use fontdelta::HashMode;

/// fontdelta - find what a font edit changed in real text
#[derive(Parser, Debug)]
#[command(name = "fontdelta")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a minimal word list from text sources
    #[command(alias = "b")]
    Build(BuildArgs),

    /// Compare two versions of a font
    #[command(alias = "d")]
    Diff(Box<DiffArgs>),

    /// Compare many matched font pairs from a JSON file
    Batch(BatchArgs),
}

/// Arguments for the build command
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("charset").required(true).args(["glyphs", "font"])))]
pub struct BuildArgs {
    /// Text files to read words from
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Characters a word may be made of
    #[arg(short = 'g', long = "glyphs")]
    pub glyphs: Option<String>,

    /// Take the allowed characters from this font's character map
    #[arg(short = 'f', long = "font")]
    pub font: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output-file")]
    pub output_file: Option<PathBuf>,
}

/// Arguments for the diff command
#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// Font before the change
    #[arg(short = 'b', long = "before")]
    pub before: PathBuf,

    /// Font after the change
    #[arg(short = 'a', long = "after")]
    pub after: PathBuf,

    /// Variable font instance, e.g. wght=700,wdth=100
    #[arg(short = 'c', long = "coords")]
    pub coords: Option<String>,

    /// Extra word list to test in addition to the per-script ones
    #[arg(short = 'u', long = "user-wordlist")]
    pub user_wordlist: Option<PathBuf>,

    /// Exit with status 1 when anything changed
    #[arg(long = "check")]
    pub check: bool,

    #[command(flatten)]
    pub compare: CompareArgs,
}

/// Arguments for the batch command
#[derive(Parser, Debug)]
pub struct BatchArgs {
    /// JSON array of {"style", "before", "after", "coordinates"} objects
    #[arg(short = 'p', long = "pairs")]
    pub pairs: PathBuf,

    #[command(flatten)]
    pub compare: CompareArgs,
}

/// Settings shared by every comparing command
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Directory holding <Script>.txt word lists
    #[arg(short = 'w', long = "wordlists", env = "FONTDELTA_WORDLISTS")]
    pub wordlists: Option<PathBuf>,

    /// JSON file with comparison settings; flags below override it
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// What makes two shaped glyphs the same
    #[arg(long = "hash")]
    pub hash: Option<HashArg>,

    /// Pixels per em for comparison renders
    #[arg(short = 's', long = "render-size")]
    pub render_size: Option<f32>,

    /// Report words whose score reaches this
    #[arg(long = "word-threshold")]
    pub word_threshold: Option<f64>,

    /// Report glyphs whose score exceeds this
    #[arg(long = "glyph-threshold")]
    pub glyph_threshold: Option<f64>,

    /// Skip scripts the font covers with fewer codepoints
    #[arg(long = "min-codepoints")]
    pub min_codepoints: Option<usize>,

    /// Sightings of a changed glyph before words made of such glyphs are skipped
    #[arg(long = "dedup-after")]
    pub dedup_after: Option<u32>,

    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output-file")]
    pub output_file: Option<PathBuf>,
}

/// Glyph identity used for word signatures
#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum HashArg {
    /// Glyph id and advance
    GidPos,
    /// Glyph id only
    Gid,
}

impl From<HashArg> for HashMode {
    fn from(arg: HashArg) -> Self {
        match arg {
            HashArg::GidPos => HashMode::GidPosition,
            HashArg::Gid => HashMode::GlyphId,
        }
    }
}

impl Cli {
    /// Log level the flags ask for
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            return log::LevelFilter::Error;
        }
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
