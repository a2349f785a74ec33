//! Error types for fontdelta

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiffError>;

/// Main error type for fontdelta
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Shaping failed: {0}")]
    ShapingFailed(#[from] ShapingError),

    #[error("Rendering failed: {0}")]
    RenderingFailed(#[from] RenderError),

    #[error("Word list error: {0}")]
    Wordlist(#[from] WordlistError),

    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiffError {
    /// True when the shaping or rendering backend gave up
    ///
    /// These failures are fatal for the font pair being compared but should
    /// not take down the rest of a batch.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            DiffError::ShapingFailed(_) | DiffError::RenderingFailed(_)
        )
    }
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data")]
    InvalidData,

    #[error("Invalid variation coordinates: {0}")]
    InvalidCoordinates(String),
}

/// Shaping errors
#[derive(Debug, Error)]
pub enum ShapingError {
    #[error("Font data could not be parsed for shaping")]
    InvalidFont,
}

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Font data could not be parsed for rendering")]
    InvalidFont,

    #[error("Glyph {0} not found")]
    GlyphNotFound(u32),

    #[error("Outline extraction failed for glyph {0}")]
    OutlineExtractionFailed(u32),

    #[error("Path building failed")]
    PathBuildingFailed,

    #[error("Pixmap creation failed for {width}x{height}")]
    PixmapCreationFailed { width: u32, height: u32 },

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Word list loading errors
///
/// A script without a word list is routine and callers skip it; a word list
/// that exists but cannot be read is not.
#[derive(Debug, Error)]
pub enum WordlistError {
    #[error("No word list for script {script} at {}", .path.display())]
    NotFound { script: String, path: PathBuf },

    #[error("Word list {} could not be parsed: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Corpus building errors
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Text source {} could not be read: {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Substring matcher could not be built: {0}")]
    Matcher(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_failure_kinds() {
        let shaping: DiffError = ShapingError::InvalidFont.into();
        let rendering: DiffError = RenderError::GlyphNotFound(3).into();
        let wordlist: DiffError = WordlistError::NotFound {
            script: "Latin".into(),
            path: PathBuf::from("Latin.txt"),
        }
        .into();

        assert!(shaping.is_backend_failure());
        assert!(rendering.is_backend_failure());
        assert!(!wordlist.is_backend_failure());
    }

    #[test]
    fn test_error_messages_name_the_path() {
        let err = WordlistError::NotFound {
            script: "Greek".into(),
            path: PathBuf::from("lists/Greek.txt"),
        };
        assert_eq!(
            err.to_string(),
            "No word list for script Greek at lists/Greek.txt"
        );
    }
}
