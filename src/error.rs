use std::path::PathBuf;
use thiserror::Error;

/// Generator error taxonomy.
///
/// `SourceRead` and `HeaderParse` are recoverable: the scanner records them
/// as warnings and drops the file. The rest are fatal and propagate via
/// `Result` before any artifact is written.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("failed to read source file {}: {}", .path.display(), .reason)]
    SourceRead { path: PathBuf, reason: String },

    #[error("malformed header region in {}: {}", .path.display(), .reason)]
    HeaderParse { path: PathBuf, reason: String },

    #[error("unsupported property kind in {} at `{}`: {}", .path.display(), .field_path, .reason)]
    UnsupportedPropertyKind {
        path: PathBuf,
        field_path: String,
        reason: String,
    },

    #[error(
        "duplicate discriminator `{}` declared in {} and {}",
        .discriminator,
        .first.display(),
        .second.display()
    )]
    DuplicateDiscriminator {
        discriminator: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("target `{}` cannot represent construct: {}", .target, .reason)]
    Emission { target: String, reason: String },
}

impl GenError {
    /// Recoverable errors become per-file skips; fatal ones abort the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GenError::SourceRead { .. } | GenError::HeaderParse { .. }
        )
    }
}

pub type Result<T, E = GenError> = std::result::Result<T, E>;
