//! Result and errors.
use std::{
    fmt::{self, Display, Formatter},
    io,
    path::PathBuf,
    time::Duration,
};

pub type McsResult<T> = std::result::Result<T, McsError>;

/// Failures that abort a compile attempt.
///
/// Diagnostics reported by the compiler itself are not errors,
/// they are returned as data in [`crate::CompileResult`].
#[derive(Debug)]
pub enum McsError {
    /// Compiler executable does not exist. Raised before anything is spawned.
    MissingExecutable(PathBuf),
    /// The operating system refused to start the compiler process.
    Launch(io::Error),
    /// Temporary source file could not be written or deleted.
    TempFile(io::Error),
    /// Compiler ran past its deadline and was killed.
    Timeout(Duration),
    /// Reading the compiler output, or waiting on the process, failed.
    Io(io::Error),
}

impl Display for McsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingExecutable(path) => {
                write!(f, "compiler executable not found: {}", path.display())
            }
            Self::Launch(err) => write!(f, "failed to launch compiler: {err}"),
            Self::TempFile(err) => write!(f, "temporary source file: {err}"),
            Self::Timeout(limit) => {
                write!(f, "compiler timed out after {}ms", limit.as_millis())
            }
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for McsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Launch(err) | Self::TempFile(err) | Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for McsError {
    fn from(err: io::Error) -> Self {
        McsError::Io(err)
    }
}
