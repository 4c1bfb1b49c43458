//! Temporary source files.
use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::constants::*;

/// Source text materialised in a temporary file for the compiler to read.
///
/// The file is deleted by [`TempSource::release`]. Dropping the handle
/// attempts the same cleanup as a fallback, but errors at that point can
/// only be logged, so callers should release explicitly.
#[derive(Debug)]
pub struct TempSource {
    path: PathBuf,
}

impl TempSource {
    /// Writes `content` to a new file in the system temp directory.
    pub fn acquire(content: impl AsRef<[u8]>) -> io::Result<Self> {
        Self::acquire_in(std::env::temp_dir(), content)
    }

    /// Writes `content` to a new file in the given directory.
    pub fn acquire_in(dir: impl AsRef<Path>, content: impl AsRef<[u8]>) -> io::Result<Self> {
        let dir = dir.as_ref();

        for _ in 0..TEMP_NAME_ATTEMPTS {
            let path = dir.join(format!("{}.{SOURCE_EXTENSION}", rand::random::<u64>()));

            // Create-new fails when the name is taken, so a live file is never reused.
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(err),
            };

            if let Err(err) = file.write_all(content.as_ref()).and_then(|_| file.flush()) {
                drop(file);
                let _ = fs::remove_file(&path);
                return Err(err);
            }

            debug!("temporary source {}", path.display());
            return Ok(Self { path });
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "could not find an unused temporary file name",
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the backing file. Does nothing if it is already gone.
    pub fn release(&mut self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("removed temporary source {}", self.path.display());
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

impl AsRef<Path> for TempSource {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempSource {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!(
                "failed to remove temporary source {}: {err}",
                self.path.display()
            );
        }
    }
}
