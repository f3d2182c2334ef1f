use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output path {path:?} is unusable: {reason}")]
    OutputDir { path: PathBuf, reason: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Replaces files under the output directory in one step, so a checkpoint
/// on disk is either the previous table or the new one.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the output directory on first use. A plain file in its place
    /// is an error.
    pub fn prepare_dir(&self) -> Result<(), PersistError> {
        let unusable = |reason: String| PersistError::OutputDir {
            path: self.dir.clone(),
            reason,
        };
        match fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(unusable("not a directory".into())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&self.dir).map_err(|e| unusable(e.to_string()))
            }
            Err(err) => Err(unusable(err.to_string())),
        }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        self.prepare_dir()?;

        let target = self.dir.join(filename);
        let mut staged = NamedTempFile::new_in(&self.dir)?;
        staged.write_all(content)?;
        staged.as_file_mut().sync_all()?;

        // Windows refuses to rename over an existing file.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        staged.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
