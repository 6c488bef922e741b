//! Output log wiring for the hsd subprocess.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::Stdio;

use super::{DIRECTORY_SETTING, OUTPUT_LOG_FILE};
use crate::config::{SettingValue, Settings};
use crate::{Error, Result};

/// Where hsd output goes for the given settings.
///
/// `<hyperspace-directory>/hsd-output.log` when the directory is set, else
/// `hsd-output.log` relative to the current working directory.
pub fn output_log_path(settings: &Settings) -> PathBuf {
    match settings.get(DIRECTORY_SETTING).and_then(SettingValue::as_str) {
        Some(dir) => Path::new(dir).join(OUTPUT_LOG_FILE),
        None => PathBuf::from(OUTPUT_LOG_FILE),
    }
}

/// Append-mode log file shared by hsd's stdout and stderr.
#[derive(Debug)]
pub struct OutputLog {
    path: PathBuf,
    file: File,
}

impl OutputLog {
    /// Open (creating if needed) the log file for appending.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| Error::OutputLog {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Split into stdout and stderr handles writing to the same file.
    ///
    /// Both handles share one open file description, so writes from the two
    /// streams interleave in the order they happen.
    pub(crate) fn into_stdio(self) -> Result<(Stdio, Stdio)> {
        let stderr = self.file.try_clone().map_err(Error::io)?;
        Ok((Stdio::from(self.file), Stdio::from(stderr)))
    }
}
