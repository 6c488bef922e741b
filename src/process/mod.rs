//! Process management for hsd.
//!
//! This module launches the hsd binary with command-line flags derived from
//! [`Settings`](crate::config::Settings) and points both of its output
//! streams at one log file. The launched process belongs to the caller.
//!
//! # Architecture
//!
//! ```text
//! libhyperspace                      hsd
//! ┌─────────────┐  --key=value...   ┌─────────────┐
//! │ HsdProcess  │──────────────────▶│             │
//! └─────────────┘                   │             │──stdout──┐
//!                                   │             │──stderr──┤
//!                                   └─────────────┘          ▼
//!                                              <dir>/hsd-output.log
//! ```

mod io;
mod spawn;

pub use io::{output_log_path, OutputLog};
pub use spawn::{build_args, HsdProcess};

use std::ffi::OsStr;

use crate::config::Settings;
use crate::Result;

/// File name of the log receiving hsd output.
pub const OUTPUT_LOG_FILE: &str = "hsd-output.log";

/// Setting naming the directory hsd keeps its data (and the log) in.
pub const DIRECTORY_SETTING: &str = "hyperspace-directory";

/// Launch hsd at `path` with the default flags only.
///
/// The output log lands in the current directory.
pub fn launch(path: impl AsRef<OsStr>) -> Result<HsdProcess> {
    HsdProcess::launch(path, Settings::new())
}

/// Launch hsd at `path` with `settings` merged over the defaults.
pub fn launch_with(path: impl AsRef<OsStr>, settings: Settings) -> Result<HsdProcess> {
    HsdProcess::launch(path, settings)
}
