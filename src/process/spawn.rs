//! Launching hsd and handing its process back to the caller.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};

use super::io::{output_log_path, OutputLog};
use crate::config::{SettingValue, Settings};
use crate::{Error, Result};

/// A launched hsd process.
///
/// The library does not supervise the daemon: it is not restarted, timed
/// out or killed on drop. Use [`HsdClient::is_running`](crate::HsdClient::is_running)
/// or [`HsdClient::connect`](crate::HsdClient::connect) to find out when its
/// API is ready.
#[derive(Debug)]
pub struct HsdProcess {
    child: Child,
    program: OsString,
    args: Vec<String>,
    log_path: PathBuf,
}

impl HsdProcess {
    /// Launch hsd at `path` with `settings` merged over the defaults.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`Error::OutputLog`] if the log file cannot be opened
    /// - [`Error::ProcessSpawn`] if the process cannot be started
    pub fn launch(path: impl AsRef<OsStr>, settings: Settings) -> Result<Self> {
        let merged = Settings::merged_with_defaults(settings);
        let args = build_args(&merged);
        let log = OutputLog::open(output_log_path(&merged))?;
        let log_path = log.path().to_path_buf();

        let mut cmd = build_command(path.as_ref(), &args);
        let (stdout, stderr) = log.into_stdio()?;
        cmd.stdout(stdout);
        cmd.stderr(stderr);

        tracing::debug!(
            program = ?path.as_ref(),
            ?args,
            log = %log_path.display(),
            "launching hsd"
        );

        let child = cmd.spawn().map_err(Error::ProcessSpawn)?;

        Ok(Self {
            child,
            program: path.as_ref().to_os_string(),
            args,
            log_path,
        })
    }

    /// Get the process ID, if the process has not been reaped yet.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// The program that was launched.
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// The flags hsd was started with.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The file receiving hsd's stdout and stderr.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Check for exit without blocking.
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        self.child.try_wait().map_err(Error::io)
    }

    /// Wait for the process to exit and return its exit status.
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        self.child.wait().await.map_err(Error::io)
    }

    /// Kill the process and wait for it to exit.
    pub async fn kill(&mut self) -> Result<()> {
        self.child.kill().await.map_err(Error::io)
    }

    /// Send a kill signal without waiting.
    pub fn start_kill(&mut self) -> Result<()> {
        self.child.start_kill().map_err(Error::io)
    }

    /// Take ownership of the underlying child process.
    pub fn into_child(self) -> Child {
        self.child
    }
}

/// Render merged settings as `--key=value` flags, skipping disabled keys.
pub fn build_args(settings: &Settings) -> Vec<String> {
    settings
        .iter()
        .filter_map(|(key, value)| match value {
            SettingValue::Value(v) => Some(format!("--{key}={v}")),
            SettingValue::Disabled => None,
        })
        .collect()
}

/// Build the command for `program` with `args`.
///
/// On Unix the child is started under the caller's effective user ID.
fn build_command(program: &OsStr, args: &[String]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdin(Stdio::null());

    #[cfg(unix)]
    cmd.uid(nix::unistd::geteuid().as_raw());

    cmd
}
