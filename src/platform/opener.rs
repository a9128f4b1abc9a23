//! Handing URLs to the operating system's default handler.

use std::io;
use std::process::Stdio;

use tokio::process::Command;

/// Opens a URL with whatever external application is registered for it.
pub trait UrlOpener: Send + Sync {
    /// Spawn the platform opener for `url`.
    ///
    /// Success means the handoff was accepted, not that the eventual
    /// download completed.
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Opener using the platform's launcher command.
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, url: &str) -> io::Result<()> {
        let mut command = launcher_command(url);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }
}

#[cfg(target_os = "macos")]
fn launcher_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn launcher_command(url: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn launcher_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}
