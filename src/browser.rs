//! Opening the gallery in the user's default browser

use std::process::{Command, ExitStatus};

use crate::error::{GalleryError, Result};

/// Open `url` with the platform's default handler
pub fn open_url(url: &str) -> Result<()> {
    let status = open_native(url)?;
    if status.success() {
        Ok(())
    } else {
        Err(GalleryError::Server {
            message: format!("Browser launcher exited with {}", status),
        })
    }
}

#[cfg(target_os = "macos")]
fn open_native(url: &str) -> Result<ExitStatus> {
    Ok(Command::new("open").arg(url).status()?)
}

#[cfg(target_os = "windows")]
fn open_native(url: &str) -> Result<ExitStatus> {
    Ok(Command::new("cmd")
        .arg("/C")
        .arg("start")
        .arg("")
        .arg(url)
        .status()?)
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn open_native(url: &str) -> Result<ExitStatus> {
    Ok(Command::new("xdg-open").arg(url).status()?)
}
