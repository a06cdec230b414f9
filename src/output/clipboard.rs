// src/output/clipboard.rs
//! Platform-specific clipboard access.
//!
//! The clipboard is the primary content source, so the read direction is
//! the one that matters here. arboard covers every desktop platform;
//! command-line paste tools are the fallback for sessions where it
//! cannot connect to the display server.

use crate::error::AppError;
use std::process::Command;

/// Reads the current text content of the system clipboard.
pub fn read_clipboard() -> Result<String, AppError> {
    // Try arboard first (cross-platform)
    match try_arboard_read() {
        Ok(text) => {
            log::debug!("Read {} characters from clipboard via arboard", text.len());
            return Ok(text);
        }
        Err(e) => {
            log::debug!("Arboard failed: {}, trying platform-specific methods", e);
        }
    }

    let result = read_with_platform_command();
    match &result {
        Ok(text) => log::debug!(
            "Read {} characters from clipboard via platform command",
            text.len()
        ),
        Err(e) => log::error!("Failed to read clipboard: {}", e),
    }
    result
}

/// Tries to read using the arboard crate.
fn try_arboard_read() -> Result<String, AppError> {
    use arboard::Clipboard;

    let mut clipboard = Clipboard::new()
        .map_err(|e| AppError::Clipboard(format!("Failed to access clipboard: {}", e)))?;

    clipboard
        .get_text()
        .map_err(|e| AppError::Clipboard(format!("Failed to read clipboard text: {}", e)))
}

/// Platform-specific clipboard command execution.
#[cfg(target_os = "linux")]
fn read_with_platform_command() -> Result<String, AppError> {
    // Detect Wayland vs X11
    let is_wayland = std::env::var("WAYLAND_DISPLAY").is_ok()
        || std::env::var("XDG_SESSION_TYPE").is_ok_and(|s| s == "wayland");

    if is_wayland {
        run_paste_command("wl-paste", &["--no-newline"])
    } else {
        run_paste_command("xclip", &["-selection", "clipboard", "-o"])
    }
}

#[cfg(target_os = "macos")]
fn read_with_platform_command() -> Result<String, AppError> {
    run_paste_command("pbpaste", &[])
}

#[cfg(target_os = "windows")]
fn read_with_platform_command() -> Result<String, AppError> {
    run_paste_command("powershell", &["-NoProfile", "-Command", "Get-Clipboard"])
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn read_with_platform_command() -> Result<String, AppError> {
    Err(AppError::Clipboard(
        "Clipboard not supported on this platform".to_string(),
    ))
}

#[allow(dead_code)] // Unreferenced on platforms without a paste command
fn run_paste_command(program: &str, args: &[&str]) -> Result<String, AppError> {
    log::debug!("Attempting to read clipboard with {}", program);

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| AppError::Clipboard(format!("Failed to spawn {}: {}", program, e)))?;

    if output.status.success() {
        String::from_utf8(output.stdout)
            .map_err(|e| AppError::Clipboard(format!("{} output was not UTF-8: {}", program, e)))
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(AppError::Clipboard(format!("{} failed: {}", program, stderr)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires clipboard access
    fn test_clipboard_read() {
        let result = read_clipboard();
        assert!(result.is_ok());
    }
}
