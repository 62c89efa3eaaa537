//! Found-it side effects: browser open and terminal bell.
//!
//! Everything here is fire-and-forget. A notification that fails to deliver
//! must never disturb the run, so every error path is swallowed.

use handlescout_core::{Candidate, NotificationConfig};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// Announce the winning identifier.
///
/// Invoked exactly once, by the worker that claimed the completion signal.
pub fn announce(candidate: &Candidate, config: &NotificationConfig) {
    if !config.enabled {
        return;
    }
    println!("\n>>> {candidate} is AVAILABLE <<<");
    if config.open_browser {
        open_browser(&config.open_url);
    }
    if config.terminal_bell {
        ring_bell();
    }
}

/// Launch a browser at `url` via the first platform launcher that spawns.
fn open_browser(url: &str) {
    for launcher in launchers() {
        let (program, args) = (launcher[0], &launcher[1..]);
        let spawned = Command::new(program)
            .args(args)
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if spawned.is_ok() {
            return;
        }
    }
    debug!("no browser launcher available");
}

#[cfg(target_os = "macos")]
fn launchers() -> &'static [&'static [&'static str]] {
    &[&["open"]]
}

#[cfg(target_os = "windows")]
fn launchers() -> &'static [&'static [&'static str]] {
    &[&["cmd", "/C", "start", ""]]
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn launchers() -> &'static [&'static [&'static str]] {
    &[
        &["xdg-open"],
        &["google-chrome"],
        &["chromium"],
        &["firefox"],
    ]
}

fn ring_bell() {
    let mut stdout = std::io::stdout();
    let _ = stdout.write_all(b"\x07\x07\x07");
    let _ = stdout.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_is_silent() {
        let config = NotificationConfig {
            enabled: false,
            ..NotificationConfig::default()
        };
        // Must be a no-op: no panic, no side effects.
        announce(
            &Candidate::new("alice").expect("valid candidate"),
            &config,
        );
    }

    #[test]
    fn test_launchers_nonempty() {
        assert!(!launchers().is_empty());
        assert!(launchers().iter().all(|l| !l.is_empty()));
    }
}
