// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Logging setup for the shell library.
//
// On Android the process's stdout is discarded, so `tracing` events go to
// logcat: no subscriber is installed, `tracing`'s `log` feature turns events
// into `log` records and `android_logger` writes them under the `qtshell`
// tag. Elsewhere a `tracing-subscriber` fmt layer writes to stdout.

use log::LevelFilter;

/// Logcat tag for every record written by the shell.
pub const LOG_TAG: &str = "qtshell";

/// Install the process-wide logger.
///
/// `RUST_LOG` overrides `default_filter`; an unparsable filter falls back to
/// `info`. Activities are created more than once per process, so a second
/// call leaves the existing logger in place and returns `false`.
pub fn init(default_filter: &str) -> bool {
    let installed = install(default_filter);
    if installed {
        tracing::info!(filter = default_filter, "qtshell logging initialised");
    } else {
        tracing::debug!("logger already installed");
    }
    installed
}

#[cfg(target_os = "android")]
fn install(default_filter: &str) -> bool {
    use std::sync::atomic::{AtomicBool, Ordering};

    static INSTALLED: AtomicBool = AtomicBool::new(false);
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return false;
    }

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_owned());
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(max_level(&filter))
            .with_tag(LOG_TAG),
    );
    true
}

#[cfg(not(target_os = "android"))]
fn install(default_filter: &str) -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .try_init()
        .is_ok()
}

/// Most verbose level named by an `EnvFilter`-style directive list.
///
/// logcat filtering is by level only, so `qtshell=debug,jni=warn` maps to
/// `Debug`. Directives without a recognisable level are skipped; if none
/// remain the level is `Info`.
pub fn max_level(filter: &str) -> LevelFilter {
    filter
        .split(',')
        .filter_map(|directive| {
            let level = directive.rsplit('=').next()?.trim();
            level.parse::<LevelFilter>().ok()
        })
        .max()
        .unwrap_or(LevelFilter::Info)
}
