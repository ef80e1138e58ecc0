// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! File-backed tracing setup. The terminal belongs to the TUI, so log lines
//! go to a file instead of stderr.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Builds the filter from `RUST_LOG` when set, otherwise from the configured
/// directive.
pub fn env_filter(configured: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(configured)
        .with_context(|| format!("invalid log level {configured:?}; use a filter such as \"info\""))
}

pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

/// Installs the global subscriber. A second call is a no-op.
pub fn init_logging(path: &Path, level: &str) -> Result<()> {
    let filter = env_filter(level)?;
    let file = open_log_file(path)?;

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false),
    );
    let _ = subscriber.try_init();
    Ok(())
}
