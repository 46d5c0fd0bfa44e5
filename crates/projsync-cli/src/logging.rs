// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Sends all tracing output to `path`; the terminal belongs to the UI.
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str, path: &Path) -> Result<()> {
    let directives = env::var(EnvFilter::DEFAULT_ENV).ok();
    install(build_filter(directives.as_deref(), level)?, path)
}

/// Non-empty, parseable `env_directives` win; otherwise `level` is used.
fn build_filter(env_directives: Option<&str>, level: &str) -> Result<EnvFilter> {
    if let Some(directives) = env_directives.map(str::trim).filter(|d| !d.is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return Ok(filter);
        }
    }
    EnvFilter::try_new(level).with_context(|| format!("invalid log filter {level:?}"))
}

fn install(filter: EnvFilter, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .context("install log subscriber")?;
    Ok(())
}
