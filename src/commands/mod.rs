//! Command implementations for the trellis CLI

pub mod create;
pub mod delete;
pub mod plan;
pub mod show;
pub mod update;

use anyhow::Result;
use boardapi::backend::trello::TrelloBackend;
use colored::Colorize;
use lifecycle::{Call, Diagnostic, LifecycleError};
use std::fs;
use std::path::{Path, PathBuf};

use crate::Context;
use crate::config::Settings;
use crate::ui;

/// Build the HTTP backend from config.toml and the global flags
pub(crate) fn backend(ctx: &Context) -> Result<TrelloBackend> {
    let settings = Settings::load()?;
    let credentials = settings.credentials(ctx.key.as_deref(), ctx.token.as_deref())?;
    log::debug!("Using API base {}", settings.api.base_url);
    Ok(TrelloBackend::with_api_base(credentials, settings.api.base_url))
}

/// Print planned calls, one per line
pub(crate) fn print_plan(calls: &[Call]) {
    for (i, call) in calls.iter().enumerate() {
        let marker = if call.is_fatal() {
            "•".cyan()
        } else {
            "·".dimmed()
        };
        println!("  {:>3} {} {}", (i + 1).to_string().dimmed(), marker, call);
    }
}

/// Summarize the best-effort failures of a run
pub(crate) fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    ui::warn(&format!(
        "{} did not succeed:",
        ui::count(diagnostics.len(), "call")
    ));
    for diagnostic in diagnostics {
        ui::dim(&diagnostic.to_string());
    }
}

/// Absolute manifest path, so state entries match however the path was typed
pub(crate) fn manifest_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Print advice for the API failure behind a fatal lifecycle error
pub(crate) fn print_advice(error: &LifecycleError) {
    if let Some(api_error) = error.api_error() {
        let category = api_error.category();
        ui::dim(&format!("{}: {}", category, category.advice()));
    }
}
