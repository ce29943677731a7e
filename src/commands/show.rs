use anyhow::{Context as _, Result};
use colored::Colorize;
use lifecycle::{BoardChange, DesiredState, DiffSummary, diff_boards};

use crate::Context;
use crate::cli::ShowArgs;
use crate::paths;
use crate::schema::Manifest;
use crate::state::{TrellisState, WorkspaceState};
use crate::ui;

pub fn run(_ctx: &Context, args: ShowArgs) -> Result<()> {
    let state = TrellisState::load()?;
    let desired = args
        .manifest
        .as_deref()
        .map(Manifest::load_valid)
        .transpose()?
        .map(|m| m.to_desired());

    let selected: Vec<&WorkspaceState> = match &args.workspace {
        Some(name) => vec![
            state
                .get(name)
                .with_context(|| format!("Workspace '{name}' is not tracked"))?,
        ],
        None => state.workspaces.values().collect(),
    };

    if selected.is_empty() {
        ui::info("No workspaces provisioned yet");
        ui::dim(&format!("State file: {}", paths::state_file()?.display()));
        return Ok(());
    }

    for workspace in selected {
        show_workspace(workspace, desired.as_ref());
    }
    println!();
    Ok(())
}

fn show_workspace(workspace: &WorkspaceState, desired: Option<&DesiredState>) {
    let record = &workspace.record;

    ui::section(&record.workspace_name);
    ui::kv("Id", &record.workspace_id);
    ui::kv(
        "Status",
        &if workspace.partial {
            "partial (create aborted)".yellow().to_string()
        } else {
            "complete".green().to_string()
        },
    );
    ui::kv(
        "Created",
        &workspace.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    );
    ui::kv(
        "Updated",
        &workspace.updated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    );
    if let Some(manifest) = &workspace.manifest {
        ui::kv("Manifest", &manifest.display().to_string());
    }

    for board in &record.boards {
        let id = board
            .id
            .as_deref()
            .map_or_else(|| "not created".yellow(), |id| id.dimmed());
        if board.key == board.name {
            println!("    {} {}", board.name, id);
        } else {
            println!("    {} [{}] {}", board.name, board.key.dimmed(), id);
        }
    }

    let Some(desired) = desired else {
        return;
    };
    if desired.workspace.name != record.workspace_name {
        return;
    }

    let diffs = diff_boards(desired, record);
    let summary = DiffSummary::from_diffs(&diffs);
    if !summary.has_changes() {
        ui::dim("In sync with manifest");
        return;
    }
    for diff in &diffs {
        match &diff.change {
            BoardChange::Unchanged => {}
            BoardChange::Rename { from, to } => {
                println!("    {} {} → {}", "~".yellow(), from, to);
            }
            BoardChange::NotProvisioned => {
                println!("    {} {} (no remote board)", "+".green(), diff.key);
            }
            BoardChange::Orphaned => {
                println!("    {} {} (not in manifest)", "-".red(), diff.key);
            }
        }
    }
}
