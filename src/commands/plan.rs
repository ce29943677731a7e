//! `plan` and `validate`: manifest checks that never call the API

use anyhow::Result;
use lifecycle::{DiffSummary, diff_boards, plan_create, plan_update};

use super::{manifest_path, print_plan};
use crate::Context;
use crate::cli::ManifestArgs;
use crate::schema::Manifest;
use crate::state::TrellisState;
use crate::ui;

/// Print the calls `create` would issue, or `update` if the workspace is tracked
pub fn run(_ctx: &Context, args: ManifestArgs) -> Result<()> {
    let manifest = Manifest::load_valid(&args.manifest)?;
    let desired = manifest.to_desired();
    let state = TrellisState::load()?;

    match state.find(&desired.workspace.name, &manifest_path(&args.manifest)) {
        None => {
            let calls = plan_create(&desired);
            ui::header(&format!("Plan: create workspace '{}'", desired.workspace.name));
            print_plan(&calls);
            println!();
            ui::info(&format!("{} would be issued", ui::count(calls.len(), "call")));
        }
        Some(entry) => {
            let record = &entry.record;
            let calls = plan_update(record, &desired)?;
            let summary = DiffSummary::from_diffs(&diff_boards(&desired, record));

            ui::header(&format!("Plan: update workspace '{}'", record.workspace_name));
            print_plan(&calls);
            println!();
            ui::kv("Renamed", &summary.renames.to_string());
            ui::kv("Unchanged", &summary.unchanged.to_string());
            if summary.not_provisioned > 0 {
                ui::warn(&format!(
                    "{} in the manifest will not be created by update",
                    ui::count(summary.not_provisioned, "board")
                ));
            }
        }
    }
    Ok(())
}

/// Validate a manifest and summarize it
pub fn validate(_ctx: &Context, args: ManifestArgs) -> Result<()> {
    let manifest = Manifest::load_valid(&args.manifest)?;
    let lists: usize = manifest.boards.iter().map(|b| b.cards.len()).sum();

    ui::success(&format!(
        "{} is valid: workspace '{}', {}, {}, {}",
        args.manifest.display(),
        manifest.workspace.name,
        ui::count(manifest.boards.len(), "board"),
        ui::count(lists, "list"),
        ui::count(
            manifest.member_emails.len() + manifest.workspace_members.len(),
            "invitation"
        )
    ));
    Ok(())
}
