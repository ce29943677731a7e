use anyhow::Result;
use lifecycle::{DiffSummary, diff_boards, plan_update};

use super::{backend, manifest_path, print_advice, print_plan};
use crate::Context;
use crate::cli::UpdateArgs;
use crate::progress::CallProgress;
use crate::schema::Manifest;
use crate::state::TrellisState;
use crate::ui;

pub fn run(ctx: &Context, args: UpdateArgs) -> Result<()> {
    let manifest = Manifest::load_valid(&args.manifest)?;
    let manifest_file = manifest_path(&args.manifest);
    let desired = manifest.to_desired();

    let mut state = TrellisState::load()?;
    let Some(entry) = state.find(&desired.workspace.name, &manifest_file) else {
        anyhow::bail!(
            "Workspace '{}' is not provisioned; run `trellis create` first",
            desired.workspace.name
        );
    };
    let mut record = entry.record.clone();
    let partial = entry.partial;
    let name = record.workspace_name.clone();

    // rejects a provisioned board missing from the manifest before any call
    let calls = plan_update(&record, &desired)?;

    if args.dry_run {
        let summary = DiffSummary::from_diffs(&diff_boards(&desired, &record));
        ui::header(&format!("Plan: update workspace '{name}'"));
        print_plan(&calls);
        println!();
        ui::info(&format!(
            "Dry run: {} would be issued ({} with a new name)",
            ui::count(calls.len(), "call"),
            ui::count(summary.renames, "board")
        ));
        return Ok(());
    }

    let api = backend(ctx)?;
    if !ctx.quiet {
        ui::header(&format!("Updating workspace '{name}'"));
    }
    let mut progress = CallProgress::new(calls.len(), ctx.quiet);
    let outcome = lifecycle::update(&api, &mut record, &desired, &mut progress);
    progress.finish();

    // renames that went through are recorded even when a later one failed
    state.upsert(record, partial, Some(manifest_file));
    state.save()?;

    let report = match outcome {
        Ok(report) => report,
        Err(e) => {
            print_advice(&e);
            let context = format!("Update of workspace '{name}' aborted");
            return Err(anyhow::Error::new(e).context(context));
        }
    };

    if let Some(new_name) = &report.ignored_workspace_rename {
        ui::warn(&format!(
            "Workspaces cannot be renamed; '{name}' was kept (manifest says '{new_name}')"
        ));
    }
    if !report.not_provisioned.is_empty() {
        ui::warn(&format!(
            "Not created by update: {}",
            report.not_provisioned.join(", ")
        ));
        ui::dim("Update only renames boards that already exist");
    }
    ui::success(&format!(
        "Workspace '{}' updated: {} renamed",
        name,
        ui::count(report.renamed.len(), "board")
    ));
    Ok(())
}
