use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use lifecycle::plan_delete;

use super::{backend, manifest_path, print_advice, print_plan};
use crate::Context;
use crate::cli::DeleteArgs;
use crate::paths;
use crate::progress::CallProgress;
use crate::schema::Manifest;
use crate::state::{TrellisState, WorkspaceState};
use crate::ui;

/// Resolve the tracked workspace named on the command line or by a manifest
///
/// A manifest whose workspace name was edited after create still finds its
/// record through the manifest path, the same way `update` does.
fn tracked<'a>(state: &'a TrellisState, args: &DeleteArgs) -> Result<&'a WorkspaceState> {
    let (name, entry) = match (&args.workspace, &args.manifest) {
        (Some(name), _) => (name.clone(), state.get(name)),
        (None, Some(path)) => {
            let name = Manifest::load_valid(path)?.workspace.name;
            let entry = state.find(&name, &manifest_path(path));
            (name, entry)
        }
        (None, None) => anyhow::bail!("Name a workspace or pass --manifest"),
    };

    match entry {
        Some(entry) => Ok(entry),
        None => anyhow::bail!(
            "Workspace '{}' is not tracked in {}",
            name,
            paths::state_file()?.display()
        ),
    }
}

pub fn run(ctx: &Context, args: DeleteArgs) -> Result<()> {
    let mut state = TrellisState::load()?;
    let record = tracked(&state, &args)?.record.clone();
    let name = record.workspace_name.clone();
    let calls = plan_delete(&record);

    if args.dry_run {
        ui::header(&format!("Plan: delete workspace '{name}'"));
        print_plan(&calls);
        return Ok(());
    }

    if !args.yes {
        ui::warn(&format!(
            "This deletes workspace '{}' and {} on Trello",
            name,
            ui::count(record.provisioned().count(), "board")
        ));
        let confirmed = Confirm::new()
            .with_prompt("Continue?")
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            ui::info("Nothing deleted");
            return Ok(());
        }
    }

    let api = backend(ctx)?;
    let mut progress = CallProgress::new(calls.len(), ctx.quiet);
    let outcome = lifecycle::delete(&api, &record, &mut progress);
    progress.finish();

    if let Err(e) = outcome {
        print_advice(&e);
        ui::dim("The local record was kept");
        return Err(anyhow::Error::new(e).context(format!("Delete of workspace '{name}' aborted")));
    }

    state.remove(&name);
    state.save()?;
    ui::success(&format!("Workspace '{name}' deleted"));
    Ok(())
}
