use anyhow::Result;
use colored::Colorize;
use lifecycle::{CreateOptions, ReconciledWorkspace, plan_create};

use super::{backend, manifest_path, print_advice, print_diagnostics, print_plan};
use crate::Context;
use crate::cli::CreateArgs;
use crate::progress::CallProgress;
use crate::schema::Manifest;
use crate::state::TrellisState;
use crate::ui;

pub fn run(ctx: &Context, args: CreateArgs) -> Result<()> {
    let manifest = Manifest::load_valid(&args.manifest)?;
    let manifest_file = manifest_path(&args.manifest);
    let desired = manifest.to_desired();
    let name = desired.workspace.name.clone();
    let plan = plan_create(&desired);

    if args.dry_run {
        ui::header(&format!("Plan: create workspace '{name}'"));
        print_plan(&plan);
        println!();
        ui::info(&format!(
            "Dry run: {} would be issued",
            ui::count(plan.len(), "call")
        ));
        return Ok(());
    }

    let mut state = TrellisState::load()?;
    if let Some(existing) = state.get(&name) {
        if !args.force {
            anyhow::bail!(
                "Workspace '{}' is already provisioned ({}). \
                 Use `trellis update`, or --force to create another",
                name,
                existing.record.workspace_id
            );
        }
        ui::warn(&format!(
            "Replacing the local record of '{}'; its remote objects are left in place",
            name
        ));
    }

    let api = backend(ctx)?;
    let opts = CreateOptions {
        jobs: args.jobs.max(1),
    };

    if !ctx.quiet {
        ui::header(&format!("Creating workspace '{name}'"));
    }
    let mut progress = CallProgress::new(plan.len(), ctx.quiet);
    let outcome = lifecycle::create(&api, &desired, &opts, &mut progress);
    progress.finish();

    match outcome {
        Ok(applied) => {
            if !ctx.quiet {
                print_record(&applied.state);
            }
            state.upsert(applied.state, false, Some(manifest_file));
            let path = state.save()?;
            log::info!("Recorded workspace '{}' in {}", name, path.display());

            print_diagnostics(&applied.diagnostics);
            ui::success(&format!("Workspace '{name}' created"));
            Ok(())
        }
        Err(failure) => {
            print_advice(&failure.error);
            print_diagnostics(&failure.diagnostics);

            if let Some(partial) = failure.partial {
                let created = partial.provisioned().count();
                state.upsert(partial, true, Some(manifest_file));
                let path = state.save()?;
                ui::warn(&format!(
                    "Partial workspace with {} recorded in {}",
                    ui::count(created, "board"),
                    path.display()
                ));
                ui::dim(&format!("Run `trellis delete \"{name}\"` to remove it"));
            }

            Err(anyhow::Error::new(failure.error)
                .context(format!("Create of workspace '{name}' aborted")))
        }
    }
}

fn print_record(record: &ReconciledWorkspace) {
    ui::section("Provisioned");
    ui::kv("Workspace", &format!("{} ({})", record.workspace_name, record.workspace_id));
    for board in &record.boards {
        match &board.id {
            Some(id) => ui::kv("Board", &format!("{} ({})", board.name, id.dimmed())),
            None => ui::kv("Board", &format!("{} {}", board.name, "not created".yellow())),
        }
    }
}
