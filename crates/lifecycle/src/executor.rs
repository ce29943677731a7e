//! Execution engine - drives the remote calls for Create, Update and Delete

use crate::context::ProgressCallback;
use crate::diff::{BoardChange, diff_boards};
use crate::error::{CreateFailure, LifecycleError};
use crate::model::{DesiredState, ReconciledWorkspace};
use crate::planner::{plan_delete, plan_update};
use crate::types::{Applied, Call, CreateOptions, Diagnostic, UpdateReport};
use boardapi::BoardApi;
use rayon::prelude::*;

/// Create the whole tree described by `desired`
///
/// Workspace and board creation are fatal: the first failure stops the
/// operation and the returned [`CreateFailure`] carries whatever record
/// exists so far. List creation and invitations are best-effort and end up
/// as diagnostics. Nothing is rolled back.
pub fn create<P>(
    api: &dyn BoardApi,
    desired: &DesiredState,
    opts: &CreateOptions,
    progress: &mut P,
) -> Result<Applied<ReconciledWorkspace>, CreateFailure>
where
    P: ProgressCallback + ?Sized,
{
    let pool = invitation_pool(opts.jobs);
    let workspace_name = &desired.workspace.name;

    let call = Call::CreateWorkspace {
        name: workspace_name.clone(),
    };
    let workspace_id = track(progress, &call, || api.create_workspace(workspace_name))
        .map_err(|source| CreateFailure {
            error: LifecycleError::CreateWorkspace {
                name: workspace_name.clone(),
                source,
            },
            partial: None,
            diagnostics: Vec::new(),
        })?;
    log::info!("Created workspace '{}' ({})", workspace_name, workspace_id);

    let mut record = ReconciledWorkspace::new(workspace_id.clone(), desired);
    let mut diagnostics = Vec::new();

    for (index, board) in desired.boards.iter().enumerate() {
        let key = board.key();
        let call = Call::CreateBoard {
            key: key.to_string(),
            name: board.name.clone(),
        };
        let board_id = match track(progress, &call, || api.create_board(&workspace_id, &board.name))
        {
            Ok(id) => id,
            Err(source) => {
                log::error!("Unable to {}: {}", call, source);
                return Err(CreateFailure {
                    error: LifecycleError::CreateBoard {
                        key: key.to_string(),
                        name: board.name.clone(),
                        source,
                    },
                    partial: Some(record),
                    diagnostics,
                });
            }
        };
        log::info!("Created board '{}' ({})", board.name, board_id);
        record.boards[index].id = Some(board_id.clone());

        // Lists stay sequential so columns keep manifest order
        run_best_effort(
            &board.cards,
            None,
            progress,
            &mut diagnostics,
            |name| Call::CreateList {
                board_key: key.to_string(),
                name: name.clone(),
            },
            |name| api.create_list(&board_id, name),
        );

        run_best_effort(
            &desired.member_emails,
            pool.as_ref(),
            progress,
            &mut diagnostics,
            |email| Call::InviteBoardMember {
                board_key: key.to_string(),
                email: email.clone(),
            },
            |email| api.invite_board_member(&board_id, email),
        );
    }

    run_best_effort(
        &desired.workspace_members,
        pool.as_ref(),
        progress,
        &mut diagnostics,
        |member| Call::InviteWorkspaceMember {
            email: member.email.clone(),
            full_name: member.name.clone(),
            role: member.role.clone(),
        },
        |member| {
            api.invite_workspace_member(&workspace_id, &member.email, &member.name, &member.role)
        },
    );

    Ok(Applied {
        state: record,
        diagnostics,
    })
}

/// Rename every provisioned board to its desired name
///
/// Only board names are reconciled. The first failed rename aborts; names
/// already sent are written back into `record` either way.
pub fn update<P>(
    api: &dyn BoardApi,
    record: &mut ReconciledWorkspace,
    desired: &DesiredState,
    progress: &mut P,
) -> Result<UpdateReport, LifecycleError>
where
    P: ProgressCallback + ?Sized,
{
    let calls = plan_update(record, desired)?;

    let mut report = UpdateReport {
        skipped: record
            .boards
            .iter()
            .filter(|b| b.id.is_none())
            .map(|b| b.key.clone())
            .collect(),
        not_provisioned: diff_boards(desired, record)
            .into_iter()
            .filter(|d| d.change == BoardChange::NotProvisioned)
            .map(|d| d.key)
            .collect(),
        ..Default::default()
    };

    if desired.workspace.name != record.workspace_name {
        log::warn!(
            "Workspace '{}' cannot be renamed to '{}'; ignoring",
            record.workspace_name,
            desired.workspace.name
        );
        report.ignored_workspace_rename = Some(desired.workspace.name.clone());
    }
    for key in &report.not_provisioned {
        log::warn!("Board '{}' has no remote board; update does not create boards", key);
    }

    for call in calls {
        let Call::UpdateBoardName {
            key,
            board_id,
            name,
        } = &call
        else {
            continue;
        };

        track(progress, &call, || api.update_board_name(board_id, name)).map_err(|source| {
            LifecycleError::UpdateBoard {
                key: key.clone(),
                board_id: board_id.clone(),
                source,
            }
        })?;

        if let Some(slot) = record.record_mut(key) {
            slot.name = name.clone();
        }
        report.renamed.push(key.clone());
    }

    Ok(report)
}

/// Delete the workspace, then each provisioned board
///
/// Any failure aborts the remaining deletions.
pub fn delete<P>(
    api: &dyn BoardApi,
    record: &ReconciledWorkspace,
    progress: &mut P,
) -> Result<(), LifecycleError>
where
    P: ProgressCallback + ?Sized,
{
    for call in plan_delete(record) {
        match &call {
            Call::DeleteWorkspace { workspace_id } => {
                track(progress, &call, || api.delete_workspace(workspace_id)).map_err(
                    |source| LifecycleError::DeleteWorkspace {
                        workspace_id: workspace_id.clone(),
                        source,
                    },
                )?;
                log::info!("Deleted workspace {}", workspace_id);
            }
            Call::DeleteBoard { key, board_id } => {
                track(progress, &call, || api.delete_board(board_id)).map_err(|source| {
                    LifecycleError::DeleteBoard {
                        key: key.clone(),
                        board_id: board_id.clone(),
                        source,
                    }
                })?;
                log::info!("Deleted board '{}' ({})", key, board_id);
            }
            _ => {}
        }
    }

    Ok(())
}

/// Issue one call with progress reporting around it
fn track<T, P, F>(progress: &mut P, call: &Call, issue: F) -> boardapi::Result<T>
where
    P: ProgressCallback + ?Sized,
    F: FnOnce() -> boardapi::Result<T>,
{
    log::debug!("{}", call);
    progress.on_call_start(call);
    let result = issue();
    progress.on_call_complete(call, result.as_ref().err());
    result
}

/// Issue independent best-effort calls, one per item
///
/// Failures become diagnostics in item order. With a pool the calls run in
/// parallel and progress is reported once the batch is done.
fn run_best_effort<T, P, D, F>(
    items: &[T],
    pool: Option<&rayon::ThreadPool>,
    progress: &mut P,
    diagnostics: &mut Vec<Diagnostic>,
    describe: D,
    issue: F,
) where
    T: Sync,
    P: ProgressCallback + ?Sized,
    D: Fn(&T) -> Call,
    F: Fn(&T) -> boardapi::Result<()> + Sync,
{
    let calls: Vec<Call> = items.iter().map(describe).collect();

    let errors: Vec<Option<boardapi::Error>> = match pool {
        Some(pool) if items.len() > 1 => {
            let errors: Vec<Option<boardapi::Error>> =
                pool.install(|| items.par_iter().map(|item| issue(item).err()).collect());
            for (call, error) in calls.iter().zip(&errors) {
                progress.on_call_start(call);
                progress.on_call_complete(call, error.as_ref());
            }
            errors
        }
        _ => items
            .iter()
            .zip(&calls)
            .map(|(item, call)| track(progress, call, || issue(item)).err())
            .collect(),
    };

    for (call, error) in calls.into_iter().zip(errors) {
        if let Some(error) = error {
            log::warn!("Unable to {}: {}", call, error);
            diagnostics.push(Diagnostic::new(call, error));
        }
    }
}

fn invitation_pool(jobs: usize) -> Option<rayon::ThreadPool> {
    if jobs <= 1 {
        return None;
    }
    match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
        Ok(pool) => Some(pool),
        Err(e) => {
            log::warn!("Failed to create invitation thread pool, running sequentially: {}", e);
            None
        }
    }
}
