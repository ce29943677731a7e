//! Planner - the ordered remote calls each lifecycle operation issues

use crate::error::LifecycleError;
use crate::model::{DesiredState, ReconciledWorkspace};
use crate::types::Call;

/// Calls a Create issues when nothing fails
///
/// Workspace first, then per board: the board, its lists in order, and one
/// invitation per member email. Workspace members come last.
pub fn plan_create(desired: &DesiredState) -> Vec<Call> {
    let mut calls = vec![Call::CreateWorkspace {
        name: desired.workspace.name.clone(),
    }];

    for board in &desired.boards {
        let key = board.key().to_string();
        calls.push(Call::CreateBoard {
            key: key.clone(),
            name: board.name.clone(),
        });
        calls.extend(board_calls(&key, &board.cards, &desired.member_emails));
    }

    calls.extend(desired.workspace_members.iter().map(|m| Call::InviteWorkspaceMember {
        email: m.email.clone(),
        full_name: m.name.clone(),
        role: m.role.clone(),
    }));

    calls
}

/// Best-effort calls that follow a board's creation
pub(crate) fn board_calls(board_key: &str, cards: &[String], emails: &[String]) -> Vec<Call> {
    cards
        .iter()
        .map(|name| Call::CreateList {
            board_key: board_key.to_string(),
            name: name.clone(),
        })
        .chain(emails.iter().map(|email| Call::InviteBoardMember {
            board_key: board_key.to_string(),
            email: email.clone(),
        }))
        .collect()
}

/// Calls an Update issues: one rename per provisioned board, in record order
///
/// Slots without a remote id are skipped. A provisioned board whose key is
/// absent from `desired` is an error; nothing is planned in that case.
pub fn plan_update(
    record: &ReconciledWorkspace,
    desired: &DesiredState,
) -> Result<Vec<Call>, LifecycleError> {
    record
        .provisioned()
        .map(|(key, board_id)| match desired.board(key) {
            Some(spec) => Ok(Call::UpdateBoardName {
                key: key.to_string(),
                board_id: board_id.to_string(),
                name: spec.name.clone(),
            }),
            None => Err(LifecycleError::MissingBoard {
                key: key.to_string(),
                board_id: board_id.to_string(),
            }),
        })
        .collect()
}

/// Calls a Delete issues: the workspace, then every provisioned board
pub fn plan_delete(record: &ReconciledWorkspace) -> Vec<Call> {
    let mut calls = vec![Call::DeleteWorkspace {
        workspace_id: record.workspace_id.clone(),
    }];
    calls.extend(record.provisioned().map(|(key, board_id)| Call::DeleteBoard {
        key: key.to_string(),
        board_id: board_id.to_string(),
    }));
    calls
}
