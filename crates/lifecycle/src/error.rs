//! Fatal lifecycle errors

use crate::model::ReconciledWorkspace;
use crate::types::Diagnostic;

/// A failure that aborted a lifecycle operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("failed to create workspace '{name}': {source}")]
    CreateWorkspace {
        name: String,
        #[source]
        source: boardapi::Error,
    },

    #[error("failed to create board '{name}': {source}")]
    CreateBoard {
        key: String,
        name: String,
        #[source]
        source: boardapi::Error,
    },

    /// A provisioned board has no counterpart in the desired state
    #[error(
        "board '{key}' ({board_id}) exists remotely but is missing from the desired state; \
         restore it or set `key = \"{key}\"` on the board it was renamed to"
    )]
    MissingBoard { key: String, board_id: String },

    #[error("failed to rename board '{key}' ({board_id}): {source}")]
    UpdateBoard {
        key: String,
        board_id: String,
        #[source]
        source: boardapi::Error,
    },

    #[error("failed to delete workspace {workspace_id}: {source}")]
    DeleteWorkspace {
        workspace_id: String,
        #[source]
        source: boardapi::Error,
    },

    #[error("failed to delete board '{key}' ({board_id}): {source}")]
    DeleteBoard {
        key: String,
        board_id: String,
        #[source]
        source: boardapi::Error,
    },
}

impl LifecycleError {
    /// The remote error behind this failure, if any
    pub fn api_error(&self) -> Option<&boardapi::Error> {
        match self {
            Self::CreateWorkspace { source, .. }
            | Self::CreateBoard { source, .. }
            | Self::UpdateBoard { source, .. }
            | Self::DeleteWorkspace { source, .. }
            | Self::DeleteBoard { source, .. } => Some(source),
            Self::MissingBoard { .. } => None,
        }
    }
}

/// A Create that stopped at a fatal error
///
/// `partial` holds whatever had been created before the failure: `None`
/// when the workspace itself failed, otherwise a record whose board slots
/// are filled up to (not including) the failing board.
#[derive(Debug, Clone, thiserror::Error)]
#[error("create aborted: {error}")]
pub struct CreateFailure {
    #[source]
    pub error: LifecycleError,
    pub partial: Option<ReconciledWorkspace>,
    pub diagnostics: Vec<Diagnostic>,
}
