//! Backend trait and implementations for the board API.
//!
//! This module provides the [`BoardApi`] trait and two implementations:
//! [`trello::TrelloBackend`] talks to the real service, [`MockBackend`]
//! records calls in memory.
//!
//! # Testing
//!
//! Use [`MockBackend`] for testing without network access:
//!
//! ```
//! use boardapi::backend::{BoardApi, MockBackend};
//! use boardapi::{ApiCall, Error};
//!
//! let mock = MockBackend::new();
//! mock.fail_when(
//!     |call| matches!(call, ApiCall::CreateList { name, .. } if name == "Done"),
//!     Error::transport("connection reset"),
//! );
//!
//! let workspace = mock.create_workspace("Acme").unwrap();
//! let board = mock.create_board(&workspace, "Eng").unwrap();
//! assert!(mock.create_list(&board, "Backlog").is_ok());
//! assert!(mock.create_list(&board, "Done").is_err());
//! assert_eq!(mock.calls().len(), 4);
//! ```

pub mod trello;

use crate::error::{Error, Result};
use crate::types::ApiCall;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Operations the lifecycle engine needs from the remote service.
///
/// Every method is one blocking round trip. Create calls return the
/// identifier the service assigned.
pub trait BoardApi: Send + Sync {
    /// Create an organization (workspace) with the given display name.
    fn create_workspace(&self, name: &str) -> Result<String>;

    /// Create a board inside a workspace, without default lists.
    fn create_board(&self, workspace_id: &str, name: &str) -> Result<String>;

    /// Create a list (column) on a board.
    fn create_list(&self, board_id: &str, name: &str) -> Result<()>;

    /// Invite a member to a board by email. Repeating it is harmless.
    fn invite_board_member(&self, board_id: &str, email: &str) -> Result<()>;

    /// Invite a member to a workspace by email. Repeating it is harmless.
    fn invite_workspace_member(
        &self,
        workspace_id: &str,
        email: &str,
        full_name: &str,
        role: &str,
    ) -> Result<()>;

    /// Rename a board.
    fn update_board_name(&self, board_id: &str, name: &str) -> Result<()>;

    /// Delete a workspace.
    fn delete_workspace(&self, workspace_id: &str) -> Result<()>;

    /// Delete a board.
    fn delete_board(&self, board_id: &str) -> Result<()>;
}

type FailureRule = (Box<dyn Fn(&ApiCall) -> bool + Send + Sync>, Error);

#[derive(Default)]
struct MockState {
    calls: Vec<ApiCall>,
    workspaces_created: usize,
    boards_created: usize,
    failures: Vec<FailureRule>,
}

/// Mock backend for testing without network access.
///
/// Every call is recorded, including calls that fail. Workspaces get ids
/// `w1`, `w2`, ... and boards `b1`, `b2`, ... in creation order. Clones
/// share the same recorded state.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    /// Create a new empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every call matching `predicate` with `error`.
    ///
    /// Rules are checked in registration order; the first match wins.
    pub fn fail_when<F>(&self, predicate: F, error: Error)
    where
        F: Fn(&ApiCall) -> bool + Send + Sync + 'static,
    {
        self.lock().failures.push((Box::new(predicate), error));
    }

    /// All calls issued so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: ApiCall) -> Result<()> {
        let mut state = self.lock();
        let failure = state
            .failures
            .iter()
            .find(|(predicate, _)| predicate(&call))
            .map(|(_, error)| error.clone());
        state.calls.push(call);
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("MockBackend")
            .field("calls", &state.calls)
            .field("failure_rules", &state.failures.len())
            .finish()
    }
}

impl BoardApi for MockBackend {
    fn create_workspace(&self, name: &str) -> Result<String> {
        self.record(ApiCall::CreateWorkspace {
            name: name.to_string(),
        })?;
        let mut state = self.lock();
        state.workspaces_created += 1;
        Ok(format!("w{}", state.workspaces_created))
    }

    fn create_board(&self, workspace_id: &str, name: &str) -> Result<String> {
        self.record(ApiCall::CreateBoard {
            workspace_id: workspace_id.to_string(),
            name: name.to_string(),
        })?;
        let mut state = self.lock();
        state.boards_created += 1;
        Ok(format!("b{}", state.boards_created))
    }

    fn create_list(&self, board_id: &str, name: &str) -> Result<()> {
        self.record(ApiCall::CreateList {
            board_id: board_id.to_string(),
            name: name.to_string(),
        })
    }

    fn invite_board_member(&self, board_id: &str, email: &str) -> Result<()> {
        self.record(ApiCall::InviteBoardMember {
            board_id: board_id.to_string(),
            email: email.to_string(),
        })
    }

    fn invite_workspace_member(
        &self,
        workspace_id: &str,
        email: &str,
        full_name: &str,
        role: &str,
    ) -> Result<()> {
        self.record(ApiCall::InviteWorkspaceMember {
            workspace_id: workspace_id.to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            role: role.to_string(),
        })
    }

    fn update_board_name(&self, board_id: &str, name: &str) -> Result<()> {
        self.record(ApiCall::UpdateBoardName {
            board_id: board_id.to_string(),
            name: name.to_string(),
        })
    }

    fn delete_workspace(&self, workspace_id: &str) -> Result<()> {
        self.record(ApiCall::DeleteWorkspace {
            workspace_id: workspace_id.to_string(),
        })
    }

    fn delete_board(&self, board_id: &str) -> Result<()> {
        self.record(ApiCall::DeleteBoard {
            board_id: board_id.to_string(),
        })
    }
}
