//! Core types for lifecycle operations

use std::fmt;

/// One remote call issued (or planned) by a lifecycle operation
///
/// Boards are named by key; create-time calls cannot carry a board id
/// because the service has not assigned it yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateWorkspace {
        name: String,
    },
    CreateBoard {
        key: String,
        name: String,
    },
    CreateList {
        board_key: String,
        name: String,
    },
    InviteBoardMember {
        board_key: String,
        email: String,
    },
    InviteWorkspaceMember {
        email: String,
        full_name: String,
        role: String,
    },
    UpdateBoardName {
        key: String,
        board_id: String,
        name: String,
    },
    DeleteWorkspace {
        workspace_id: String,
    },
    DeleteBoard {
        key: String,
        board_id: String,
    },
}

impl Call {
    /// Whether a failure of this call aborts the lifecycle operation
    ///
    /// Workspace and board existence are prerequisites for everything
    /// after them; lists and invitations are best-effort.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::CreateList { .. }
                | Self::InviteBoardMember { .. }
                | Self::InviteWorkspaceMember { .. }
        )
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateWorkspace { name } => write!(f, "create workspace '{name}'"),
            Self::CreateBoard { name, .. } => write!(f, "create board '{name}'"),
            Self::CreateList { board_key, name } => {
                write!(f, "create list '{name}' on board '{board_key}'")
            }
            Self::InviteBoardMember { board_key, email } => {
                write!(f, "invite {email} to board '{board_key}'")
            }
            Self::InviteWorkspaceMember { email, role, .. } => {
                write!(f, "invite {email} to workspace as {role}")
            }
            Self::UpdateBoardName { key, name, .. } => {
                write!(f, "rename board '{key}' to '{name}'")
            }
            Self::DeleteWorkspace { workspace_id } => write!(f, "delete workspace {workspace_id}"),
            Self::DeleteBoard { key, board_id } => write!(f, "delete board '{key}' ({board_id})"),
        }
    }
}

/// A best-effort call that failed without aborting the operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub call: Call,
    pub error: boardapi::Error,
}

impl Diagnostic {
    pub fn new(call: Call, error: boardapi::Error) -> Self {
        Self { call, error }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unable to {}: {}", self.call, self.error)
    }
}

/// Result of a lifecycle operation that completed, with its diagnostics
#[derive(Debug, Clone)]
pub struct Applied<T> {
    pub state: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Applied<T> {
    /// Whether every best-effort call succeeded too
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Options for Create
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Worker threads for member invitations; 1 keeps everything sequential
    pub jobs: usize,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self { jobs: 1 }
    }
}

/// What an Update did and did not touch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Keys of boards whose name was sent to the service
    pub renamed: Vec<String>,
    /// Keys of record slots without a remote board
    pub skipped: Vec<String>,
    /// Keys of desired boards that have no record; Update never creates boards
    pub not_provisioned: Vec<String>,
    /// Desired workspace name, when it differs from the created one
    pub ignored_workspace_rename: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_split() {
        let fatal = [
            Call::CreateWorkspace {
                name: "Acme".into(),
            },
            Call::CreateBoard {
                key: "eng".into(),
                name: "Eng".into(),
            },
            Call::UpdateBoardName {
                key: "eng".into(),
                board_id: "b1".into(),
                name: "Eng".into(),
            },
            Call::DeleteWorkspace {
                workspace_id: "w1".into(),
            },
            Call::DeleteBoard {
                key: "eng".into(),
                board_id: "b1".into(),
            },
        ];
        assert!(fatal.iter().all(Call::is_fatal));

        let best_effort = [
            Call::CreateList {
                board_key: "eng".into(),
                name: "Done".into(),
            },
            Call::InviteBoardMember {
                board_key: "eng".into(),
                email: "ada@example.com".into(),
            },
            Call::InviteWorkspaceMember {
                email: "ada@example.com".into(),
                full_name: "Ada".into(),
                role: "normal".into(),
            },
        ];
        assert!(best_effort.iter().all(|c| !c.is_fatal()));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(
            Call::CreateList {
                board_key: "eng".into(),
                name: "Done".into(),
            },
            boardapi::Error::transport("connection reset"),
        );
        assert_eq!(
            diag.to_string(),
            "unable to create list 'Done' on board 'eng': transport error: connection reset"
        );
    }
}
