//! Core types for the board API client.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default base URL of the Trello REST API (version 1).
pub const DEFAULT_API_BASE: &str = "https://api.trello.com/1";

/// API key and token pair sent with every request.
///
/// The token is never printed: `Debug` redacts it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Application key.
    pub key: String,
    /// User token authorizing the key.
    pub token: String,
}

impl Credentials {
    /// Create a credential pair.
    pub fn new(key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// A single remote call, with the arguments it was issued with.
///
/// The mock backend records these; they also give log lines a stable shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// `POST /organizations`
    CreateWorkspace {
        /// Display name of the new workspace
        name: String,
    },
    /// `POST /boards`
    CreateBoard {
        /// Owning workspace
        workspace_id: String,
        /// Board name
        name: String,
    },
    /// `POST /lists`
    CreateList {
        /// Board id assigned on create
        board_id: String,
        /// List title
        name: String,
    },
    /// `PUT /boards/{id}/members`
    InviteBoardMember {
        /// Board id assigned on create
        board_id: String,
        /// Address the invitation is sent to
        email: String,
    },
    /// `PUT /organizations/{id}/members`
    InviteWorkspaceMember {
        /// Workspace id assigned on create
        workspace_id: String,
        /// Address the invitation is sent to
        email: String,
        /// Name shown on the invitation
        full_name: String,
        /// `admin` or `normal`
        role: String,
    },
    /// `PUT /boards/{id}`
    UpdateBoardName {
        /// Board id assigned on create
        board_id: String,
        /// Name the board is renamed to
        name: String,
    },
    /// `DELETE /organizations/{id}`
    DeleteWorkspace {
        /// Workspace id assigned on create
        workspace_id: String,
    },
    /// `DELETE /boards/{id}`
    DeleteBoard {
        /// Board id assigned on create
        board_id: String,
    },
}

impl fmt::Display for ApiCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateWorkspace { name } => write!(f, "create workspace '{name}'"),
            Self::CreateBoard { workspace_id, name } => {
                write!(f, "create board '{name}' in {workspace_id}")
            }
            Self::CreateList { board_id, name } => write!(f, "create list '{name}' on {board_id}"),
            Self::InviteBoardMember { board_id, email } => {
                write!(f, "invite {email} to board {board_id}")
            }
            Self::InviteWorkspaceMember {
                workspace_id,
                email,
                role,
                ..
            } => write!(f, "invite {email} ({role}) to workspace {workspace_id}"),
            Self::UpdateBoardName { board_id, name } => {
                write!(f, "rename board {board_id} to '{name}'")
            }
            Self::DeleteWorkspace { workspace_id } => write!(f, "delete workspace {workspace_id}"),
            Self::DeleteBoard { board_id } => write!(f, "delete board {board_id}"),
        }
    }
}
