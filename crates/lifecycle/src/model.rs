//! Desired and reconciled state of a workspace tree
//!
//! The desired state is what the caller declares. The reconciled state is
//! the same tree annotated with the identifiers the remote service assigned,
//! and is what the caller persists between lifecycle calls.

use serde::{Deserialize, Serialize};

// ============================================================================
// Desired State
// ============================================================================

/// The organization-level container. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSpec {
    pub name: String,
}

/// A board and the lists to create on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSpec {
    /// Stable identity used to find the board's remote id on update/delete.
    /// Defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Board display name
    pub name: String,

    /// List (column) names, in board order
    #[serde(default)]
    pub cards: Vec<String>,
}

impl BoardSpec {
    /// Create a board spec keyed by its name
    pub fn new(name: impl Into<String>, cards: &[&str]) -> Self {
        Self {
            key: None,
            name: name.into(),
            cards: cards.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    /// Set an explicit key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// The effective key: `key` if set, otherwise `name`
    pub fn key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.name)
    }
}

/// A member invited at workspace scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMember {
    pub email: String,
    /// Display name sent as `fullName`
    pub name: String,
    /// Membership type, e.g. `normal` or `admin`
    pub role: String,
}

/// Everything the caller wants to exist remotely
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredState {
    pub workspace: WorkspaceSpec,

    #[serde(default)]
    pub boards: Vec<BoardSpec>,

    /// Emails invited to every board created in a Create pass
    #[serde(default)]
    pub member_emails: Vec<String>,

    #[serde(default)]
    pub workspace_members: Vec<WorkspaceMember>,
}

impl DesiredState {
    /// Create a desired state with just a workspace
    pub fn new(workspace_name: impl Into<String>) -> Self {
        Self {
            workspace: WorkspaceSpec {
                name: workspace_name.into(),
            },
            boards: Vec::new(),
            member_emails: Vec::new(),
            workspace_members: Vec::new(),
        }
    }

    /// Find a board spec by effective key
    pub fn board(&self, key: &str) -> Option<&BoardSpec> {
        self.boards.iter().find(|b| b.key() == key)
    }
}

// ============================================================================
// Reconciled State
// ============================================================================

/// A board slot in the reconciled record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRecord {
    pub key: String,

    /// Last name sent to the service
    pub name: String,

    /// Remote id, `None` when the board was never created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Remote identifiers for a provisioned workspace tree
///
/// `boards` keeps the order of the board specs it was created from and
/// maps each key to its remote id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledWorkspace {
    pub workspace_id: String,
    pub workspace_name: String,
    #[serde(default)]
    pub boards: Vec<BoardRecord>,
}

impl ReconciledWorkspace {
    /// A record for a freshly created workspace; every board slot is empty
    pub fn new(workspace_id: impl Into<String>, desired: &DesiredState) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            workspace_name: desired.workspace.name.clone(),
            boards: desired
                .boards
                .iter()
                .map(|b| BoardRecord {
                    key: b.key().to_string(),
                    name: b.name.clone(),
                    id: None,
                })
                .collect(),
        }
    }

    /// Board ids in record order, `""` where no board exists
    pub fn board_ids(&self) -> Vec<&str> {
        self.boards
            .iter()
            .map(|b| b.id.as_deref().unwrap_or(""))
            .collect()
    }

    /// Remote id of the board with the given key
    pub fn board_id(&self, key: &str) -> Option<&str> {
        self.boards
            .iter()
            .find(|b| b.key == key)
            .and_then(|b| b.id.as_deref())
    }

    /// Boards that exist remotely, as `(key, id)` pairs
    pub fn provisioned(&self) -> impl Iterator<Item = (&str, &str)> {
        self.boards
            .iter()
            .filter_map(|b| b.id.as_deref().map(|id| (b.key.as_str(), id)))
    }

    /// Whether every board slot has a remote id
    pub fn is_complete(&self) -> bool {
        self.boards.iter().all(|b| b.id.is_some())
    }

    pub(crate) fn record_mut(&mut self, key: &str) -> Option<&mut BoardRecord> {
        self.boards.iter_mut().find(|b| b.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desired() -> DesiredState {
        let mut desired = DesiredState::new("Acme");
        desired.boards = vec![
            BoardSpec::new("Eng", &["Backlog", "Done"]),
            BoardSpec::new("Operations", &[]).with_key("ops"),
        ];
        desired
    }

    #[test]
    fn test_board_key_defaults_to_name() {
        let desired = desired();
        assert_eq!(desired.boards[0].key(), "Eng");
        assert_eq!(desired.boards[1].key(), "ops");
        assert_eq!(desired.board("ops").unwrap().name, "Operations");
        assert!(desired.board("Operations").is_none());
    }

    #[test]
    fn test_new_record_has_empty_slots() {
        let record = ReconciledWorkspace::new("w1", &desired());
        assert_eq!(record.workspace_name, "Acme");
        assert_eq!(record.board_ids(), vec!["", ""]);
        assert_eq!(record.provisioned().count(), 0);
        assert!(!record.is_complete());
    }

    #[test]
    fn test_board_lookup_by_key() {
        let mut record = ReconciledWorkspace::new("w1", &desired());
        record.boards[1].id = Some("b7".to_string());

        assert_eq!(record.board_id("ops"), Some("b7"));
        assert_eq!(record.board_id("Eng"), None);
        assert_eq!(record.board_ids(), vec!["", "b7"]);
        assert_eq!(record.provisioned().collect::<Vec<_>>(), vec![("ops", "b7")]);
    }

    #[test]
    fn test_record_toml_round_trip() {
        let mut record = ReconciledWorkspace::new("w1", &desired());
        record.boards[0].id = Some("b1".to_string());

        let text = toml::to_string_pretty(&record).unwrap();
        let loaded: ReconciledWorkspace = toml::from_str(&text).unwrap();

        assert_eq!(loaded, record);
        assert_eq!(loaded.board_ids(), vec!["b1", ""]);
    }

    #[test]
    fn test_desired_state_from_toml() {
        let text = r#"
member_emails = ["ada@example.com"]

[workspace]
name = "Acme"

[[boards]]
name = "Eng"
cards = ["Backlog", "Done"]

[[boards]]
key = "ops"
name = "Operations"

[[workspace_members]]
email = "grace@example.com"
name = "Grace Hopper"
role = "admin"
"#;
        let desired: DesiredState = toml::from_str(text).unwrap();
        assert_eq!(desired.workspace.name, "Acme");
        assert_eq!(desired.boards.len(), 2);
        assert!(desired.boards[1].cards.is_empty());
        assert_eq!(desired.boards[1].key(), "ops");
        assert_eq!(desired.member_emails, vec!["ada@example.com"]);
        assert_eq!(desired.workspace_members[0].role, "admin");
    }
}
