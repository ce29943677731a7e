//! Manifest schema: the file a user writes to describe a workspace tree
//!
//! ```toml
//! member_emails = ["ada@example.com"]
//!
//! [workspace]
//! name = "Acme"
//!
//! [[boards]]
//! name = "Engineering"
//! key = "eng"                # optional, defaults to name
//! cards = ["Backlog", "Doing", "Done"]
//!
//! [[workspace_members]]
//! email = "grace@example.com"
//! name = "Grace Hopper"
//! role = "admin"             # optional, defaults to "normal"
//! ```

use anyhow::{Context, Result};
use lifecycle::{BoardSpec, DesiredState, WorkspaceMember, WorkspaceSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Workspace membership types the service accepts
pub const ROLES: &[&str] = &["admin", "normal"];

// ============================================================================
// Manifest Schema
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub workspace: WorkspaceSection,

    #[serde(default)]
    pub boards: Vec<BoardSection>,

    /// Invited to every board
    #[serde(default)]
    pub member_emails: Vec<String>,

    #[serde(default)]
    pub workspace_members: Vec<MemberSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceSection {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub name: String,
    #[serde(default)]
    pub cards: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberSection {
    pub email: String,
    pub name: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "normal".to_string()
}

impl Manifest {
    /// Load a manifest, choosing the parser by file extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read manifest: {}", path.display()))?;

        let manifest: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Invalid TOML in manifest: {}", path.display()))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON in manifest: {}", path.display()))?,
            _ => anyhow::bail!(
                "Unsupported manifest format: {} (expected .toml or .json)",
                path.display()
            ),
        };

        log::debug!("Loaded manifest from {}", path.display());
        Ok(manifest)
    }

    /// Load and validate in one step
    pub fn load_valid(path: &Path) -> Result<Self> {
        let manifest = Self::load(path)?;
        manifest
            .validate()
            .with_context(|| format!("Invalid manifest: {}", path.display()))?;
        Ok(manifest)
    }

    /// Validate the manifest
    pub fn validate(&self) -> Result<()> {
        if self.workspace.name.trim().is_empty() {
            anyhow::bail!("Workspace name cannot be empty");
        }

        let mut keys = HashSet::new();
        for (index, board) in self.boards.iter().enumerate() {
            board
                .validate()
                .with_context(|| format!("Invalid board #{} '{}'", index + 1, board.name))?;
            if !keys.insert(board.effective_key()) {
                anyhow::bail!(
                    "Duplicate board key '{}'; set a distinct `key` on one of the boards",
                    board.effective_key()
                );
            }
        }

        let mut emails = HashSet::new();
        for email in &self.member_emails {
            validate_email(email)?;
            if !emails.insert(email.to_lowercase()) {
                anyhow::bail!("Duplicate member email: {}", email);
            }
        }

        for member in &self.workspace_members {
            member
                .validate()
                .with_context(|| format!("Invalid workspace member '{}'", member.email))?;
        }

        Ok(())
    }

    /// Convert into the lifecycle's desired state
    pub fn to_desired(&self) -> DesiredState {
        DesiredState {
            workspace: WorkspaceSpec {
                name: self.workspace.name.clone(),
            },
            boards: self
                .boards
                .iter()
                .map(|b| BoardSpec {
                    key: b.key.clone(),
                    name: b.name.clone(),
                    cards: b.cards.clone(),
                })
                .collect(),
            member_emails: self.member_emails.clone(),
            workspace_members: self
                .workspace_members
                .iter()
                .map(|m| WorkspaceMember {
                    email: m.email.clone(),
                    name: m.name.clone(),
                    role: m.role.clone(),
                })
                .collect(),
        }
    }
}

impl BoardSection {
    fn effective_key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("Board name cannot be empty");
        }
        if self.key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            anyhow::bail!("Board key cannot be empty");
        }
        if self.cards.iter().any(|c| c.trim().is_empty()) {
            anyhow::bail!("List names cannot be empty");
        }
        Ok(())
    }
}

impl MemberSection {
    pub fn validate(&self) -> Result<()> {
        validate_email(&self.email)?;
        if self.name.trim().is_empty() {
            anyhow::bail!("Member name cannot be empty");
        }
        if !ROLES.contains(&self.role.as_str()) {
            anyhow::bail!(
                "Unknown role '{}' (expected one of: {})",
                self.role,
                ROLES.join(", ")
            );
        }
        Ok(())
    }
}

/// A plausible address: one `@`, something before it, a dotted domain after it
fn validate_email(email: &str) -> Result<()> {
    let plausible = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !plausible {
        anyhow::bail!("Invalid email address: '{}'", email);
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
