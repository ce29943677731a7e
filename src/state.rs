use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use lifecycle::ReconciledWorkspace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

// ============================================================================
// State Structures
// ============================================================================

/// Everything trellis has provisioned, keyed by workspace name
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TrellisState {
    /// Last time the state was written
    pub last_updated: DateTime<Utc>,

    #[serde(default)]
    pub workspaces: BTreeMap<String, WorkspaceState>,
}

/// One provisioned workspace tree
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorkspaceState {
    /// Create stopped at a fatal error; some boards may be missing
    #[serde(default)]
    pub partial: bool,

    /// Manifest the tree was last applied from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub record: ReconciledWorkspace,
}

impl Default for TrellisState {
    fn default() -> Self {
        Self {
            last_updated: Utc::now(),
            workspaces: BTreeMap::new(),
        }
    }
}

// ============================================================================
// TrellisState Implementation
// ============================================================================

impl TrellisState {
    /// Load state from the state directory
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::state_file()?)
    }

    /// Save state to the state directory
    pub fn save(&mut self) -> Result<PathBuf> {
        let path = paths::state_file()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Load state from `path`, or return default if the file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("State file does not exist, using default state");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;

        let state: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;

        log::debug!("Loaded state from {}", path.display());
        Ok(state)
    }

    /// Stamp `last_updated` and write to `path`
    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create state directory: {}", dir.display())
            })?;
        }

        self.last_updated = Utc::now();
        let content = toml::to_string_pretty(&self).context("Failed to serialize state to TOML")?;

        fs::write(path, &content)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;

        log::debug!("Saved state to {}", path.display());
        Ok(())
    }

    // ========================================================================
    // Workspace Helpers
    // ========================================================================

    pub fn get(&self, workspace: &str) -> Option<&WorkspaceState> {
        self.workspaces.get(workspace)
    }

    /// Look a workspace up by name, falling back to the manifest it was applied from
    ///
    /// The fallback finds a workspace whose name was edited in the manifest.
    pub fn find(&self, workspace: &str, manifest: &Path) -> Option<&WorkspaceState> {
        self.get(workspace).or_else(|| {
            self.workspaces
                .values()
                .find(|w| w.manifest.as_deref() == Some(manifest))
        })
    }

    /// Insert or replace a workspace record, keeping its creation time
    pub fn upsert(
        &mut self,
        record: ReconciledWorkspace,
        partial: bool,
        manifest: Option<PathBuf>,
    ) -> &WorkspaceState {
        let now = Utc::now();
        let name = record.workspace_name.clone();
        let created_at = self.workspaces.get(&name).map_or(now, |w| w.created_at);

        self.workspaces.insert(
            name.clone(),
            WorkspaceState {
                partial,
                manifest,
                created_at,
                updated_at: now,
                record,
            },
        );
        &self.workspaces[&name]
    }

    /// Forget a workspace
    pub fn remove(&mut self, workspace: &str) -> Option<WorkspaceState> {
        self.workspaces.remove(workspace)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use lifecycle::{BoardSpec, DesiredState};
    use tempfile::TempDir;

    fn record(name: &str, ids: &[Option<&str>]) -> ReconciledWorkspace {
        let mut desired = DesiredState::new(name);
        desired.boards = vec![
            BoardSpec::new("Eng", &["Backlog"]),
            BoardSpec::new("R&D \"Lab\"", &[]).with_key("rnd"),
        ];
        let mut record = ReconciledWorkspace::new("w1", &desired);
        for (slot, id) in record.boards.iter_mut().zip(ids) {
            slot.id = id.map(str::to_string);
        }
        record
    }

    #[test]
    fn test_missing_file_is_empty_state() {
        let dir = TempDir::new().unwrap();
        let state = TrellisState::load_from(&dir.path().join("state.toml")).unwrap();
        assert!(state.workspaces.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.toml");

        let mut state = TrellisState::default();
        state.upsert(
            record("Acme Corp", &[Some("b1"), None]),
            true,
            Some(PathBuf::from("acme.toml")),
        );
        state.save_to(&path).unwrap();

        let loaded = TrellisState::load_from(&path).unwrap();
        let ws = loaded.get("Acme Corp").unwrap();
        assert!(ws.partial);
        assert_eq!(ws.manifest.as_deref(), Some(Path::new("acme.toml")));
        assert_eq!(ws.record, record("Acme Corp", &[Some("b1"), None]));
        assert_eq!(ws.record.board_ids(), vec!["b1", ""]);
        assert_eq!(ws.record.board_id("rnd"), None);
    }

    #[test]
    fn test_upsert_keeps_created_at() {
        let mut state = TrellisState::default();
        let created = state.upsert(record("Acme", &[]), true, None).created_at;

        let ws = state.upsert(record("Acme", &[Some("b1"), Some("b2")]), false, None);
        assert_eq!(ws.created_at, created);
        assert!(ws.updated_at >= created);
        assert!(!ws.partial);
        assert_eq!(state.workspaces.len(), 1);
    }

    #[test]
    fn test_find_by_manifest() {
        let mut state = TrellisState::default();
        state.upsert(record("Acme", &[]), false, Some(PathBuf::from("/m/acme.toml")));

        let manifest = Path::new("/m/acme.toml");
        assert!(state.find("Acme", Path::new("/other.toml")).is_some());
        assert_eq!(
            state.find("Acme Corp", manifest).unwrap().record.workspace_name,
            "Acme"
        );
        assert!(state.find("Acme Corp", Path::new("/other.toml")).is_none());
    }

    #[test]
    fn test_remove() {
        let mut state = TrellisState::default();
        state.upsert(record("Acme", &[]), false, None);

        assert!(state.remove("Acme").is_some());
        assert!(state.remove("Acme").is_none());
        assert!(state.get("Acme").is_none());
    }

    #[test]
    fn test_corrupt_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "workspaces = 3").unwrap();

        let err = TrellisState::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("state.toml"));
    }
}
