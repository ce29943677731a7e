//! Diff between a desired state and a reconciled record
//!
//! Purely local: the remote service is never queried, so this only shows
//! how the manifest has moved since the record was written.

use crate::model::{DesiredState, ReconciledWorkspace};
use serde::{Deserialize, Serialize};

/// How a board differs between desired state and record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardChange {
    /// Provisioned, same name
    Unchanged,
    /// Provisioned, name differs; Update will rename it
    Rename { from: String, to: String },
    /// Desired but has no remote board
    NotProvisioned,
    /// Has a remote board but is no longer desired
    Orphaned,
}

/// A board's change, identified by key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDiff {
    pub key: String,
    pub change: BoardChange,
}

/// Compare boards by key
///
/// Desired boards come first in desired order, followed by orphans in
/// record order.
pub fn diff_boards(desired: &DesiredState, record: &ReconciledWorkspace) -> Vec<BoardDiff> {
    let mut diffs: Vec<BoardDiff> = desired
        .boards
        .iter()
        .map(|spec| {
            let key = spec.key();
            let change = match record.boards.iter().find(|r| r.key == key) {
                Some(r) if r.id.is_some() => {
                    if r.name == spec.name {
                        BoardChange::Unchanged
                    } else {
                        BoardChange::Rename {
                            from: r.name.clone(),
                            to: spec.name.clone(),
                        }
                    }
                }
                _ => BoardChange::NotProvisioned,
            };
            BoardDiff {
                key: key.to_string(),
                change,
            }
        })
        .collect();

    diffs.extend(
        record
            .provisioned()
            .filter(|(key, _)| desired.board(key).is_none())
            .map(|(key, _)| BoardDiff {
                key: key.to_string(),
                change: BoardChange::Orphaned,
            }),
    );

    diffs
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub unchanged: usize,
    pub renames: usize,
    pub not_provisioned: usize,
    pub orphaned: usize,
}

impl DiffSummary {
    /// Create a summary from a list of diffs
    pub fn from_diffs(diffs: &[BoardDiff]) -> Self {
        let mut summary = Self::default();
        for diff in diffs {
            match diff.change {
                BoardChange::Unchanged => summary.unchanged += 1,
                BoardChange::Rename { .. } => summary.renames += 1,
                BoardChange::NotProvisioned => summary.not_provisioned += 1,
                BoardChange::Orphaned => summary.orphaned += 1,
            }
        }
        summary
    }

    /// Whether the manifest has moved away from the record
    pub fn has_changes(&self) -> bool {
        self.renames + self.not_provisioned + self.orphaned > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoardSpec;

    fn record() -> ReconciledWorkspace {
        let mut desired = DesiredState::new("Acme");
        desired.boards = vec![
            BoardSpec::new("Eng", &[]),
            BoardSpec::new("Ops", &[]),
            BoardSpec::new("Sales", &[]),
        ];
        let mut record = ReconciledWorkspace::new("w1", &desired);
        record.boards[0].id = Some("b1".into());
        record.boards[2].id = Some("b3".into());
        record
    }

    #[test]
    fn test_diff_detects_each_change() {
        let mut desired = DesiredState::new("Acme");
        desired.boards = vec![
            BoardSpec::new("Engineering", &[]).with_key("Eng"),
            BoardSpec::new("Ops", &[]),
            BoardSpec::new("Support", &[]),
        ];

        let diffs = diff_boards(&desired, &record());

        assert_eq!(
            diffs,
            vec![
                BoardDiff {
                    key: "Eng".into(),
                    change: BoardChange::Rename {
                        from: "Eng".into(),
                        to: "Engineering".into()
                    }
                },
                BoardDiff {
                    key: "Ops".into(),
                    change: BoardChange::NotProvisioned
                },
                BoardDiff {
                    key: "Support".into(),
                    change: BoardChange::NotProvisioned
                },
                BoardDiff {
                    key: "Sales".into(),
                    change: BoardChange::Orphaned
                },
            ]
        );

        let summary = DiffSummary::from_diffs(&diffs);
        assert_eq!(summary.renames, 1);
        assert_eq!(summary.not_provisioned, 2);
        assert_eq!(summary.orphaned, 1);
        assert!(summary.has_changes());
    }

    #[test]
    fn test_diff_unchanged_ignores_empty_slots() {
        let mut desired = DesiredState::new("Acme");
        desired.boards = vec![BoardSpec::new("Eng", &[]), BoardSpec::new("Sales", &[])];

        let diffs = diff_boards(&desired, &record());
        let summary = DiffSummary::from_diffs(&diffs);

        // "Ops" never got a board, so dropping it orphans nothing
        assert_eq!(summary.unchanged, 2);
        assert!(!summary.has_changes());
    }
}
