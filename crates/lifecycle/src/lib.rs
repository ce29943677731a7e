//! # Lifecycle
//!
//! Create, update and delete a workspace tree (workspace, boards, lists and
//! memberships) against a board service, driven by a declared desired state.
//!
//! ## Core Concepts
//!
//! - **DesiredState**: the tree the caller wants to exist
//! - **ReconciledWorkspace**: remote ids assigned during Create; the caller
//!   persists it and hands it back for Update and Delete
//! - **Call**: one remote operation, as planned and as reported to progress
//! - **Diagnostic**: a best-effort call that failed without stopping the run
//!
//! ## Failure policy
//!
//! Workspace and board creation, renames and deletions are fatal: the first
//! failure aborts and nothing is rolled back. List creation and invitations
//! are best-effort and come back as diagnostics.
//!
//! ## Example
//!
//! ```
//! use boardapi::MockBackend;
//! use lifecycle::{BoardSpec, CreateOptions, DesiredState, NoProgress, create};
//!
//! let mut desired = DesiredState::new("Acme");
//! desired.boards.push(BoardSpec::new("Eng", &["Backlog", "Done"]));
//!
//! let api = MockBackend::new();
//! let applied = create(&api, &desired, &CreateOptions::default(), &mut NoProgress)?;
//! assert_eq!(applied.state.board_ids(), vec!["b1"]);
//! # Ok::<(), lifecycle::CreateFailure>(())
//! ```
//!
//! The remote service is reached through [`boardapi::BoardApi`], so tests and
//! dry runs can swap in [`boardapi::MockBackend`].

pub mod context;
pub mod diff;
pub mod error;
pub mod executor;
pub mod model;
pub mod planner;
pub mod types;

pub use context::{NoProgress, ProgressCallback};
pub use diff::{BoardChange, BoardDiff, DiffSummary, diff_boards};
pub use error::{CreateFailure, LifecycleError};
pub use executor::{create, delete, update};
pub use model::{
    BoardRecord, BoardSpec, DesiredState, ReconciledWorkspace, WorkspaceMember, WorkspaceSpec,
};
pub use planner::{plan_create, plan_delete, plan_update};
pub use types::{Applied, Call, CreateOptions, Diagnostic, UpdateReport};
