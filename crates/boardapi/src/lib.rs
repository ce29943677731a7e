//! # boardapi
//!
//! Blocking client for the parts of the Trello REST API needed to provision
//! a workspace: organizations, boards, lists and member invitations.
//!
//! ## Example
//!
//! ```no_run
//! use boardapi::backend::BoardApi;
//! use boardapi::backend::trello::TrelloBackend;
//! use boardapi::Credentials;
//!
//! let api = TrelloBackend::new(Credentials::new("key", "token"));
//!
//! let workspace = api.create_workspace("Acme").expect("create workspace");
//! let board = api.create_board(&workspace, "Engineering").expect("create board");
//! api.create_list(&board, "Backlog").expect("create list");
//! api.invite_board_member(&board, "ada@example.com").expect("invite");
//! ```
//!
//! ## Encoding
//!
//! Names, emails and identifiers are percent-encoded before they reach the
//! wire, so values such as `R&D Team` or `ada+boards@example.com` arrive
//! intact.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod types;

pub use backend::{BoardApi, MockBackend};
pub use error::{Error, ErrorCategory, Result};
pub use types::{ApiCall, Credentials, DEFAULT_API_BASE};
