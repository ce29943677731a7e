//! Progress reporting
//!
//! Lets a frontend follow a lifecycle operation without this crate
//! depending on any terminal library.

use crate::types::Call;

/// Progress callback for lifecycle operations
///
/// Calls run in a parallel batch are reported after the batch finishes,
/// with `on_call_start` and `on_call_complete` back to back.
pub trait ProgressCallback: Send {
    /// Called before a remote call is issued
    fn on_call_start(&mut self, call: &Call);

    /// Called when a remote call returns; `error` is `None` on success
    fn on_call_complete(&mut self, call: &Call, error: Option<&boardapi::Error>);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_call_start(&mut self, _call: &Call) {}
    fn on_call_complete(&mut self, _call: &Call, _error: Option<&boardapi::Error>) {}
}
