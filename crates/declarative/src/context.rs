//! Execution callbacks
//!
//! These traits allow the declarative crate to be driven without
//! depending on a specific terminal UI or prompt implementation.

use crate::types::{ChangeResult, ChangeSet};
use anyhow::Result;

/// Progress callback for execution operations
///
/// Implement this trait to receive progress updates during execution.
pub trait ProgressCallback {
    /// Called once the engine has produced a change set
    fn on_plan(&mut self, changes: &ChangeSet);

    /// Called for every change the engine reports back
    fn on_change_complete(&mut self, id: &str, result: &ChangeResult);

    /// Called after the engine has finished applying
    fn on_apply_complete(&mut self, location: Option<&str>);
}

/// Confirmation callback for user interaction
pub trait ConfirmCallback {
    /// Ask the user to confirm an action
    ///
    /// Returns `true` if the user confirmed.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_plan(&mut self, _changes: &ChangeSet) {}
    fn on_change_complete(&mut self, _id: &str, _result: &ChangeResult) {}
    fn on_apply_complete(&mut self, _location: Option<&str>) {}
}

/// Auto-confirm callback (always returns true)
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Auto-decline callback (always returns false)
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}
