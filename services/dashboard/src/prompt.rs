//! Confirmation seam for destructive actions

use async_trait::async_trait;

/// Asks for approval before a destructive action is carried out
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ConfirmPrompt: Send + Sync {
    /// Returns true if the action should proceed
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Pass-through prompt for contexts where confirmation already
/// happened upstream. The served dashboard asks via the browser's
/// blocking dialog before the delete request is ever sent, so its
/// action route uses this implementation.
#[derive(Debug, Default)]
pub struct AutoConfirm;

#[async_trait]
impl ConfirmPrompt for AutoConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
