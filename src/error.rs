//! Error types.
//!
//! The engine itself never escalates: missing DOM state is a normal
//! "not found, create instead" outcome and stays `Option`-shaped. The only
//! error type here crosses the component-manager boundary, where a broken
//! component must not corrupt the rest of the document's rendering - the
//! reconciler catches it at the call site, logs it, and continues.

use thiserror::Error;

/// Failure raised by a component lifecycle hook.
#[derive(Debug, Error)]
pub enum ComponentError {
    /// A mount/update/unmount hook failed. Carries the component identity
    /// (when known) for the log line; never propagated past the call site.
    #[error("component hook failed for {sid:?}: {message}")]
    HookFailed {
        /// Identity of the component, if the hook could resolve one.
        sid: Option<String>,
        /// Hook-supplied failure description.
        message: String,
    },
}

impl ComponentError {
    /// Convenience constructor for hook implementations.
    pub fn hook(sid: Option<&str>, message: impl Into<String>) -> Self {
        ComponentError::HookFailed {
            sid: sid.map(str::to_string),
            message: message.into(),
        }
    }
}
