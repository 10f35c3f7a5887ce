//! Error taxonomy for the binding bridge.

use thiserror::Error;

/// Errors surfaced by the binding bridge.
///
/// Configuration and lifecycle errors are developer-facing and fail loud at
/// the call site. Teardown errors are isolated per handle: `stop_all` logs
/// them and keeps stopping, while `stop_and_remove` returns them to the
/// caller.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A declaration the type system cannot rule out is malformed: an empty
    /// key, or a duplicate key within its category. Raised during `launch`,
    /// before any binding is created.
    #[error("invalid declaration for `{key}`: {reason}")]
    Configuration { key: String, reason: &'static str },

    /// `subscribe` was called with an empty publication name.
    #[error("a publication name is required to subscribe")]
    MissingSubscriptionName,

    /// `launch` was called a second time on the same instance.
    #[error("instance bindings were already launched")]
    AlreadyLaunched,

    /// The instance was destroyed; it accepts no further bindings or
    /// subscriptions.
    #[error("instance was destroyed")]
    Destroyed,

    /// A handle's stop operation failed.
    #[error("failed to stop handle: {0}")]
    Teardown(String),
}
