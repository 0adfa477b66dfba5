//! Error types for the protocol layer.
//!
//! Each crate in Roomcast defines its own error enum. A `ProtocolError`
//! always means a value could not be interpreted, never that routing failed.

/// Errors that can occur while interpreting protocol values.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A location string did not match any of the supported forms.
    #[error("invalid location: {0}")]
    InvalidLocation(String),

    /// A chat key string was not of the form `chat-N`.
    #[error("invalid chat key: {0}")]
    InvalidChatKey(String),
}
