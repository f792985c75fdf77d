use thiserror::Error;

/// Fatal configuration errors. These abort the whole run immediately; they
/// are never retried and never swallowed.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("question '{name}' resolved without a message")]
    MessageRequired { name: String },
    #[error("question '{name}' uses unknown kind '{kind}'")]
    UnknownKind { name: String, kind: String },
}
