use serde_json::Value;
use thiserror::Error;

/// Navigation signal raised by a renderer in place of an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Go back one question.
    Retreat,
    /// Skip forward past the next two questions.
    AdvanceSkip,
    /// Give up on the current question. Handled by the controller's
    /// permissive default branch: nothing is stored and the cursor moves on.
    Abort,
}

/// What a renderer hands back to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Answer(Value),
    Signal(Signal),
}

/// Opaque renderer failure. The controller swallows these: nothing is stored
/// for the question and the sequence continues.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct RenderFailure(String);

impl RenderFailure {
    pub fn new(message: impl Into<String>) -> Self {
        RenderFailure(message.into())
    }
}

pub type RenderResult = Result<Reply, RenderFailure>;
