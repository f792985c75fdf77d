#![allow(missing_docs)]

pub mod engine;
pub mod error;
pub mod format;
pub mod question;
pub mod registry;
pub mod resolve;
pub mod signal;

pub use engine::{Callbacks, Engine, Injected};
pub use error::EngineError;
pub use format::formatted_answer;
pub use question::{Answers, Choice, Field, Kind, Question, ResolveCtx, Validation};
pub use registry::{Registry, Renderer};
pub use signal::{RenderFailure, RenderResult, Reply, Signal};
