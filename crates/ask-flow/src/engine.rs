use std::collections::VecDeque;

use serde_json::Value;

use crate::error::EngineError;
use crate::format::formatted_answer;
use crate::question::{Answers, Question};
use crate::registry::Registry;
use crate::resolve::{resolve_fields, resolve_kind};
use crate::signal::{RenderFailure, Reply, Signal};

pub type SubmitFn<'a> = Box<dyn FnMut(&Question, &Value, &Answers) -> bool + 'a>;
pub type CancelFn<'a> = Box<dyn FnMut(&Question, &Answers) -> bool + 'a>;

/// Lifecycle callbacks observed while a sequence runs.
///
/// `on_submit` fires after each stored answer; returning `true` requests
/// early termination (supported, rarely exercised). `on_cancel` fires when a
/// renderer retreats; its return value is ignored on that path, matching the
/// engine's "do not abort" default.
#[derive(Default)]
pub struct Callbacks<'a> {
    on_submit: Option<SubmitFn<'a>>,
    on_cancel: Option<CancelFn<'a>>,
}

impl<'a> Callbacks<'a> {
    pub fn new() -> Self {
        Callbacks::default()
    }

    pub fn on_submit(
        mut self,
        on_submit: impl FnMut(&Question, &Value, &Answers) -> bool + 'a,
    ) -> Self {
        self.on_submit = Some(Box::new(on_submit));
        self
    }

    pub fn on_cancel(mut self, on_cancel: impl FnMut(&Question, &Answers) -> bool + 'a) -> Self {
        self.on_cancel = Some(Box::new(on_cancel));
        self
    }
}

/// A predetermined dispatch outcome, consumed front-to-back once injection
/// is active.
#[derive(Debug, Clone)]
pub enum Injected {
    /// Use this value as the raw answer.
    Answer(Value),
    /// Fall back to the question's `initial` value.
    Default,
    /// Raise a renderer failure for this question.
    Failure(String),
}

impl From<Value> for Injected {
    fn from(value: Value) -> Self {
        Injected::Answer(value)
    }
}

impl From<&str> for Injected {
    fn from(value: &str) -> Self {
        Injected::Answer(Value::String(value.to_string()))
    }
}

/// The sequence controller: walks a question list, resolves each question's
/// fields, dispatches to a renderer (or to the injection queue / override
/// map), formats and stores answers, and interprets navigation signals.
///
/// One engine runs one sequence at a time; `run` takes `&mut self`, so the
/// injection queue and override map are never shared across concurrent runs.
pub struct Engine {
    registry: Registry,
    injected: Option<VecDeque<Injected>>,
    overrides: Answers,
}

impl Engine {
    pub fn new(registry: Registry) -> Self {
        Engine {
            registry,
            injected: None,
            overrides: Answers::new(),
        }
    }

    /// Appends predetermined answers to the injection queue and switches
    /// dispatch into injection mode: renderers are no longer consulted, and a
    /// drained queue keeps producing `initial` fallbacks.
    pub fn inject<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Injected>,
    {
        self.injected
            .get_or_insert_with(VecDeque::new)
            .extend(values.into_iter().map(Into::into));
    }

    /// Replaces the override map wholesale. An override supplies the final
    /// answer for the named question without dispatching, but still runs
    /// validation and formatting; a rejected override falls through to the
    /// normal dispatch path.
    pub fn override_answers(&mut self, values: Answers) {
        self.overrides = values;
    }

    /// Runs a single question or an ordered list of questions to completion,
    /// returning the insertion-ordered answer map.
    pub fn run(
        &mut self,
        questions: impl Into<Vec<Question>>,
        callbacks: Callbacks<'_>,
    ) -> Result<Answers, EngineError> {
        let mut callbacks = callbacks;
        self.run_list(questions.into(), &mut callbacks)
    }

    fn run_list(
        &mut self,
        mut questions: Vec<Question>,
        callbacks: &mut Callbacks<'_>,
    ) -> Result<Answers, EngineError> {
        let mut answers = Answers::new();
        let mut prev: Option<Value> = None;
        let mut last_resolved: Option<usize> = None;
        let mut quit = false;
        let mut i = 0;

        while i < questions.len() {
            // Kind first: a falsy kind skips the question without touching
            // the previous-answer context.
            let Some(tag) = resolve_kind(&mut questions[i], prev.as_ref(), &answers) else {
                i += 1;
                continue;
            };

            {
                let (before, rest) = questions.split_at_mut(i);
                let context = last_resolved.map(|at| &before[at]);
                resolve_fields(&mut rest[0], prev.as_ref(), &answers, context)?;
            }
            last_resolved = Some(i);

            let question = &questions[i];
            let renderer = match self.registry.get(&tag) {
                Some(renderer) => renderer,
                None => {
                    return Err(EngineError::UnknownKind {
                        name: question.name.clone(),
                        kind: tag,
                    });
                }
            };

            if let Some(forced) = self.overrides.get(&question.name).cloned()
                && let Some(value) = formatted_answer(question, forced, &answers, false)
            {
                answers.insert(question.name.clone(), value.clone());
                prev = Some(value);
                i += 1;
                continue;
            }

            let outcome = if let Some(queue) = self.injected.as_mut() {
                match queue.pop_front() {
                    Some(Injected::Answer(value)) => Ok(Reply::Answer(value)),
                    Some(Injected::Failure(message)) => Err(RenderFailure::new(message)),
                    Some(Injected::Default) | None => Ok(Reply::Answer(
                        question.initial_value().cloned().unwrap_or(Value::Null),
                    )),
                }
            } else {
                renderer.render(question)
            };

            match outcome {
                Ok(Reply::Answer(raw)) => {
                    if let Some(value) = formatted_answer(question, raw, &answers, true) {
                        answers.insert(question.name.clone(), value.clone());
                        if let Some(on_submit) = callbacks.on_submit.as_mut() {
                            quit = on_submit(question, &value, &answers);
                        }
                        prev = Some(value);
                    }
                }
                Ok(Reply::Signal(Signal::Retreat)) => {
                    // Pop the most recently inserted entry; conditional skips
                    // can desynchronize the cursor from the accumulator, so
                    // this is not necessarily the current question's name.
                    if let Some(last) = answers.keys().next_back().cloned() {
                        answers.shift_remove(&last);
                    }
                    if let Some(on_cancel) = callbacks.on_cancel.as_mut() {
                        on_cancel(question, &answers);
                    }
                    // Re-enter the engine on the truncated remainder instead
                    // of rewinding in place; fresh answers win on name
                    // collisions when the maps merge.
                    let tail = questions.split_off(i.saturating_sub(1));
                    let rest = self.run_list(tail, callbacks)?;
                    for (name, value) in rest {
                        answers.insert(name, value);
                    }
                    return Ok(answers);
                }
                Ok(Reply::Signal(Signal::AdvanceSkip)) => {
                    i += 3;
                    continue;
                }
                Ok(Reply::Signal(Signal::Abort)) | Err(_) => {
                    // Permissive by inheritance: an abort or a renderer
                    // failure stores nothing and the loop moves on. Known
                    // hazard, kept deliberately.
                }
            }

            if quit {
                return Ok(answers);
            }
            i += 1;
        }

        Ok(answers)
    }
}
