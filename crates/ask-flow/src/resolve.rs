use serde_json::Value;

use crate::error::EngineError;
use crate::question::{Answers, Field, Kind, Question, ResolveCtx};

/// Evaluates the `kind` field, writing the result back onto the question.
///
/// Unlike every other field, a computed kind receives the *current* question
/// as context, and a `None` result marks the question as skipped.
pub fn resolve_kind(
    question: &mut Question,
    prev: Option<&Value>,
    answers: &Answers,
) -> Option<String> {
    let resolved = match &question.kind {
        Kind::Tag(tag) => return Some(tag.clone()),
        Kind::Skip => return None,
        Kind::Computed(compute) => {
            let ctx = ResolveCtx {
                prev,
                answers,
                question: Some(&*question),
            };
            compute(&ctx)
        }
    };
    match resolved {
        Some(tag) => {
            question.kind = Kind::Tag(tag.clone());
            Some(tag)
        }
        None => {
            question.kind = Kind::Skip;
            None
        }
    }
}

/// Resolves every remaining field in declaration order: `message`, `initial`,
/// `choices`, then the type-specific extras. Computed fields receive the
/// question resolved in the *previous* iteration as context, preserving
/// last-prompt continuity across skips.
///
/// Behavioral hooks (`validate`, `format`, `suggest`, `on_state`,
/// `on_render`) are separate struct fields and pass through untouched.
pub fn resolve_fields(
    question: &mut Question,
    prev: Option<&Value>,
    answers: &Answers,
    context: Option<&Question>,
) -> Result<(), EngineError> {
    let ctx = ResolveCtx {
        prev,
        answers,
        question: context,
    };

    if let Some(field) = question.message.as_mut() {
        resolve_field(field, &ctx);
    }
    if let Some(field) = question.initial.as_mut() {
        resolve_field(field, &ctx);
    }
    if let Some(field) = question.choices.as_mut() {
        resolve_field(field, &ctx);
    }
    for (_, field) in question.extras.iter_mut() {
        resolve_field(field, &ctx);
    }

    match &question.message {
        Some(Field::Literal(_)) => Ok(()),
        _ => Err(EngineError::MessageRequired {
            name: question.name.clone(),
        }),
    }
}

fn resolve_field<T>(field: &mut Field<T>, ctx: &ResolveCtx) {
    if let Field::Computed(compute) = field {
        let value = compute(ctx);
        *field = Field::Literal(value);
    }
}
