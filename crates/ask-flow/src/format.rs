use serde_json::Value;

use crate::question::{Answers, Question};

/// Applies a question's `validate` and `format` hooks to a raw answer.
///
/// Returns `None` when validation rejects the answer; rejection is silent
/// from the engine's perspective (nothing stored, no error raised). The
/// dispatch path calls this with `skip_validation` because renderers are
/// trusted to have validated interactively before returning; the override
/// path enforces validation.
pub fn formatted_answer(
    question: &Question,
    raw: Value,
    answers: &Answers,
    skip_validation: bool,
) -> Option<Value> {
    if !skip_validation
        && let Some(validate) = &question.validate
        && !validate(&raw).is_valid()
    {
        return None;
    }
    Some(match &question.format {
        Some(format) => format(&raw, answers),
        None => raw,
    })
}
