use ask_flow::{Choice, Kind, Question, ResolveCtx, Validation};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// A declarative question script loaded from JSON.
#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub title: Option<String>,
    pub questions: Vec<ScriptQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct ScriptQuestion {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub initial: Option<Value>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Ask this question only when a prior answer matches.
    #[serde(default)]
    pub ask_if: Option<AskIf>,
    /// Regex the answer must match.
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    /// Toggle labels.
    #[serde(default)]
    pub active: Option<String>,
    #[serde(default)]
    pub inactive: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AskIf {
    pub name: String,
    /// Expected answer; when omitted, any truthy answer enables the question.
    #[serde(default)]
    pub equals: Option<Value>,
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("script must contain at least one question")]
    Empty,
    #[error("question '{name}' has an invalid pattern: {source}")]
    BadPattern { name: String, source: regex::Error },
}

impl Script {
    pub fn compile(self) -> Result<Vec<Question>, ScriptError> {
        if self.questions.is_empty() {
            return Err(ScriptError::Empty);
        }
        self.questions.into_iter().map(compile_question).collect()
    }
}

fn compile_question(spec: ScriptQuestion) -> Result<Question, ScriptError> {
    let mut question = Question::new(&spec.kind, &spec.name).message(&spec.message);

    if let Some(ask_if) = spec.ask_if {
        let tag = spec.kind.clone();
        question.kind = Kind::Computed(Box::new(move |ctx: &ResolveCtx| {
            let current = ctx.answers.get(&ask_if.name);
            let enabled = match (&ask_if.equals, current) {
                (Some(expected), Some(answer)) => answer == expected,
                (Some(_), None) => false,
                (None, Some(answer)) => truthy(answer),
                (None, None) => false,
            };
            enabled.then(|| tag.clone())
        }));
    }

    if let Some(initial) = spec.initial {
        question = question.initial(initial);
    }
    if !spec.choices.is_empty() {
        question = question.choices(spec.choices);
    }
    if let Some(active) = spec.active {
        question = question.extra("active", active);
    }
    if let Some(inactive) = spec.inactive {
        question = question.extra("inactive", inactive);
    }

    if let Some(pattern) = spec.pattern {
        let regex = Regex::new(&pattern).map_err(|source| ScriptError::BadPattern {
            name: spec.name.clone(),
            source,
        })?;
        question = question.validate(move |value| match value.as_str() {
            Some(text) if regex.is_match(text) => Validation::Valid,
            Some(_) => Validation::fail(format!("must match pattern {}", regex.as_str())),
            None => Validation::fail("expected text"),
        });
    }

    // Numeric bounds take precedence over a pattern if both are declared.
    if spec.min.is_some() || spec.max.is_some() {
        let (min, max) = (spec.min, spec.max);
        question = question.validate(move |value| {
            let Some(number) = value.as_f64() else {
                return Validation::fail("expected a number");
            };
            if let Some(min) = min
                && number < min
            {
                return Validation::fail(format!("must be at least {min}"));
            }
            if let Some(max) = max
                && number > max
            {
                return Validation::fail(format!("must be at most {max}"));
            }
            Validation::Valid
        });
    }

    Ok(question)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}
