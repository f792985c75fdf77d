use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Insertion-ordered mapping from question name to final answer.
pub type Answers = serde_json::Map<String, Value>;

/// Context handed to computed fields while they resolve.
///
/// `question` is the current question when resolving `kind`, and the
/// previously fully-resolved question for every other field.
pub struct ResolveCtx<'a> {
    pub prev: Option<&'a Value>,
    pub answers: &'a Answers,
    pub question: Option<&'a Question>,
}

pub type ComputedFn<T> = Box<dyn Fn(&ResolveCtx) -> T>;

/// A question field: either a concrete value or a function of prior state.
///
/// The resolver replaces `Computed` variants with `Literal` in place, so a
/// resolved question is the same record that later flows into dispatch and
/// lifecycle callbacks.
pub enum Field<T> {
    Literal(T),
    Computed(ComputedFn<T>),
}

impl<T> Field<T> {
    pub fn computed(compute: impl Fn(&ResolveCtx) -> T + 'static) -> Self {
        Field::Computed(Box::new(compute))
    }

    /// The concrete value, if this field has been resolved.
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Field::Literal(value) => Some(value),
            Field::Computed(_) => None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Field::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// The `type` field of a question, resolved first and independently.
///
/// A computed kind returning `None` skips the question entirely: no dispatch,
/// no stored answer, the cursor just moves past it.
pub enum Kind {
    Tag(String),
    Skip,
    Computed(ComputedFn<Option<String>>),
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            Kind::Skip => f.write_str("Skip"),
            Kind::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Outcome of a `validate` hook. Anything other than `Valid` is a rejection;
/// the optional message is renderer-facing re-prompt text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(Option<String>),
}

impl Validation {
    pub fn fail(message: impl Into<String>) -> Self {
        Validation::Invalid(Some(message.into()))
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }
}

impl From<bool> for Validation {
    fn from(valid: bool) -> Self {
        if valid {
            Validation::Valid
        } else {
            Validation::Invalid(None)
        }
    }
}

pub type ValidateFn = Box<dyn Fn(&Value) -> Validation>;
pub type FormatFn = Box<dyn Fn(&Value, &Answers) -> Value>;
pub type SuggestFn = Box<dyn Fn(&Value, &[Choice]) -> Vec<Choice>>;
pub type StateFn = Box<dyn Fn(&Value, bool)>;
pub type RenderHookFn = Box<dyn Fn(&Question)>;

/// One selectable option for select/multiselect/autocomplete questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

impl Choice {
    pub fn new(title: impl Into<String>) -> Self {
        Choice {
            title: title.into(),
            value: None,
            description: None,
            disabled: false,
        }
    }

    pub fn with_value(title: impl Into<String>, value: impl Into<Value>) -> Self {
        Choice {
            title: title.into(),
            value: Some(value.into()),
            description: None,
            disabled: false,
        }
    }

    /// The stored answer for this choice: its value, or its title when no
    /// explicit value was declared.
    pub fn answer(&self) -> Value {
        self.value
            .clone()
            .unwrap_or_else(|| Value::String(self.title.clone()))
    }
}

/// One declarative unit describing a single interactive request.
///
/// `validate`, `format`, `suggest`, `on_state` and `on_render` are behavioral
/// hooks handed through to the renderer verbatim; they are never part of the
/// resolvable field set.
pub struct Question {
    pub name: String,
    pub kind: Kind,
    pub message: Option<Field<String>>,
    pub initial: Option<Field<Value>>,
    pub choices: Option<Field<Vec<Choice>>>,
    /// Type-specific fields (`min`, `active`, `limit`, ...) resolved in
    /// declaration order.
    pub extras: Vec<(String, Field<Value>)>,
    pub validate: Option<ValidateFn>,
    pub format: Option<FormatFn>,
    pub suggest: Option<SuggestFn>,
    pub on_state: Option<StateFn>,
    pub on_render: Option<RenderHookFn>,
}

impl Question {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Question {
            name: name.into(),
            kind: Kind::Tag(kind.into()),
            message: None,
            initial: None,
            choices: None,
            extras: Vec::new(),
            validate: None,
            format: None,
            suggest: None,
            on_state: None,
            on_render: None,
        }
    }

    /// A question whose kind is a function of prior answers; returning `None`
    /// skips the question.
    pub fn conditional(
        name: impl Into<String>,
        kind: impl Fn(&ResolveCtx) -> Option<String> + 'static,
    ) -> Self {
        let mut question = Question::new("", name);
        question.kind = Kind::Computed(Box::new(kind));
        question
    }

    pub fn message(mut self, text: impl Into<String>) -> Self {
        self.message = Some(Field::Literal(text.into()));
        self
    }

    pub fn message_with(mut self, compute: impl Fn(&ResolveCtx) -> String + 'static) -> Self {
        self.message = Some(Field::computed(compute));
        self
    }

    pub fn initial(mut self, value: impl Into<Value>) -> Self {
        self.initial = Some(Field::Literal(value.into()));
        self
    }

    pub fn initial_with(mut self, compute: impl Fn(&ResolveCtx) -> Value + 'static) -> Self {
        self.initial = Some(Field::computed(compute));
        self
    }

    pub fn choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = Some(Field::Literal(choices));
        self
    }

    pub fn choices_with(mut self, compute: impl Fn(&ResolveCtx) -> Vec<Choice> + 'static) -> Self {
        self.choices = Some(Field::computed(compute));
        self
    }

    pub fn extra(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extras
            .push((name.into(), Field::Literal(value.into())));
        self
    }

    pub fn extra_with(
        mut self,
        name: impl Into<String>,
        compute: impl Fn(&ResolveCtx) -> Value + 'static,
    ) -> Self {
        self.extras.push((name.into(), Field::computed(compute)));
        self
    }

    pub fn validate(mut self, validate: impl Fn(&Value) -> Validation + 'static) -> Self {
        self.validate = Some(Box::new(validate));
        self
    }

    pub fn format(mut self, format: impl Fn(&Value, &Answers) -> Value + 'static) -> Self {
        self.format = Some(Box::new(format));
        self
    }

    pub fn suggest(mut self, suggest: impl Fn(&Value, &[Choice]) -> Vec<Choice> + 'static) -> Self {
        self.suggest = Some(Box::new(suggest));
        self
    }

    pub fn on_state(mut self, hook: impl Fn(&Value, bool) + 'static) -> Self {
        self.on_state = Some(Box::new(hook));
        self
    }

    pub fn on_render(mut self, hook: impl Fn(&Question) + 'static) -> Self {
        self.on_render = Some(Box::new(hook));
        self
    }

    /// The resolved type tag, if any.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            Kind::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    /// The resolved message text. Present on every question that reached
    /// dispatch; absence after resolution is a fatal configuration error.
    pub fn message_text(&self) -> Option<&str> {
        self.message
            .as_ref()
            .and_then(Field::resolved)
            .map(String::as_str)
    }

    pub fn initial_value(&self) -> Option<&Value> {
        self.initial.as_ref().and_then(Field::resolved)
    }

    pub fn choice_list(&self) -> &[Choice] {
        self.choices
            .as_ref()
            .and_then(Field::resolved)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn extra_value(&self, name: &str) -> Option<&Value> {
        self.extras
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, field)| field.resolved())
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl From<Question> for Vec<Question> {
    fn from(question: Question) -> Self {
        vec![question]
    }
}
