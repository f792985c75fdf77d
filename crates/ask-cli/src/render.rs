use std::io::{self, BufRead, Write};

use ask_flow::{
    Choice, Question, Registry, RenderFailure, RenderResult, Renderer, Reply, Signal, Validation,
};
use regex::Regex;
use serde_json::{Number, Value, json};

/// Registers the full set of line-based renderers.
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register("text", TextPrompt);
    registry.register("password", TextPrompt);
    registry.register("number", NumberPrompt);
    registry.register("confirm", ConfirmPrompt);
    registry.register("toggle", TogglePrompt);
    registry.register("list", ListPrompt);
    registry.register("select", SelectPrompt);
    registry.register("multiselect", MultiselectPrompt);
    registry.register("autocomplete", AutocompletePrompt);
    registry.register("date", DatePrompt);
    registry
}

/// Maps the navigation keywords to their signals.
fn navigation(line: &str) -> Option<Signal> {
    match line.trim() {
        ":back" => Some(Signal::Retreat),
        ":skip" => Some(Signal::AdvanceSkip),
        ":quit" => Some(Signal::Abort),
        _ => None,
    }
}

/// Shared prompt loop: print the message, read one line, map navigation
/// keywords, parse, and re-prompt until the question's validator accepts.
/// An empty line falls back to the question's `initial` value.
fn ask<F>(question: &Question, hint: Option<String>, parse: F) -> RenderResult
where
    F: Fn(&str, &Question) -> Result<Value, String>,
{
    if let Some(on_render) = &question.on_render {
        on_render(question);
    }
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        show_prompt(question, hint.as_deref());
        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(err)) => return Err(RenderFailure::new(err.to_string())),
            None => return Err(RenderFailure::new("input closed")),
        };
        if let Some(signal) = navigation(&line) {
            return Ok(Reply::Signal(signal));
        }
        let trimmed = line.trim();
        let raw = if trimmed.is_empty()
            && let Some(initial) = question.initial_value()
        {
            initial.clone()
        } else {
            match parse(trimmed, question) {
                Ok(value) => value,
                Err(message) => {
                    println!("Invalid answer: {message}");
                    continue;
                }
            }
        };
        if let Some(validate) = &question.validate
            && let Validation::Invalid(message) = validate(&raw)
        {
            println!(
                "Invalid answer: {}",
                message.unwrap_or_else(|| "value rejected".to_string())
            );
            continue;
        }
        if let Some(on_state) = &question.on_state {
            on_state(&raw, false);
        }
        return Ok(Reply::Answer(raw));
    }
}

fn show_prompt(question: &Question, hint: Option<&str>) {
    let mut line = question.message_text().unwrap_or_default().to_string();
    if let Some(hint) = hint {
        line.push(' ');
        line.push_str(hint);
    }
    if let Some(initial) = question.initial_value() {
        line.push_str(&format!(" [{}]", display_value(initial)));
    }
    print!("{line} > ");
    let _ = io::stdout().flush();
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn extra_str<'a>(question: &'a Question, name: &str) -> Option<&'a str> {
    question.extra_value(name).and_then(Value::as_str)
}

/// Free-text entry. Also backs `password`; line mode cannot mask input, so
/// the two differ only in how callers treat the stored value.
struct TextPrompt;

impl Renderer for TextPrompt {
    fn render(&self, question: &Question) -> RenderResult {
        ask(question, None, |input, _| Ok(Value::String(input.into())))
    }
}

struct NumberPrompt;

impl Renderer for NumberPrompt {
    fn render(&self, question: &Question) -> RenderResult {
        ask(question, Some("(number)".into()), |input, _| {
            parse_number(input)
        })
    }
}

fn parse_number(input: &str) -> Result<Value, String> {
    if let Ok(int) = input.parse::<i64>() {
        return Ok(json!(int));
    }
    input
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| format!("'{input}' is not a number"))
}

struct ConfirmPrompt;

impl Renderer for ConfirmPrompt {
    fn render(&self, question: &Question) -> RenderResult {
        ask(question, Some("(y/n)".into()), |input, _| parse_bool(input))
    }
}

fn parse_bool(input: &str) -> Result<Value, String> {
    match input.to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Ok(Value::Bool(true)),
        "n" | "no" | "false" | "0" => Ok(Value::Bool(false)),
        _ => Err(format!("'{input}' is not yes or no")),
    }
}

/// Two-state switch labelled by the question's `active`/`inactive` extras.
struct TogglePrompt;

impl Renderer for TogglePrompt {
    fn render(&self, question: &Question) -> RenderResult {
        let active = extra_str(question, "active").unwrap_or("on").to_string();
        let inactive = extra_str(question, "inactive").unwrap_or("off").to_string();
        let hint = format!("({active}/{inactive})");
        ask(question, Some(hint), move |input, _| {
            if input.eq_ignore_ascii_case(&active) {
                Ok(Value::Bool(true))
            } else if input.eq_ignore_ascii_case(&inactive) {
                Ok(Value::Bool(false))
            } else {
                parse_bool(input)
            }
        })
    }
}

struct ListPrompt;

impl Renderer for ListPrompt {
    fn render(&self, question: &Question) -> RenderResult {
        ask(question, Some("(comma-separated)".into()), |input, _| {
            let items: Vec<Value> = input
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.into()))
                .collect();
            Ok(Value::Array(items))
        })
    }
}

struct SelectPrompt;

impl Renderer for SelectPrompt {
    fn render(&self, question: &Question) -> RenderResult {
        print_choices(question);
        ask(question, Some("(number or name)".into()), |input, question| {
            find_choice(question.choice_list(), input).map(Choice::answer)
        })
    }
}

struct MultiselectPrompt;

impl Renderer for MultiselectPrompt {
    fn render(&self, question: &Question) -> RenderResult {
        print_choices(question);
        ask(
            question,
            Some("(comma-separated numbers or names)".into()),
            |input, question| {
                let picked: Result<Vec<Value>, String> = input
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(|item| find_choice(question.choice_list(), item).map(Choice::answer))
                    .collect();
                picked.map(Value::Array)
            },
        )
    }
}

/// Narrows the choice list by substring, honoring the question's `suggest`
/// hook when one is declared. A single match answers; no match falls back to
/// the question's `fallback` extra.
struct AutocompletePrompt;

impl Renderer for AutocompletePrompt {
    fn render(&self, question: &Question) -> RenderResult {
        print_choices(question);
        ask(question, Some("(type to match)".into()), |input, question| {
            let matches = match &question.suggest {
                Some(suggest) => suggest(&Value::String(input.into()), question.choice_list()),
                None => filter_choices(question.choice_list(), input),
            };
            match matches.as_slice() {
                [only] => Ok(only.answer()),
                [] => question
                    .extra_value("fallback")
                    .cloned()
                    .ok_or_else(|| format!("no match for '{input}'")),
                several => {
                    let titles: Vec<&str> =
                        several.iter().map(|choice| choice.title.as_str()).collect();
                    Err(format!("ambiguous, matches: {}", titles.join(", ")))
                }
            }
        })
    }
}

fn filter_choices(choices: &[Choice], input: &str) -> Vec<Choice> {
    let needle = input.to_lowercase();
    choices
        .iter()
        .filter(|choice| choice.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

struct DatePrompt;

impl Renderer for DatePrompt {
    fn render(&self, question: &Question) -> RenderResult {
        ask(question, Some("(YYYY-MM-DD)".into()), |input, _| {
            parse_date(input)
        })
    }
}

fn parse_date(input: &str) -> Result<Value, String> {
    let pattern = Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").map_err(|err| err.to_string())?;
    let captures = pattern
        .captures(input)
        .ok_or_else(|| format!("'{input}' is not a YYYY-MM-DD date"))?;
    let month: u32 = captures[2].parse().map_err(|_| "bad month".to_string())?;
    let day: u32 = captures[3].parse().map_err(|_| "bad day".to_string())?;
    if !(1..=12).contains(&month) {
        return Err(format!("month {month} is out of range"));
    }
    if !(1..=31).contains(&day) {
        return Err(format!("day {day} is out of range"));
    }
    Ok(Value::String(input.into()))
}

fn print_choices(question: &Question) {
    for (index, choice) in question.choice_list().iter().enumerate() {
        let mut line = format!("  {}) {}", index + 1, choice.title);
        if let Some(description) = &choice.description {
            line.push_str(&format!(" - {description}"));
        }
        if choice.disabled {
            line.push_str(" (disabled)");
        }
        println!("{line}");
    }
}

fn find_choice<'a>(choices: &'a [Choice], input: &str) -> Result<&'a Choice, String> {
    let choice = if let Ok(index) = input.parse::<usize>() {
        choices
            .get(index.wrapping_sub(1))
            .ok_or_else(|| format!("no choice #{input}"))?
    } else {
        choices
            .iter()
            .find(|choice| choice.title.eq_ignore_ascii_case(input))
            .ok_or_else(|| format!("no choice named '{input}'"))?
    };
    if choice.disabled {
        return Err(format!("'{}' is disabled", choice.title));
    }
    Ok(choice)
}
