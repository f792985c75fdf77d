use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Value, json};

use ask_flow::question::{Answers, Choice, Kind, Question};
use ask_flow::resolve::{resolve_fields, resolve_kind};
use ask_flow::{Callbacks, Engine, EngineError, Registry, Reply};

fn answers_from(value: Value) -> Answers {
    value.as_object().cloned().unwrap_or_default()
}

#[test]
fn computed_message_sees_prior_answers() {
    let answers = answers_from(json!({ "name": "amy" }));
    let mut question = Question::new("text", "greeting").message_with(|ctx| {
        let name = ctx
            .answers
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("stranger");
        format!("Hello, {name}!")
    });

    resolve_fields(&mut question, None, &answers, None).unwrap();
    assert_eq!(question.message_text(), Some("Hello, amy!"));
}

#[test]
fn extras_resolve_in_declaration_order() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::clone(&order);
    let second = Rc::clone(&order);

    let mut question = Question::new("number", "age")
        .message("Age?")
        .extra_with("min", move |_ctx| {
            first.borrow_mut().push("min");
            json!(0)
        })
        .extra_with("max", move |_ctx| {
            second.borrow_mut().push("max");
            json!(120)
        });

    resolve_fields(&mut question, None, &Answers::new(), None).unwrap();

    assert_eq!(*order.borrow(), ["min", "max"]);
    assert_eq!(question.extra_value("min"), Some(&json!(0)));
    assert_eq!(question.extra_value("max"), Some(&json!(120)));
}

#[test]
fn computed_fields_receive_the_last_resolved_question() {
    let context = Question::new("text", "name").message("Name?");
    let mut question = Question::new("text", "echo").message("Echo?").extra_with(
        "previous_prompt",
        |ctx| json!(ctx.question.map(|q| q.name.clone()).unwrap_or_default()),
    );

    resolve_fields(&mut question, None, &Answers::new(), Some(&context)).unwrap();
    assert_eq!(question.extra_value("previous_prompt"), Some(&json!("name")));
}

#[test]
fn resolved_kind_is_written_back_once() {
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let mut question = Question::conditional("maybe", move |_ctx| {
        *counter.borrow_mut() += 1;
        Some("text".to_string())
    })
    .message("Maybe?");

    let answers = Answers::new();
    assert_eq!(resolve_kind(&mut question, None, &answers).as_deref(), Some("text"));
    assert!(matches!(question.kind, Kind::Tag(_)));

    // A second resolution reads the literal tag; the closure is gone.
    assert_eq!(resolve_kind(&mut question, None, &answers).as_deref(), Some("text"));
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn skipped_kind_is_written_back_as_skip() {
    let mut question = Question::conditional("never", |_ctx| None).message("Never?");
    assert_eq!(resolve_kind(&mut question, None, &Answers::new()), None);
    assert!(matches!(question.kind, Kind::Skip));
}

#[test]
fn computed_choices_resolve_from_answers() {
    let answers = answers_from(json!({ "fruits": ["apple", "pear"] }));
    let mut question = Question::new("select", "pick")
        .message("Pick one")
        .choices_with(|ctx| {
            ctx.answers
                .get("fruits")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(Choice::new)
                        .collect()
                })
                .unwrap_or_default()
        });

    resolve_fields(&mut question, None, &answers, None).unwrap();
    let titles: Vec<&str> = question
        .choice_list()
        .iter()
        .map(|choice| choice.title.as_str())
        .collect();
    assert_eq!(titles, ["apple", "pear"]);
}

#[test]
fn message_left_unresolved_is_an_error() {
    let mut question = Question::new("text", "nameless");
    let err = resolve_fields(&mut question, None, &Answers::new(), None).unwrap_err();
    assert!(matches!(err, EngineError::MessageRequired { .. }));
}

#[test]
fn repeated_names_keep_only_the_latest_answer() {
    let mut registry = Registry::new();
    let replies = RefCell::new(vec![json!("first"), json!("second")]);
    registry.register("text", move |_question: &Question| {
        Ok(Reply::Answer(replies.borrow_mut().remove(0)))
    });
    let mut engine = Engine::new(registry);

    let questions = vec![
        Question::new("text", "twin").message("Once?"),
        Question::new("text", "twin").message("Twice?"),
    ];
    let answers = engine.run(questions, Callbacks::new()).unwrap();

    assert_eq!(answers.len(), 1);
    assert_eq!(answers["twin"], json!("second"));
}
