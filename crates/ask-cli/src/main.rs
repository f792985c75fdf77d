mod render;
mod script;

use std::fs;
use std::path::PathBuf;

use ask_flow::{Answers, Callbacks, Engine};
use clap::{Parser, Subcommand};
use render::default_registry;
use script::Script;
use serde_json::Value;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    version,
    about = "Line-based runner for question scripts",
    long_about = "Loads a declarative question script, walks it with the sequencing engine, \
and prints the collected answers as JSON. Type :back, :skip or :quit at any prompt to navigate."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a question script against the line renderers.
    Run {
        /// Path to the script JSON.
        #[arg(long, value_name = "SCRIPT")]
        script: PathBuf,
        /// JSON file of forced answers applied without prompting.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        /// Echo each answer as it is stored.
        #[arg(long)]
        verbose: bool,
    },
    /// List the renderer tags this binary supports.
    Tags,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            script,
            answers,
            verbose,
        } => run_script(script, answers, verbose),
        Command::Tags => {
            let registry = default_registry();
            for tag in registry.tags() {
                println!("{tag}");
            }
            Ok(())
        }
    }
}

fn run_script(script_path: PathBuf, answers_path: Option<PathBuf>, verbose: bool) -> CliResult<()> {
    let script: Script = serde_json::from_str(&fs::read_to_string(&script_path)?)?;
    let title = script.title.clone();
    let questions = script.compile()?;

    let mut engine = Engine::new(default_registry());
    if let Some(path) = answers_path {
        let forced: Answers = serde_json::from_str(&fs::read_to_string(&path)?)?;
        engine.override_answers(forced);
    }

    if let Some(title) = title {
        println!("{title}");
    }

    let callbacks = if verbose {
        Callbacks::new().on_submit(|question, answer, _answers| {
            println!("{} = {}", question.name, answer);
            false
        })
    } else {
        Callbacks::new()
    };

    let answers = engine.run(questions, callbacks)?;
    println!("{}", serde_json::to_string_pretty(&Value::Object(answers))?);
    Ok(())
}
