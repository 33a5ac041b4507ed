//! toyforth - REPL and batch runner for the toyforth interpreter
//!
//! Usage:
//!   toyforth                  # Interactive REPL
//!   toyforth words.fs         # Run a file line by line, then exit
//!   toyforth -e "2 3 + ."     # Evaluate expressions, then exit
//!
//! Commands (REPL only):
//!   :quit, :q                 # Exit
//!   :stack                    # Show the data stack
//!   :words                    # List defined words
//!   :reset                    # Clear stack and unfinished definitions
//!   :help                     # Show help

mod commands;
mod config;

use clap::Parser as ClapParser;
use commands::{Command, HELP, Input};
use config::ReplConfig;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use std::fs;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::process;
use toyforth_core::Forth;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "toyforth")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Minimal Forth-like stack language interpreter", long_about = None)]
struct Args {
    /// Source file to run instead of starting the REPL
    file: Option<PathBuf>,

    /// Expression to evaluate (repeatable); runs before FILE
    #[arg(short, long = "eval", value_name = "EXPR")]
    eval: Vec<String>,

    /// Path to a TOML config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Don't load or save line history
    #[arg(long)]
    no_history: bool,

    /// Log interpreter activity to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match ReplConfig::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut forth = match Forth::with_config(io::stdout(), config.interpreter_config()) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error starting interpreter: {}", e);
            process::exit(1);
        }
    };

    for path in &config.preload {
        if let Err(e) = run_file(&mut forth, path) {
            eprintln!("{}", e);
            process::exit(1);
        }
        exit_if_halted(&forth);
    }

    for expr in &args.eval {
        if let Err(e) = forth.execute_line(expr) {
            eprintln!("{}", e);
            process::exit(1);
        }
        exit_if_halted(&forth);
    }

    if let Some(path) = &args.file {
        if let Err(e) = run_file(&mut forth, path) {
            eprintln!("{}", e);
            process::exit(1);
        }
        return;
    }

    if !args.eval.is_empty() {
        return;
    }

    let history = config.history && !args.no_history;
    repl_loop(&mut forth, &config.prompt, history);
}

/// Install the stderr subscriber; `RUST_LOG` overrides the default level
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("toyforth={level},toyforth_core={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// `BYE` ends the process successfully, wherever it ran
fn exit_if_halted(forth: &Forth<Stdout>) {
    if forth.is_halted() {
        debug!("BYE executed, exiting");
        process::exit(0);
    }
}

/// Execute a file line by line
///
/// Stops at the first error, reported as `path:line: message`. A definition,
/// comment or literal still open at end of file is an error too.
fn run_file(forth: &mut Forth<Stdout>, path: &Path) -> Result<(), String> {
    let source = fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {}", path.display(), e))?;
    info!(path = %path.display(), "running file");

    for (index, line) in source.lines().enumerate() {
        forth
            .execute_line(line)
            .map_err(|e| format!("{}:{}: {}", path.display(), index + 1, e))?;
        exit_if_halted(forth);
    }

    forth
        .finish()
        .map_err(|e| format!("{}: {}", path.display(), e))
}

/// Main REPL loop
fn repl_loop(forth: &mut Forth<Stdout>, prompt: &str, history: bool) {
    let mut rl: Editor<(), DefaultHistory> = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Error initializing readline: {}", e);
            process::exit(1);
        }
    };

    let history_file = if history { history_file_path() } else { None };
    if let Some(ref path) = history_file {
        let _ = rl.load_history(path);
    }

    println!("toyforth {}. Type :help for commands, BYE to exit.", env!("CARGO_PKG_VERSION"));

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let input = commands::classify(&line);
                if input != Input::Empty {
                    let _ = rl.add_history_entry(line.trim());
                }

                match input {
                    Input::Empty => {}
                    Input::Command(Command::Quit) => break,
                    Input::Command(Command::Help) => println!("{}", HELP),
                    Input::Command(Command::Stack) => println!("{}", commands::render_stack(forth)),
                    Input::Command(Command::Words) => println!("{}", commands::render_words(forth)),
                    Input::Command(Command::Reset) => {
                        forth.reset();
                        println!("Reset.");
                    }
                    Input::UnknownCommand(cmd) => {
                        println!("Unknown command: {}. Type :help for available commands.", cmd);
                    }
                    Input::Forth(text) => match forth.execute_line(text) {
                        Ok(()) if forth.is_halted() => break,
                        Ok(()) => println!("ok"),
                        Err(e) => println!("{}", e),
                    },
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(ref path) = history_file {
        let _ = rl.save_history(path);
    }
}

/// Get history file path
fn history_file_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("toyforth_history"))
}
