//! REPL meta-commands
//!
//! A line starting with `:` immediately followed by a letter (`:quit`,
//! `:stack`) is a shell command. Anything else, including `: NAME ...` and a
//! bare `:`, goes to the interpreter.

use toyforth_core::{Forth, format_cell};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Stack,
    Words,
    Reset,
}

/// One line of interactive input, classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Empty,
    Command(Command),
    UnknownCommand(&'a str),
    Forth(&'a str),
}

pub fn classify(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }

    let mut chars = trimmed.chars();
    let is_command =
        chars.next() == Some(':') && chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    if !is_command {
        return Input::Forth(trimmed);
    }

    match trimmed {
        ":quit" | ":q" => Input::Command(Command::Quit),
        ":help" | ":h" => Input::Command(Command::Help),
        ":stack" | ":s" => Input::Command(Command::Stack),
        ":words" | ":w" => Input::Command(Command::Words),
        ":reset" => Input::Command(Command::Reset),
        other => Input::UnknownCommand(other),
    }
}

/// `<depth> a b c`, rendered in the current BASE
pub fn render_stack<W: std::io::Write>(forth: &Forth<W>) -> String {
    let base = forth.memory().base();
    let mut text = format!("<{}>", forth.stack().len());
    for &cell in forth.stack().as_slice() {
        text.push(' ');
        text.push_str(&format_cell(cell, base));
    }
    text
}

/// Every word name on one line, sorted
pub fn render_words<W: std::io::Write>(forth: &Forth<W>) -> String {
    forth.dictionary().names().join(" ")
}

pub const HELP: &str = r#"
toyforth REPL commands:
  :quit, :q     Exit the REPL (BYE also exits)
  :help, :h     Show this help
  :stack, :s    Show the data stack, bottom first
  :words, :w    List every defined word
  :reset        Clear the stack and any unfinished definition

  A line starting with ':' and a letter is always a command. To run a word
  named like ':s' first on a line, put a comment before it: ( ) :s

Language:
  1 2 +  .      Numbers push, words run, . prints the top
  : SQ DUP * ;  Define a word (may span lines)
  ( ... )       Comment
  ." text"      Print text
  SEE SQ        Describe a word
  v a !  a @    Store / fetch memory cell a (0 holds BASE)
  HEX DECIMAL   Switch BASE

Examples:
  > 5 DUP * .
  25 ok
  > : SQUARE DUP * ;
  ok
  > HEX 255 .
  FF ok
"#;
