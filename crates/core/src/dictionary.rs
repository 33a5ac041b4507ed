//! Word dictionary
//!
//! Maps a word name to either a builtin (host code with a declared stack
//! effect) or a definition (the token sequence recorded between `:` and `;`).
//! There is one entry per name; defining a name again replaces the entry.
//!
//! Definitions hold raw tokens rather than resolved entries, so names inside a
//! body are looked up when the body is replayed, not when it was compiled.

use crate::builtins::{Arity, Builtin, Op};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// A dictionary entry
#[derive(Debug, Clone)]
pub enum Entry {
    /// Host-implemented word
    Builtin(Builtin),
    /// User word, replayed token by token on invocation
    Definition(Rc<[String]>),
}

impl Entry {
    /// Human-readable description, as written by `SEE`
    pub fn describe(&self, name: &str) -> String {
        match self {
            Entry::Builtin(builtin) => format!("{} {} builtin", name, builtin.arity()),
            Entry::Definition(body) if body.is_empty() => format!(": {} ;", name),
            Entry::Definition(body) => format!(": {} {} ;", name, body.join(" ")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashMap<String, Entry>,
}

impl Dictionary {
    /// An empty dictionary (no builtins)
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `name`
    pub fn define(&mut self, name: impl Into<String>, entry: Entry) {
        let name = name.into();
        let kind = match entry {
            Entry::Builtin(_) => "builtin",
            Entry::Definition(_) => "definition",
        };
        if self.words.insert(name.clone(), entry).is_some() {
            debug!(word = %name, kind, "redefined word");
        } else {
            debug!(word = %name, kind, "defined word");
        }
    }

    /// Register a host word with an explicit stack effect
    pub fn define_builtin(&mut self, name: impl Into<String>, arity: Arity, op: Op) {
        self.define(name, Entry::Builtin(Builtin::new(arity, op)));
    }

    /// Record a user definition
    pub fn define_tokens(&mut self, name: impl Into<String>, body: Vec<String>) {
        self.define(name, Entry::Definition(body.into()));
    }

    pub fn lookup(&self, name: &str) -> Option<&Entry> {
        self.words.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.words.contains_key(name)
    }

    /// All defined names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.words.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;
    use crate::error::Result;

    fn forty_two(_: &[Cell]) -> Result<Vec<Cell>> {
        Ok(vec![42])
    }

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_lookup_missing_is_none() {
        let dict = Dictionary::new();
        assert!(dict.lookup("NOPE").is_none());
        assert!(!dict.contains("NOPE"));
    }

    #[test]
    fn test_redefinition_replaces() {
        let mut dict = Dictionary::new();
        dict.define_tokens("X", tokens("1 2 +"));
        dict.define_tokens("X", tokens("3"));
        assert_eq!(dict.len(), 1);
        match dict.lookup("X") {
            Some(Entry::Definition(body)) => assert_eq!(&body[..], &["3".to_string()]),
            other => panic!("Expected definition, got {:?}", other),
        }
    }

    #[test]
    fn test_definition_can_replace_builtin() {
        let mut dict = Dictionary::new();
        dict.define_builtin("ANSWER", Arity::new(0, 1), Op::Pure(forty_two));
        dict.define_tokens("ANSWER", tokens("41"));
        assert!(matches!(dict.lookup("ANSWER"), Some(Entry::Definition(_))));
    }

    #[test]
    fn test_describe() {
        let mut dict = Dictionary::new();
        dict.define_builtin("ANSWER", Arity::new(0, 1), Op::Pure(forty_two));
        dict.define_tokens("DOUBLE", tokens("DUP +"));
        dict.define_tokens("NOTHING", Vec::new());

        let describe = |name: &str| dict.lookup(name).unwrap().describe(name);
        assert_eq!(describe("ANSWER"), "ANSWER ( 0 -- 1 ) builtin");
        assert_eq!(describe("DOUBLE"), ": DOUBLE DUP + ;");
        assert_eq!(describe("NOTHING"), ": NOTHING ;");
    }

    #[test]
    fn test_names_sorted() {
        let mut dict = Dictionary::new();
        dict.define_tokens("B", Vec::new());
        dict.define_tokens("A", Vec::new());
        dict.define_tokens("C", Vec::new());
        assert_eq!(dict.names(), vec!["A", "B", "C"]);
    }
}
