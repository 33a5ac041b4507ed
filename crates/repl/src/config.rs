//! Shell configuration
//!
//! Read from TOML. The file is looked up, in order, at the `--config` path,
//! at `$TOYFORTH_CONFIG`, and at `<config dir>/toyforth/config.toml`. Only an
//! explicitly named file has to exist; every key is optional.
//!
//! ```toml
//! prompt = "forth> "
//! history = true
//! max_depth = 512
//! preload = ["lib/words.fs"]
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use toyforth_core::InterpreterConfig;
use toyforth_core::config::DEFAULT_MAX_DEPTH;
use tracing::debug;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "TOYFORTH_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplConfig {
    /// Prompt shown before each interactive line
    pub prompt: String,
    /// Persist line history between sessions
    pub history: bool,
    /// Definition nesting limit handed to the interpreter
    pub max_depth: usize,
    /// Source files executed before the first prompt
    pub preload: Vec<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            prompt: "> ".to_string(),
            history: true,
            max_depth: DEFAULT_MAX_DEPTH,
            preload: Vec::new(),
        }
    }
}

impl ReplConfig {
    /// Parse configuration from a TOML string
    ///
    /// Values the interpreter would refuse, such as a `max_depth` outside
    /// `MIN_MAX_DEPTH..=MAX_MAX_DEPTH`, are rejected here.
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| format!("Failed to parse config: {}", e))?;
        config
            .interpreter_config()
            .validate()
            .map_err(|e| format!("Invalid config: {}", e))?;
        Ok(config)
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        Self::from_toml(&content).map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Resolve and load the effective configuration
    ///
    /// `explicit` (from `--config`) and `$TOYFORTH_CONFIG` must name readable
    /// files. The per-user default is used only if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self, String> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn interpreter_config(&self) -> InterpreterConfig {
        InterpreterConfig::new().with_max_depth(self.max_depth)
    }
}

/// `<config dir>/toyforth/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("toyforth").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use toyforth_core::config::{MAX_MAX_DEPTH, MIN_MAX_DEPTH};
    use tempfile::tempdir;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = ReplConfig::from_toml("").unwrap();
        assert_eq!(config, ReplConfig::default());
        assert_eq!(config.prompt, "> ");
        assert!(config.history);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = ReplConfig::from_toml(
            r#"
prompt = "forth> "
history = false
max_depth = 32
preload = ["a.fs", "b.fs"]
"#,
        )
        .unwrap();
        assert_eq!(config.prompt, "forth> ");
        assert!(!config.history);
        assert_eq!(config.max_depth, 32);
        assert_eq!(
            config.preload,
            vec![PathBuf::from("a.fs"), PathBuf::from("b.fs")]
        );
        assert_eq!(config.interpreter_config().max_depth, 32);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = ReplConfig::from_toml("promt = \"x\"").unwrap_err();
        assert!(err.contains("Failed to parse config"), "{}", err);
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        assert!(ReplConfig::from_toml("max_depth = \"deep\"").is_err());
    }

    #[test]
    fn test_max_depth_out_of_range_is_rejected() {
        for depth in [0, 1, MAX_MAX_DEPTH + 1, 100_000] {
            let err = ReplConfig::from_toml(&format!("max_depth = {}", depth)).unwrap_err();
            assert!(err.contains("Invalid config"), "{}", err);
            assert!(err.contains("max_depth"), "{}", err);
        }
    }

    #[test]
    fn test_max_depth_bounds_are_accepted() {
        for depth in [MIN_MAX_DEPTH, MAX_MAX_DEPTH] {
            let config = ReplConfig::from_toml(&format!("max_depth = {}", depth)).unwrap();
            assert_eq!(config.max_depth, depth);
        }
    }

    #[test]
    #[serial]
    fn test_load_rejects_bad_depth_with_path() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("deep.toml");
        fs::write(&path, "max_depth = 100000").unwrap();

        let err = ReplConfig::load(Some(&path)).unwrap_err();
        assert!(err.contains("deep.toml"), "{}", err);
        assert!(err.contains("Invalid config"), "{}", err);
    }

    #[test]
    #[serial]
    fn test_load_explicit_path() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "prompt = \"ok? \"").unwrap();

        let config = ReplConfig::load(Some(&path)).unwrap();
        assert_eq!(config.prompt, "ok? ");
    }

    #[test]
    #[serial]
    fn test_load_missing_explicit_path_fails() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nope.toml");
        let err = ReplConfig::load(Some(&path)).unwrap_err();
        assert!(err.contains("Failed to read config"), "{}", err);
    }

    #[test]
    #[serial]
    fn test_load_from_env_var() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("env.toml");
        fs::write(&path, "max_depth = 7").unwrap();

        let orig = std::env::var_os(CONFIG_ENV);
        // SAFETY: serialized with the other tests touching the environment
        unsafe {
            std::env::set_var(CONFIG_ENV, &path);
        }
        let result = ReplConfig::load(None);
        // SAFETY: restoring environment to original state
        unsafe {
            match orig {
                Some(v) => std::env::set_var(CONFIG_ENV, v),
                None => std::env::remove_var(CONFIG_ENV),
            }
        }

        assert_eq!(result.unwrap().max_depth, 7);
    }
}
