//! Engine configuration persistence
//!
//! Stores session preferences in `~/.config/scribe/config.yaml`.
//!
//! Configuration is an explicit value handed to the session at construction;
//! components receive the pieces they need as arguments and nothing reads
//! ambient global state.

use serde::{Deserialize, Serialize};

/// How completion requests are triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AutocompleteMode {
    /// Debounced trigger on identifier input
    #[default]
    Automatic,
    /// Only on an explicit request
    OnDemand,
    /// Never
    Disabled,
}

/// External analyzer invocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintConfig {
    /// Analyzer executable (e.g. "flake8")
    #[serde(default = "default_lint_program")]
    pub program: String,
    /// Rule-set arguments passed before the file path
    #[serde(default = "default_lint_args")]
    pub args: Vec<String>,
    /// Hard bound on a single analyzer run, in milliseconds
    #[serde(default = "default_lint_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_lint_program() -> String {
    "flake8".to_string()
}

fn default_lint_args() -> Vec<String> {
    vec!["--select=E9,F".to_string()]
}

fn default_lint_timeout_ms() -> u64 {
    10_000
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            program: default_lint_program(),
            args: default_lint_args(),
            timeout_ms: default_lint_timeout_ms(),
        }
    }
}

/// Completion backend invocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Backend executable; receives the artifact path, line and column
    /// as trailing arguments and prints a JSON candidate array on stdout
    #[serde(default = "default_completion_program")]
    pub program: String,
    /// Extra arguments passed before the positional ones
    #[serde(default)]
    pub args: Vec<String>,
    /// Hard bound on a single backend query, in milliseconds
    #[serde(default = "default_completion_timeout_ms")]
    pub timeout_ms: u64,
    /// Quiescent period after the last identifier keystroke
    #[serde(default = "default_completion_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_completion_program() -> String {
    "scribe-complete".to_string()
}

fn default_completion_timeout_ms() -> u64 {
    5_000
}

fn default_completion_debounce_ms() -> u64 {
    300
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            program: default_completion_program(),
            args: Vec::new(),
            timeout_ms: default_completion_timeout_ms(),
            debounce_ms: default_completion_debounce_ms(),
        }
    }
}

/// Engine configuration that persists across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Selected theme id (e.g., "dark", "light")
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Copy indentation (and deepen after block openers) on newline
    #[serde(default = "default_smart_indent")]
    pub smart_indent: bool,
    /// Completion trigger policy
    #[serde(default)]
    pub autocomplete: AutocompleteMode,
    /// Debounce delay for the symbol outline refresh
    #[serde(default = "default_symbols_debounce_ms")]
    pub symbols_debounce_ms: u64,
    #[serde(default)]
    pub lint: LintConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_smart_indent() -> bool {
    true
}

fn default_symbols_debounce_ms() -> u64 {
    200
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            smart_indent: default_smart_indent(),
            autocomplete: AutocompleteMode::default(),
            symbols_debounce_ms: default_symbols_debounce_ms(),
            lint: LintConfig::default(),
            completion: CompletionConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
