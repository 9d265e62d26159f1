//! Scribe - an in-process code-editing engine
//!
//! This crate provides the core of a code editor without any rendering:
//! a line-addressed text buffer with per-line markers, tree-sitter syntax
//! highlighting, a symbol outline, an external-analyzer lint coordinator
//! and a debounced completion pipeline, wired together in the Elm
//! Architecture pattern.

pub mod commands;
pub mod complete;
pub mod config;
pub mod config_paths;
pub mod exec;
pub mod lint;
pub mod messages;
pub mod model;
pub mod outline;
pub mod runtime;
pub mod syntax;
pub mod theme;
pub mod tracing;
pub mod update;
pub mod workdir;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::EditorConfig;
pub use messages::Msg;
pub use model::{Document, EditorModel};
pub use runtime::EditorSession;
pub use theme::Theme;
