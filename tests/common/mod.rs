//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use scribe::config::EditorConfig;
use scribe::model::{Document, EditorModel};
use scribe::runtime::EditorSession;
use scribe::syntax::LanguageId;
use scribe::theme::Theme;

/// Create a model over a Python document with default config and theme
pub fn python_model(text: &str) -> EditorModel {
    EditorModel::new(
        Document::with_language(text, LanguageId::Python),
        EditorConfig::default(),
        Theme::default(),
    )
}

/// Create a session over a Python document with short debounce delays
pub fn python_session(text: &str) -> EditorSession {
    EditorSession::new(
        Document::with_language(text, LanguageId::Python),
        fast_config(),
        Theme::default(),
    )
}

/// Default config with debounce delays tightened for tests
pub fn fast_config() -> EditorConfig {
    let mut config = EditorConfig::default();
    config.symbols_debounce_ms = 20;
    config.completion.debounce_ms = 20;
    config
}

/// Pump a session's async messages until the predicate holds or the
/// timeout elapses. Returns whether the predicate held.
pub fn pump_until(
    session: &mut EditorSession,
    timeout: Duration,
    pred: impl Fn(&EditorModel) -> bool,
) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        session.drain_async();
        if pred(&session.model) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}
