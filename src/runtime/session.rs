//! The editor session: owns the model, the message channel, the session
//! working directory and the two single-slot workers.
//!
//! One synchronous control flow (the embedding editor shell) calls
//! [`EditorSession::apply`] with edits and reads; commands returned by the
//! update layer are executed here, always off the calling thread: debounce
//! commands arm sleep-timer threads, run commands go to the worker slots.
//! Workers report back through the channel and [`EditorSession::drain_async`]
//! feeds their messages through the update layer.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use crate::commands::Cmd;
use crate::complete::{CompletionBackend, CompletionPipeline, ProcessBackend};
use crate::config::EditorConfig;
use crate::lint::{LintCoordinator, LintPhase};
use crate::messages::{Msg, SymbolsMsg};
use crate::model::{Document, EditorModel};
use crate::syntax::{styled_line, Highlighter, StyledSpan};
use crate::theme::Theme;
use crate::update::update;
use crate::workdir::WorkDir;

/// A live editing session over one document
pub struct EditorSession {
    pub model: EditorModel,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    lint: LintCoordinator,
    completion: CompletionPipeline,
    highlighter: Highlighter,
}

impl EditorSession {
    /// Create a session with the process-spawning completion backend
    pub fn new(document: Document, config: EditorConfig, theme: Theme) -> Self {
        let backend = Arc::new(ProcessBackend::new(config.completion.clone()));
        Self::with_backend(document, config, theme, backend)
    }

    /// Create a session with an explicit completion backend (embedders and
    /// tests substitute their own)
    pub fn with_backend(
        document: Document,
        config: EditorConfig,
        theme: Theme,
        backend: Arc<dyn CompletionBackend>,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();

        // Losing the working directory disables lint and completion, not
        // the session: both degrade per their failure contracts.
        let workdir = match WorkDir::new() {
            Ok(dir) => Some(Arc::new(dir)),
            Err(e) => {
                tracing::warn!("lint/completion unavailable: {}", e);
                None
            }
        };

        let lint = LintCoordinator::new(config.lint.clone(), workdir.clone(), msg_tx.clone());
        let completion = CompletionPipeline::new(backend, workdir, msg_tx.clone());

        Self {
            model: EditorModel::new(document, config, theme),
            msg_tx,
            msg_rx,
            lint,
            completion,
            highlighter: Highlighter::new(),
        }
    }

    /// A sender for feeding messages from external event sources
    pub fn sender(&self) -> Sender<Msg> {
        self.msg_tx.clone()
    }

    /// Run a message through the update layer and execute its commands
    pub fn apply(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            self.process_cmd(cmd);
        }
    }

    /// Process pending async messages from workers and timers.
    /// Returns the number of messages handled.
    pub fn drain_async(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            handled += 1;
            self.apply(msg);
        }
        handled
    }

    /// Execute a command, spawning async operations as needed
    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }

            Cmd::ScheduleSymbolRefresh { revision, delay_ms } => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    std::thread::sleep(Duration::from_millis(delay_ms));
                    let _ = tx.send(Msg::Symbols(SymbolsMsg::RefreshReady { revision }));
                });
            }

            Cmd::RunSymbolRefresh { revision, source } => {
                let tx = self.msg_tx.clone();
                let language = self.model.document.language;
                std::thread::spawn(move || {
                    let outline = crate::outline::extract(&source, language, revision);
                    let _ = tx.send(Msg::Symbols(SymbolsMsg::RefreshCompleted { outline }));
                });
            }

            Cmd::ScheduleCompletion {
                revision,
                line,
                column,
                delay_ms,
            } => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    std::thread::sleep(Duration::from_millis(delay_ms));
                    let _ = tx.send(Msg::Completion(
                        crate::messages::CompletionMsg::TriggerReady {
                            revision,
                            line,
                            column,
                        },
                    ));
                });
            }

            Cmd::RunCompletion {
                request_id,
                revision,
                source,
                line,
                column,
            } => {
                let suffix = self.model.document.language.artifact_suffix();
                self.completion
                    .request(request_id, revision, source, suffix, line, column);
            }

            Cmd::RunLint {
                request_id,
                snapshot,
            } => {
                let suffix = self.model.document.language.artifact_suffix();
                self.lint.submit(request_id, snapshot, suffix);
            }
        }
    }

    /// Render-ready style spans for a line: lexical tokens through the
    /// session theme, with the error override appended when the line
    /// carries an annotation
    pub fn styled_line(&mut self, line_index: usize) -> Vec<StyledSpan> {
        let text = self.model.document.line_text(line_index);
        let tokens = self
            .highlighter
            .highlight_line(&text, self.model.document.language);
        let error = self.model.document.error_annotation(line_index);
        styled_line(&text, &tokens, &self.model.theme, error)
    }

    /// Observable lint coordinator phase
    pub fn lint_phase(&self) -> LintPhase {
        self.lint.phase()
    }

    /// Cancel and join outstanding workers, then drop the working
    /// directory with all remaining artifacts
    pub fn shutdown(mut self) {
        self.lint.shutdown();
        self.completion.shutdown();
        // Timer threads still in their sleep hold only a Sender clone;
        // their sends fail harmlessly once the receiver is gone.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::DocumentMsg;
    use crate::syntax::LanguageId;
    use std::time::Instant;

    fn python_session(text: &str) -> EditorSession {
        let mut config = EditorConfig::default();
        config.symbols_debounce_ms = 20;
        config.completion.debounce_ms = 20;
        EditorSession::new(
            Document::with_language(text, LanguageId::Python),
            config,
            Theme::default(),
        )
    }

    fn pump_until(session: &mut EditorSession, timeout: Duration, pred: impl Fn(&EditorModel) -> bool) -> bool {
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

    #[test]
    fn test_edit_to_outline_flow() {
        let mut session = python_session("def first():\n    pass\n");
        session.apply(Msg::Document(DocumentMsg::InsertText {
            offset: 22,
            text: "def second():\n    pass\n".to_string(),
        }));

        let ok = pump_until(&mut session, Duration::from_secs(10), |model| {
            model
                .symbols
                .outline
                .as_ref()
                .is_some_and(|o| o.functions.len() == 2)
        });
        assert!(ok, "outline never refreshed");

        let outline = session.model.symbols.outline.as_ref().unwrap();
        assert_eq!(outline.functions[0].name, "first");
        assert_eq!(outline.functions[1].name, "second");
        session.shutdown();
    }

    #[test]
    fn test_styled_line_with_error_override() {
        let mut session = python_session("def f():\n    pass\n");
        session
            .model
            .document
            .set_error_annotations(&[(0, "E999 SyntaxError".to_string())]);

        let spans = session.styled_line(0);
        assert!(!spans.is_empty());
        let last = spans.last().unwrap();
        assert_eq!(last.style, session.model.theme.error);
        assert_eq!(last.end_col, "def f():".chars().count());
    }

    #[test]
    fn test_highlight_idempotent_through_session() {
        let mut session = python_session("x = \"hi\"\n");
        let a = session.styled_line(0);
        let b = session.styled_line(0);
        assert_eq!(a, b);
    }
}
