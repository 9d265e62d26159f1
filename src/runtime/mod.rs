//! Session runtime
//!
//! Wires the pure update core to its side effects: debounce timers,
//! background extraction, and the lint/completion worker slots.

mod session;

pub use session::EditorSession;
