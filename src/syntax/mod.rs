//! Syntax highlighting module
//!
//! Provides tree-sitter based syntax highlighting with:
//! - Language detection from file extensions
//! - Per-line lexical tokenization, recomputed on each highlight pass
//! - Theme application with a full-line error override span
//!
//! ## Architecture
//!
//! ```text
//! Document Edit → (caller requests visible lines)
//!              → Highlighter::highlight_line → tokens
//!              → styled_line(tokens, theme, error marker) → StyledSpans
//! ```
//!
//! Tokens are transient: nothing is cached between passes, which is
//! acceptable because a single line or visible block is cheap to retokenize.

mod highlights;
mod languages;
mod parser;

pub use highlights::{
    highlight_id_for_name, styled_line, HighlightId, StyledSpan, Token, HIGHLIGHT_NAMES,
};
pub use languages::LanguageId;
pub use parser::Highlighter;
