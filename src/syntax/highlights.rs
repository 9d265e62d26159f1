//! Syntax highlighting data structures
//!
//! Defines tokens, styled spans, and the theme composition rule that lets
//! a lint error annotation override lexical styling for a whole line.

use crate::theme::Theme;

/// Standard tree-sitter capture names mapped to theme styles.
/// Index into this array is the HighlightId.
pub const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",             // @attribute
    "boolean",               // @boolean (true, false)
    "comment",               // @comment
    "constant",              // @constant
    "constant.builtin",      // @constant.builtin (None, null)
    "constructor",           // @constructor
    "escape",                // @escape (string escapes)
    "function",              // @function
    "function.builtin",      // @function.builtin (print, len)
    "function.method",       // @function.method
    "keyword",               // @keyword
    "label",                 // @label
    "number",                // @number
    "operator",              // @operator
    "property",              // @property
    "punctuation",           // @punctuation (general)
    "punctuation.bracket",   // @punctuation.bracket
    "punctuation.delimiter", // @punctuation.delimiter
    "punctuation.special",   // @punctuation.special
    "string",                // @string
    "string.special",        // @string.special (regex, f-string)
    "tag",                   // @tag
    "text",                  // @text
    "text.emphasis",         // @text.emphasis
    "text.strong",           // @text.strong
    "text.title",            // @text.title
    "text.uri",              // @text.uri
    "type",                  // @type
    "type.builtin",          // @type.builtin (int, str, bool)
    "variable",              // @variable
    "variable.builtin",      // @variable.builtin (self, cls)
    "variable.parameter",    // @variable.parameter
];

/// Index into HIGHLIGHT_NAMES
pub type HighlightId = u16;

/// A single highlighted span within a line
///
/// Transient: produced per highlighting pass and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Start column (0-indexed character offset, inclusive)
    pub start_col: usize,
    /// End column (exclusive)
    pub end_col: usize,
    /// Index into HIGHLIGHT_NAMES
    pub highlight: HighlightId,
}

impl Token {
    /// Span length in characters
    pub fn len(&self) -> usize {
        self.end_col.saturating_sub(self.start_col)
    }

    pub fn is_empty(&self) -> bool {
        self.end_col <= self.start_col
    }
}

/// A render-ready span: a column range with its resolved style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledSpan {
    pub start_col: usize,
    /// End column (exclusive)
    pub end_col: usize,
    pub style: crate::theme::Style,
}

/// Look up highlight ID by capture name
///
/// Handles hierarchical names: tries the exact match first, then
/// progressively shorter parents (e.g. "keyword.control.import" ->
/// "keyword.control" -> "keyword").
pub fn highlight_id_for_name(name: &str) -> Option<HighlightId> {
    let mut current = name;
    loop {
        if let Some(pos) = HIGHLIGHT_NAMES.iter().position(|&n| n == current) {
            return Some(pos as HighlightId);
        }

        let Some(dot_pos) = current.rfind('.') else {
            break;
        };
        current = &current[..dot_pos];
    }

    None
}

/// Compose the render-ready spans for one line.
///
/// Lexical tokens are mapped through the theme in order; a line with no
/// tokens (unknown language, or nothing the lexer recognized) becomes a
/// single plain-styled span covering the whole line. If the line carries
/// a non-empty error annotation, one error-styled span covering the full
/// line is appended last. Consumers apply spans in sequence, so the error
/// span wins over everything before it (last-applied-wins).
pub fn styled_line(
    line_text: &str,
    tokens: &[Token],
    theme: &Theme,
    error: Option<&str>,
) -> Vec<StyledSpan> {
    let line_len = line_text.chars().count();

    let mut spans: Vec<StyledSpan> = tokens
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| StyledSpan {
            start_col: t.start_col,
            end_col: t.end_col,
            style: theme.style_for(t.highlight),
        })
        .collect();

    if spans.is_empty() && line_len > 0 {
        spans.push(StyledSpan {
            start_col: 0,
            end_col: line_len,
            style: theme.plain,
        });
    }

    if error.is_some_and(|msg| !msg.is_empty()) {
        spans.push(StyledSpan {
            start_col: 0,
            end_col: line_len,
            style: theme.error,
        });
    }

    spans
}
