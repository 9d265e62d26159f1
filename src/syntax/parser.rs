//! Tree-sitter tokenization for per-line highlighting
//!
//! Holds one parser and compiled highlight query per language. Each call
//! parses the given line text from scratch; tokens are transient and no
//! parse state survives between calls.

use std::collections::HashMap;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

use super::highlights::{highlight_id_for_name, Token};
use super::languages::LanguageId;

const PYTHON_HIGHLIGHTS: &str = tree_sitter_python::HIGHLIGHTS_QUERY;
const RUST_HIGHLIGHTS: &str = tree_sitter_rust::HIGHLIGHTS_QUERY;

/// Per-language parser and query state (tree-sitter parsers are !Sync)
pub struct Highlighter {
    /// Parser instances per language
    parsers: HashMap<LanguageId, Parser>,
    /// Compiled queries per language
    queries: HashMap<LanguageId, Query>,
}

impl Highlighter {
    /// Create a new highlighter with all supported languages initialized
    pub fn new() -> Self {
        let mut state = Self {
            parsers: HashMap::new(),
            queries: HashMap::new(),
        };

        state.init_language(LanguageId::Python);
        state.init_language(LanguageId::Rust);

        state
    }

    /// Initialize a language's parser and query
    fn init_language(&mut self, lang: LanguageId) {
        let (ts_lang, highlights_scm): (tree_sitter::Language, &str) = match lang {
            LanguageId::Python => (tree_sitter_python::LANGUAGE.into(), PYTHON_HIGHLIGHTS),
            LanguageId::Rust => (tree_sitter_rust::LANGUAGE.into(), RUST_HIGHLIGHTS),
            // No highlighting for plain text
            LanguageId::PlainText => return,
        };

        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&ts_lang) {
            tracing::error!("Failed to set language for {:?}: {}", lang, e);
            return;
        }
        self.parsers.insert(lang, parser);

        match Query::new(&ts_lang, highlights_scm) {
            Ok(query) => {
                self.queries.insert(lang, query);
            }
            Err(e) => {
                tracing::error!("Failed to compile query for {:?}: {:?}", lang, e);
            }
        }
    }

    /// Tokenize a single line of text.
    ///
    /// Unknown or unhighlighted languages yield an empty token list, which
    /// the caller styles as one plain-text span covering the whole line.
    /// A line the grammar cannot fully make sense of still yields tokens
    /// for whatever the lexer recognized; tokenization never fails.
    pub fn highlight_line(&mut self, line_text: &str, language: LanguageId) -> Vec<Token> {
        if !language.has_highlighting() {
            return Vec::new();
        }

        let (Some(parser), Some(query)) = (
            self.parsers.get_mut(&language),
            self.queries.get(&language),
        ) else {
            tracing::warn!("No parser for language {:?}", language);
            return Vec::new();
        };

        let Some(tree) = parser.parse(line_text, None) else {
            tracing::debug!("Tokenization produced no tree for {:?}", language);
            return Vec::new();
        };

        let mut tokens = Vec::new();
        let mut cursor = QueryCursor::new();
        let source_bytes = line_text.as_bytes();

        let mut captures = cursor.captures(query, tree.root_node(), source_bytes);
        while let Some((query_match, capture_idx)) = captures.next() {
            let capture = &query_match.captures[*capture_idx];
            let capture_name = &query.capture_names()[capture.index as usize];

            let Some(highlight_id) = highlight_id_for_name(capture_name) else {
                continue; // Skip unknown captures
            };

            let node = capture.node;
            let start = node.start_position();
            let end = node.end_position();

            // Only the first row matters: the input is a single line, so
            // anything the grammar spreads further is clamped to it.
            if start.row > 0 {
                continue;
            }
            let end_byte = if end.row > 0 {
                line_text.len()
            } else {
                end.column
            };

            let start_char = byte_to_char_col(line_text, start.column);
            let end_char = byte_to_char_col(line_text, end_byte);

            if start_char < end_char {
                tokens.push(Token {
                    start_col: start_char,
                    end_col: end_char,
                    highlight: highlight_id,
                });
            }
        }

        tokens.sort_by_key(|t| (t.start_col, t.end_col));
        tokens.dedup();
        tokens
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a byte column to a character column on a line.
/// Tree-sitter positions are in bytes, but spans use character indices.
fn byte_to_char_col(line: &str, byte_col: usize) -> usize {
    let byte_col = byte_col.min(line.len());
    // Find the nearest valid char boundary at or before byte_col
    let mut valid_byte = byte_col;
    while valid_byte > 0 && !line.is_char_boundary(valid_byte) {
        valid_byte -= 1;
    }
    line[..valid_byte].chars().count()
}
