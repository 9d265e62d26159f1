//! Outline extraction from tree-sitter parse trees
//!
//! Walks the parse tree in source order collecting function and class
//! definitions. A tree containing any syntax error yields the empty
//! outline: the source's all-or-nothing parser semantics, and the reason
//! a half-typed buffer never produces a half-wrong outline.

use tree_sitter::{Node, Parser};

use super::{SymbolEntry, SymbolKind, SymbolOutline};
use crate::syntax::LanguageId;

/// Extract the symbol outline from a full buffer snapshot.
///
/// Returns an empty outline for unsupported languages, on parser setup
/// failure, and whenever the parsed tree contains syntax errors.
pub fn extract(full_text: &str, language: LanguageId, revision: u64) -> SymbolOutline {
    let ts_lang: tree_sitter::Language = match language {
        LanguageId::Python => tree_sitter_python::LANGUAGE.into(),
        LanguageId::Rust => tree_sitter_rust::LANGUAGE.into(),
        LanguageId::PlainText => return SymbolOutline::empty(revision),
    };

    let mut parser = Parser::new();
    if parser.set_language(&ts_lang).is_err() {
        tracing::error!("Failed to set language for {:?}", language);
        return SymbolOutline::empty(revision);
    }

    let Some(tree) = parser.parse(full_text, None) else {
        tracing::debug!("Outline parse produced no tree for {:?}", language);
        return SymbolOutline::empty(revision);
    };

    let root = tree.root_node();
    if root.has_error() {
        tracing::debug!("Outline parse has syntax errors, returning empty outline");
        return SymbolOutline::empty(revision);
    }

    let mut outline = SymbolOutline::empty(revision);
    collect_symbols(root, full_text, language, &mut outline);
    outline
}

/// Recursive walk in tree order, which is source order
fn collect_symbols(node: Node, source: &str, language: LanguageId, outline: &mut SymbolOutline) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some((kind, name)) = classify_definition(&child, source, language) {
            let entry = SymbolEntry {
                name,
                kind,
                line_index: child.start_position().row,
            };
            match kind {
                SymbolKind::Function => outline.functions.push(entry),
                SymbolKind::Class => outline.classes.push(entry),
            }
        }
        collect_symbols(child, source, language, outline);
    }
}

/// Map a node to a symbol kind and name if it is a definition we track
fn classify_definition(
    node: &Node,
    source: &str,
    language: LanguageId,
) -> Option<(SymbolKind, String)> {
    let kind = match (language, node.kind()) {
        (LanguageId::Python, "function_definition") => SymbolKind::Function,
        (LanguageId::Python, "class_definition") => SymbolKind::Class,
        (LanguageId::Rust, "function_item") => SymbolKind::Function,
        (LanguageId::Rust, "struct_item")
        | (LanguageId::Rust, "enum_item")
        | (LanguageId::Rust, "trait_item") => SymbolKind::Class,
        _ => return None,
    };

    let name = node
        .child_by_field_name("name")?
        .utf8_text(source.as_bytes())
        .ok()?
        .to_string();

    Some((kind, name))
}
