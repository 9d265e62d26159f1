//! Symbol outline integration tests
//!
//! Fixtures from the engine contract: simple function extraction, the
//! never-throw guarantee on malformed source, and the debounced refresh
//! flow through a live session.

mod common;

use std::time::Duration;

use common::{pump_until, python_session};
use scribe::messages::{DocumentMsg, Msg};
use scribe::outline::{extract, SymbolKind};
use scribe::syntax::LanguageId;

#[test]
fn extracts_simple_function_with_line() {
    let outline = extract("def add(a, b):\n    return a+b\n", LanguageId::Python, 0);
    assert_eq!(outline.functions.len(), 1);
    assert_eq!(outline.functions[0].name, "add");
    assert_eq!(outline.functions[0].kind, SymbolKind::Function);
    assert_eq!(outline.functions[0].line_index, 0);
    assert!(outline.classes.is_empty());
}

#[test]
fn trailing_unmatched_paren_yields_empty_sequences() {
    let outline = extract("def add(a, b):\n    return a+b\n(", LanguageId::Python, 0);
    assert!(outline.functions.is_empty());
    assert!(outline.classes.is_empty());
}

#[test]
fn functions_and_classes_in_source_order() {
    let source = "\
def helper():
    pass

class Widget:
    def draw(self):
        pass

class Panel:
    pass

def main():
    pass
";
    let outline = extract(source, LanguageId::Python, 0);

    let fn_names: Vec<_> = outline.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fn_names, vec!["helper", "draw", "main"]);

    let class_names: Vec<_> = outline.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(class_names, vec!["Widget", "Panel"]);

    assert_eq!(outline.classes[0].line_index, 3);
    assert_eq!(outline.classes[1].line_index, 7);
}

#[test]
fn debounced_refresh_tracks_edits() {
    let mut session = python_session("def one():\n    pass\n");

    let ok = {
        // Initial outline arrives only after an edit schedules a refresh
        session.apply(Msg::Document(DocumentMsg::InsertText {
            offset: 20,
            text: "\ndef two():\n    pass\n".to_string(),
        }));
        pump_until(&mut session, Duration::from_secs(10), |model| {
            model
                .symbols
                .outline
                .as_ref()
                .is_some_and(|o| o.functions.len() == 2)
        })
    };
    assert!(ok, "outline never caught up with the edit");

    let outline = session.model.symbols.outline.as_ref().unwrap();
    assert_eq!(outline.revision, session.model.document.revision);
    session.shutdown();
}

#[test]
fn refresh_on_broken_buffer_clears_outline_content() {
    let mut session = python_session("def one():\n    pass\n");

    session.apply(Msg::Document(DocumentMsg::InsertText {
        offset: 0,
        text: "x\n".to_string(),
    }));
    assert!(pump_until(&mut session, Duration::from_secs(10), |model| {
        model.symbols.outline.is_some()
    }));

    // Break the syntax; the next refresh yields an empty outline rather
    // than an error
    session.apply(Msg::Document(DocumentMsg::InsertText {
        offset: 0,
        text: "(".to_string(),
    }));
    let ok = pump_until(&mut session, Duration::from_secs(10), |model| {
        model
            .symbols
            .outline
            .as_ref()
            .is_some_and(|o| o.is_empty() && o.revision == model.document.revision)
    });
    assert!(ok, "broken buffer never produced the empty outline");
    session.shutdown();
}
