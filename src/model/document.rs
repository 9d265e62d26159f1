//! Document model - the text buffer and per-line marker state
//!
//! The buffer is a rope; markers (breakpoint, bookmark, error annotation)
//! live in a parallel list of per-line records carrying a stable [`LineId`]
//! handle assigned at line creation. Edits re-key that list so a marker
//! stays attached to the content it was set on, no matter how many lines
//! are inserted or removed above it. Index-based accessors are a derived
//! view for rendering and for index-addressed UI events (gutter clicks).

use ropey::Rope;

use crate::syntax::LanguageId;

/// Stable identity of a buffer line, assigned at line creation.
///
/// Never reused within a session; survives renumbering caused by edits
/// elsewhere in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub u64);

/// Marker kinds toggled by external line-addressed events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Breakpoint,
    Bookmark,
}

/// Per-line marker record, keyed by stable line identity
#[derive(Debug, Clone)]
struct LineMeta {
    id: LineId,
    breakpoint: bool,
    bookmark: bool,
    /// Lint error annotation; written only by the lint result path
    error: Option<String>,
}

impl LineMeta {
    fn new(id: LineId) -> Self {
        Self {
            id,
            breakpoint: false,
            bookmark: false,
            error: None,
        }
    }
}

/// Derived per-line view handed to renderers and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Line text without the trailing newline
    pub text: String,
    pub has_breakpoint: bool,
    pub has_bookmark: bool,
    pub error: Option<String>,
}

/// Document state - the text buffer and associated marker records
#[derive(Debug, Clone)]
pub struct Document {
    /// The text buffer
    pub buffer: Rope,
    /// One record per buffer line; always `len() == buffer.len_lines()`
    line_meta: Vec<LineMeta>,
    /// Source of fresh line ids
    next_line_id: u64,
    /// Language for highlighting and symbol extraction
    pub language: LanguageId,
    /// Document revision counter (incremented on each edit)
    /// Used for staleness checking of lint, completion and outline results
    pub revision: u64,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Create a document with initial text
    pub fn with_text(text: &str) -> Self {
        let buffer = Rope::from(text);
        let mut next_line_id = 0u64;
        let line_meta = (0..buffer.len_lines())
            .map(|_| {
                let id = LineId(next_line_id);
                next_line_id += 1;
                LineMeta::new(id)
            })
            .collect();
        Self {
            buffer,
            line_meta,
            next_line_id,
            language: LanguageId::default(),
            revision: 0,
        }
    }

    /// Create a document with initial text and language
    pub fn with_language(text: &str, language: LanguageId) -> Self {
        let mut doc = Self::with_text(text);
        doc.language = language;
        doc
    }

    fn fresh_meta(&mut self) -> LineMeta {
        let id = LineId(self.next_line_id);
        self.next_line_id += 1;
        LineMeta::new(id)
    }

    fn assert_meta_in_sync(&self) {
        debug_assert_eq!(
            self.line_meta.len(),
            self.buffer.len_lines(),
            "line meta out of sync with buffer"
        );
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// Get the number of lines in the document
    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Get the full buffer content (the snapshot handed to analysis workers)
    pub fn full_text(&self) -> String {
        self.buffer.to_string()
    }

    /// Get the derived view of a line, or None if out of range
    pub fn get_line(&self, line_index: usize) -> Option<Line> {
        if line_index >= self.buffer.len_lines() {
            return None;
        }
        let meta = &self.line_meta[line_index];
        Some(Line {
            text: self.line_text(line_index),
            has_breakpoint: meta.breakpoint,
            has_bookmark: meta.bookmark,
            error: meta.error.clone(),
        })
    }

    /// Line text without the trailing newline
    pub fn line_text(&self, line_index: usize) -> String {
        if line_index >= self.buffer.len_lines() {
            return String::new();
        }
        let line = self.buffer.line(line_index);
        let len = line.len_chars();
        let trim = if len > 0 && line.char(len - 1) == '\n' {
            if len > 1 && line.char(len - 2) == '\r' {
                2
            } else {
                1
            }
        } else {
            0
        };
        line.slice(..len - trim).to_string()
    }

    /// Stable identity of a line, or None if out of range
    pub fn line_id(&self, line_index: usize) -> Option<LineId> {
        self.line_meta.get(line_index).map(|m| m.id)
    }

    /// Current index of the line with the given identity, if it still exists
    pub fn index_of(&self, id: LineId) -> Option<usize> {
        self.line_meta.iter().position(|m| m.id == id)
    }

    /// Convert a (line, column) position to a char offset in the buffer
    pub fn position_to_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.buffer.len_lines() {
            return self.buffer.len_chars();
        }
        let line_start = self.buffer.line_to_char(line);
        let line_len = self.line_text(line).chars().count();
        line_start + column.min(line_len)
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Insert text at a char offset. Always succeeds; the offset is clamped
    /// to the buffer length.
    pub fn insert_text(&mut self, at_offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let offset = at_offset.min(self.buffer.len_chars());
        let line = self.buffer.char_to_line(offset);
        let column = offset - self.buffer.line_to_char(line);

        let lines_before = self.buffer.len_lines();
        self.buffer.insert(offset, text);
        let added = self.buffer.len_lines() - lines_before;

        if added > 0 {
            // Fresh metas for the newly created lines. The fragment carrying
            // the original line's leading content keeps that line's record:
            // an insertion at column 0 pushes the whole line down (fresh
            // metas go above), a mid-line insertion splits it (fresh metas
            // go below).
            let insert_at = if column == 0 { line } else { line + 1 };
            for i in 0..added {
                let meta = self.fresh_meta();
                self.line_meta.insert(insert_at + i, meta);
            }
        }

        self.revision = self.revision.wrapping_add(1);
        self.assert_meta_in_sync();
    }

    /// Delete the char range `start..end`. Always succeeds; the range is
    /// clamped and normalized.
    pub fn delete_range(&mut self, start: usize, end: usize) {
        let len = self.buffer.len_chars();
        let (start, end) = (start.min(end).min(len), end.max(start).min(len));
        if start == end {
            return;
        }

        let start_line = self.buffer.char_to_line(start);
        let start_col = start - self.buffer.line_to_char(start_line);
        let end_line = self.buffer.char_to_line(end);
        let removed = end_line - start_line;

        self.buffer.remove(start..end);

        if removed > 0 {
            // The merged line keeps the record of whichever original line
            // contributes its leading content: the first line when the
            // deletion started mid-line, the last line when the deletion
            // consumed the first line from column 0.
            if start_col > 0 {
                self.line_meta.drain(start_line + 1..=end_line);
            } else {
                self.line_meta.drain(start_line..end_line);
            }
        }

        self.revision = self.revision.wrapping_add(1);
        self.assert_meta_in_sync();
    }

    /// Insert a newline at the offset, optionally carrying the current
    /// line's indentation (plus one level after a block opener).
    ///
    /// Returns the number of chars inserted so the caller can advance its
    /// cursor.
    pub fn insert_newline_with_indent(&mut self, at_offset: usize, smart: bool) -> usize {
        if !smart {
            self.insert_text(at_offset, "\n");
            return 1;
        }

        let offset = at_offset.min(self.buffer.len_chars());
        let line = self.buffer.char_to_line(offset);
        let text = self.line_text(line);

        let mut indent: String = text
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();
        let trimmed = text.trim_end();
        if trimmed.ends_with(':') || trimmed.ends_with('{') {
            indent.push_str("    ");
        }

        let inserted = format!("\n{}", indent);
        let count = inserted.chars().count();
        self.insert_text(offset, &inserted);
        count
    }

    // ========================================================================
    // Markers
    // ========================================================================

    /// Set a marker on a line. Out-of-range indices are a silent no-op: UI
    /// events race against buffer state and a late click must not error.
    pub fn set_marker(&mut self, line_index: usize, kind: MarkerKind, value: bool) {
        let Some(meta) = self.line_meta.get_mut(line_index) else {
            tracing::debug!("set_marker: line {} out of range, ignoring", line_index);
            return;
        };
        match kind {
            MarkerKind::Breakpoint => meta.breakpoint = value,
            MarkerKind::Bookmark => meta.bookmark = value,
        }
    }

    /// Toggle a marker on a line. Out-of-range indices are a silent no-op.
    pub fn toggle_marker(&mut self, line_index: usize, kind: MarkerKind) {
        let Some(meta) = self.line_meta.get_mut(line_index) else {
            tracing::debug!("toggle_marker: line {} out of range, ignoring", line_index);
            return;
        };
        match kind {
            MarkerKind::Breakpoint => meta.breakpoint = !meta.breakpoint,
            MarkerKind::Bookmark => meta.bookmark = !meta.bookmark,
        }
    }

    /// Indices of all lines carrying a breakpoint (derived view for gutters)
    pub fn breakpoint_lines(&self) -> Vec<usize> {
        self.line_meta
            .iter()
            .enumerate()
            .filter(|(_, m)| m.breakpoint)
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of all lines carrying a bookmark
    pub fn bookmark_lines(&self) -> Vec<usize> {
        self.line_meta
            .iter()
            .enumerate()
            .filter(|(_, m)| m.bookmark)
            .map(|(i, _)| i)
            .collect()
    }

    // ========================================================================
    // Error annotations (lint result application only)
    // ========================================================================

    /// Replace all error annotations wholesale with the given
    /// (line_index, message) pairs. Out-of-range pairs are skipped.
    pub fn set_error_annotations(&mut self, annotations: &[(usize, String)]) {
        for meta in &mut self.line_meta {
            meta.error = None;
        }
        for (line_index, message) in annotations {
            match self.line_meta.get_mut(*line_index) {
                Some(meta) => meta.error = Some(message.clone()),
                None => tracing::debug!(
                    "error annotation for line {} out of range, skipping",
                    line_index
                ),
            }
        }
    }

    /// Clear all error annotations
    pub fn clear_error_annotations(&mut self) {
        for meta in &mut self.line_meta {
            meta.error = None;
        }
    }

    /// The error annotation on a line, if any
    pub fn error_annotation(&self, line_index: usize) -> Option<&str> {
        self.line_meta
            .get(line_index)
            .and_then(|m| m.error.as_deref())
    }

    /// All (line_index, message) error annotations in line order
    pub fn error_annotations(&self) -> Vec<(usize, String)> {
        self.line_meta
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.error.as_ref().map(|e| (i, e.clone())))
            .collect()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Creation and reading
    // ========================================================================

    #[test]
    fn test_empty_document_has_one_line() {
        let doc = Document::new();
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.full_text(), "");
    }

    #[test]
    fn test_with_text_line_count() {
        let doc = Document::with_text("line1\nline2\nline3");
        assert_eq!(doc.line_count(), 3);
    }

    #[test]
    fn test_get_line_strips_newline() {
        let doc = Document::with_text("first\nsecond");
        assert_eq!(doc.get_line(0).unwrap().text, "first");
        assert_eq!(doc.get_line(1).unwrap().text, "second");
    }

    #[test]
    fn test_get_line_out_of_range() {
        let doc = Document::with_text("only");
        assert!(doc.get_line(5).is_none());
    }

    #[test]
    fn test_line_ids_unique() {
        let doc = Document::with_text("a\nb\nc");
        let ids: Vec<_> = (0..3).map(|i| doc.line_id(i).unwrap()).collect();
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
    }

    // ========================================================================
    // Editing
    // ========================================================================

    #[test]
    fn test_insert_text_bumps_revision() {
        let mut doc = Document::with_text("hello");
        let rev = doc.revision;
        doc.insert_text(0, "x");
        assert_eq!(doc.revision, rev + 1);
    }

    #[test]
    fn test_insert_past_end_clamps() {
        let mut doc = Document::with_text("ab");
        doc.insert_text(999, "c");
        assert_eq!(doc.full_text(), "abc");
    }

    #[test]
    fn test_delete_range_normalizes_and_clamps() {
        let mut doc = Document::with_text("hello");
        doc.delete_range(4, 2);
        assert_eq!(doc.full_text(), "heo");
        doc.delete_range(1, 999);
        assert_eq!(doc.full_text(), "h");
    }

    #[test]
    fn test_empty_edit_is_noop_on_revision() {
        let mut doc = Document::with_text("hello");
        let rev = doc.revision;
        doc.insert_text(2, "");
        doc.delete_range(3, 3);
        assert_eq!(doc.revision, rev);
    }

    #[test]
    fn test_line_count_matches_newline_segments() {
        let mut doc = Document::with_text("a\nb");
        doc.insert_text(1, "\nX\nY");
        let text = doc.full_text();
        assert_eq!(doc.line_count(), text.split('\n').count());
        doc.delete_range(0, 3);
        let text = doc.full_text();
        assert_eq!(doc.line_count(), text.split('\n').count());
    }

    // ========================================================================
    // Marker identity through edits
    // ========================================================================

    #[test]
    fn test_marker_set_and_toggle() {
        let mut doc = Document::with_text("a\nb");
        doc.set_marker(1, MarkerKind::Breakpoint, true);
        assert!(doc.get_line(1).unwrap().has_breakpoint);
        doc.toggle_marker(1, MarkerKind::Breakpoint);
        assert!(!doc.get_line(1).unwrap().has_breakpoint);
    }

    #[test]
    fn test_marker_out_of_range_is_silent_noop() {
        let mut doc = Document::with_text("a");
        doc.set_marker(10, MarkerKind::Breakpoint, true);
        doc.toggle_marker(10, MarkerKind::Bookmark);
        assert!(doc.breakpoint_lines().is_empty());
        assert!(doc.bookmark_lines().is_empty());
    }

    #[test]
    fn test_marker_stays_with_content_on_insert_above() {
        let mut doc = Document::with_text("alpha\nbeta\ngamma");
        doc.set_marker(1, MarkerKind::Breakpoint, true);
        let beta_id = doc.line_id(1).unwrap();

        // Insert a full line above "beta"
        doc.insert_text(0, "intro\n");

        assert_eq!(doc.line_text(2), "beta");
        assert_eq!(doc.line_id(2), Some(beta_id));
        assert_eq!(doc.breakpoint_lines(), vec![2]);
        // The new line did not inherit the marker
        assert!(!doc.get_line(0).unwrap().has_breakpoint);
    }

    #[test]
    fn test_marker_stays_with_content_on_delete_above() {
        let mut doc = Document::with_text("alpha\nbeta\ngamma");
        doc.set_marker(2, MarkerKind::Bookmark, true);
        let gamma_id = doc.line_id(2).unwrap();

        // Delete the whole "alpha\n" line
        doc.delete_range(0, 6);

        assert_eq!(doc.line_text(1), "gamma");
        assert_eq!(doc.line_id(1), Some(gamma_id));
        assert_eq!(doc.bookmark_lines(), vec![1]);
    }

    #[test]
    fn test_newline_at_line_start_pushes_marked_line_down() {
        let mut doc = Document::with_text("marked");
        doc.set_marker(0, MarkerKind::Breakpoint, true);
        let id = doc.line_id(0).unwrap();

        doc.insert_text(0, "\n");

        assert_eq!(doc.line_text(1), "marked");
        assert_eq!(doc.line_id(1), Some(id));
        assert_eq!(doc.breakpoint_lines(), vec![1]);
    }

    #[test]
    fn test_mid_line_split_keeps_marker_on_head() {
        let mut doc = Document::with_text("headtail");
        doc.set_marker(0, MarkerKind::Breakpoint, true);
        let id = doc.line_id(0).unwrap();

        doc.insert_text(4, "\n");

        assert_eq!(doc.line_text(0), "head");
        assert_eq!(doc.line_text(1), "tail");
        // The fragment keeping the original leading content keeps the record
        assert_eq!(doc.line_id(0), Some(id));
        assert_eq!(doc.breakpoint_lines(), vec![0]);
    }

    #[test]
    fn test_merge_from_mid_line_keeps_first_lines_marker() {
        let mut doc = Document::with_text("head\ntail");
        doc.set_marker(0, MarkerKind::Breakpoint, true);
        doc.set_marker(1, MarkerKind::Bookmark, true);
        let head_id = doc.line_id(0).unwrap();

        // Delete the newline: merged line starts with "head"
        doc.delete_range(4, 5);

        assert_eq!(doc.full_text(), "headtail");
        assert_eq!(doc.line_id(0), Some(head_id));
        assert_eq!(doc.breakpoint_lines(), vec![0]);
        // "tail"'s record (and its bookmark) went with its deleted line start
        assert!(doc.bookmark_lines().is_empty());
    }

    #[test]
    fn test_delete_whole_first_lines_keeps_survivors_marker() {
        let mut doc = Document::with_text("one\ntwo\nthree");
        doc.set_marker(2, MarkerKind::Breakpoint, true);
        let id = doc.line_id(2).unwrap();

        // Delete "one\ntwo\n" entirely, from column 0
        doc.delete_range(0, 8);

        assert_eq!(doc.full_text(), "three");
        assert_eq!(doc.line_id(0), Some(id));
        assert_eq!(doc.breakpoint_lines(), vec![0]);
    }

    #[test]
    fn test_marker_inside_deleted_range_is_dropped() {
        let mut doc = Document::with_text("one\ntwo\nthree");
        doc.set_marker(1, MarkerKind::Breakpoint, true);

        doc.delete_range(0, 8);

        assert!(doc.breakpoint_lines().is_empty());
    }

    // ========================================================================
    // Error annotations
    // ========================================================================

    #[test]
    fn test_error_annotations_replaced_wholesale() {
        let mut doc = Document::with_text("a\nb\nc");
        doc.set_error_annotations(&[(0, "first".to_string()), (2, "third".to_string())]);
        assert_eq!(doc.error_annotation(0), Some("first"));
        assert_eq!(doc.error_annotation(1), None);
        assert_eq!(doc.error_annotation(2), Some("third"));

        doc.set_error_annotations(&[(1, "second".to_string())]);
        assert_eq!(doc.error_annotation(0), None);
        assert_eq!(doc.error_annotation(1), Some("second"));
        assert_eq!(doc.error_annotation(2), None);
    }

    #[test]
    fn test_error_annotation_out_of_range_skipped() {
        let mut doc = Document::with_text("a");
        doc.set_error_annotations(&[(7, "ghost".to_string())]);
        assert!(doc.error_annotations().is_empty());
    }

    #[test]
    fn test_annotations_do_not_bump_revision() {
        let mut doc = Document::with_text("a");
        let rev = doc.revision;
        doc.set_error_annotations(&[(0, "e".to_string())]);
        doc.clear_error_annotations();
        assert_eq!(doc.revision, rev);
    }

    // ========================================================================
    // Smart indent
    // ========================================================================

    #[test]
    fn test_newline_without_smart_indent() {
        let mut doc = Document::with_text("    indented");
        let inserted = doc.insert_newline_with_indent(12, false);
        assert_eq!(inserted, 1);
        assert_eq!(doc.full_text(), "    indented\n");
    }

    #[test]
    fn test_smart_indent_copies_leading_whitespace() {
        let mut doc = Document::with_text("    body");
        doc.insert_newline_with_indent(8, true);
        assert_eq!(doc.full_text(), "    body\n    ");
    }

    #[test]
    fn test_smart_indent_deepens_after_colon() {
        let mut doc = Document::with_text("def f():");
        let inserted = doc.insert_newline_with_indent(8, true);
        assert_eq!(doc.full_text(), "def f():\n    ");
        assert_eq!(inserted, 5);
    }

    // ========================================================================
    // Unicode
    // ========================================================================

    #[test]
    fn test_unicode_offsets_are_chars() {
        let mut doc = Document::with_text("héllo");
        doc.insert_text(2, "X");
        assert_eq!(doc.full_text(), "héXllo");
        doc.delete_range(2, 3);
        assert_eq!(doc.full_text(), "héllo");
    }
}
