use crate::model::{
    BatchUpdate, CreateParagraphBullets, InsertText, ListKind, Location, ParagraphStyle, Range,
    Request, UpdateParagraphStyle, UpdateTextStyle,
};

use super::inline::StyledSpan;

/// Length of `s` in UTF-16 code units, the unit the service indexes by.
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// The requests produced by one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedBatch {
    pub requests: Vec<Request>,
    /// Index just past the last inserted character.
    pub cursor: usize,
}

impl RenderedBatch {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn into_batch_update(self) -> BatchUpdate {
        BatchUpdate {
            requests: self.requests,
        }
    }
}

/// Accumulates positional requests against one document (or tab).
///
/// The cursor only moves on insertion. Style and bullet requests address
/// text that has already been inserted, so they are appended after the
/// insertion they refer to and leave the cursor alone.
#[derive(Debug)]
pub struct RequestBuilder {
    cursor: usize,
    requests: Vec<Request>,
    tab_id: Option<String>,
}

impl RequestBuilder {
    /// Starts a builder at `start_index`. With `prepend_newline`, a bare
    /// paragraph break is inserted first so appended content does not merge
    /// into the document's last paragraph.
    pub fn new(start_index: usize, prepend_newline: bool, tab_id: Option<String>) -> Self {
        let mut builder = Self {
            cursor: start_index,
            requests: Vec::new(),
            tab_id,
        };
        if prepend_newline {
            builder.insert_text("\n");
        }
        builder
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Inserts `text` at the cursor and returns where it starts.
    pub fn insert_text(&mut self, text: &str) -> usize {
        if text.is_empty() {
            return self.cursor;
        }
        self.requests.push(Request::InsertText(InsertText {
            location: Location {
                index: self.cursor,
                tab_id: self.tab_id.clone(),
            },
            text: text.to_string(),
        }));
        let start = self.cursor;
        self.cursor += utf16_len(text);
        start
    }

    /// Inserts `text` as a complete paragraph and styles it.
    ///
    /// The paragraph always ends with exactly one newline, so its range
    /// `[start, end)` includes the terminator. Span offsets are relative to
    /// `text` and are shifted by `start`; empty spans are skipped.
    pub fn add_paragraph(
        &mut self,
        text: &str,
        paragraph_style: Option<&ParagraphStyle>,
        spans: &[StyledSpan],
        list: Option<ListKind>,
    ) {
        if text.is_empty() {
            return;
        }
        let start = if text.ends_with('\n') {
            self.insert_text(text)
        } else {
            self.insert_text(&format!("{text}\n"))
        };
        let end = self.cursor;

        if let Some(style) = paragraph_style.filter(|style| !style.is_empty()) {
            self.requests
                .push(Request::UpdateParagraphStyle(UpdateParagraphStyle {
                    range: self.range(start, end),
                    paragraph_style: style.clone(),
                    fields: style.field_names().join(","),
                }));
        }

        for span in spans {
            if span.is_empty() || span.style.is_empty() {
                continue;
            }
            self.requests.push(Request::UpdateTextStyle(UpdateTextStyle {
                range: self.range(start + span.start, start + span.end),
                text_style: span.style.clone(),
                fields: span.style.field_names().join(","),
            }));
        }

        if let Some(kind) = list {
            self.requests
                .push(Request::CreateParagraphBullets(CreateParagraphBullets {
                    range: self.range(start, end),
                    bullet_preset: kind.bullet_preset(),
                }));
        }
    }

    pub fn finish(self) -> RenderedBatch {
        RenderedBatch {
            requests: self.requests,
            cursor: self.cursor,
        }
    }

    fn range(&self, start_index: usize, end_index: usize) -> Range {
        Range::new(start_index, end_index, self.tab_id.clone())
    }
}
