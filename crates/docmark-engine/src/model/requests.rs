//! `documents.batchUpdate` request shapes.
//!
//! Each [`Request`] serializes to an object with exactly one key naming the
//! operation, e.g. `{"insertText": {"location": {"index": 1}, "text": "hi\n"}}`.

use serde::{Deserialize, Serialize};

use super::style::{ParagraphStyle, TextStyle};

/// A single insertion point. Indices are 1-based UTF-16 offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,
}

/// A half-open `[start_index, end_index)` range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: usize,
    pub end_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,
}

impl Range {
    pub fn new(start_index: usize, end_index: usize, tab_id: Option<String>) -> Self {
        Self {
            start_index,
            end_index,
            tab_id,
        }
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertText {
    pub location: Location,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParagraphStyle {
    pub range: Range,
    pub paragraph_style: ParagraphStyle,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTextStyle {
    pub range: Range,
    pub text_style: TextStyle,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParagraphBullets {
    pub range: Range,
    pub bullet_preset: BulletPreset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteContentRange {
    pub range: Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulletPreset {
    NumberedDecimalAlphaRoman,
    BulletDiscCircleSquare,
}

/// Whether a markdown list is numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    pub fn bullet_preset(self) -> BulletPreset {
        match self {
            ListKind::Ordered => BulletPreset::NumberedDecimalAlphaRoman,
            ListKind::Unordered => BulletPreset::BulletDiscCircleSquare,
        }
    }
}

/// One positional edit, replayed verbatim by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    InsertText(InsertText),
    UpdateParagraphStyle(UpdateParagraphStyle),
    UpdateTextStyle(UpdateTextStyle),
    CreateParagraphBullets(CreateParagraphBullets),
    DeleteContentRange(DeleteContentRange),
}

impl Request {
    /// The range a non-insert request touches.
    pub fn range(&self) -> Option<&Range> {
        match self {
            Request::InsertText(_) => None,
            Request::UpdateParagraphStyle(r) => Some(&r.range),
            Request::UpdateTextStyle(r) => Some(&r.range),
            Request::CreateParagraphBullets(r) => Some(&r.range),
            Request::DeleteContentRange(r) => Some(&r.range),
        }
    }
}

/// Body of a `documents.batchUpdate` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchUpdate {
    pub requests: Vec<Request>,
}
