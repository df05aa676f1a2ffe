//! Read-side document tree as returned by `documents.get`.
//!
//! Only the parts the walker and extractor look at are modeled; every other
//! field in the service's JSON is ignored on deserialization.

use serde::{Deserialize, Serialize};

use super::style::{OptionalColor, ParagraphStyle, TextStyle};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tabs: Vec<Tab>,
}

impl Document {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Body {
    pub content: Vec<StructuralElement>,
}

impl Body {
    /// Index one past the last element, or 1 for an empty body.
    pub fn end_index(&self) -> usize {
        self.content
            .last()
            .and_then(|element| element.end_index)
            .unwrap_or(1)
    }
}

/// A top-level block: a paragraph, a table, or something unmodeled
/// (section breaks, tables of contents) with neither field set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StructuralElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<Paragraph>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Paragraph {
    pub elements: Vec<ParagraphElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_style: Option<ParagraphStyle>,
}

impl Paragraph {
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|e| e.text_run.as_ref())
    }

    pub fn first_run(&self) -> Option<&TextRun> {
        self.text_runs().next()
    }

    /// Concatenated text of every run, including the trailing newline.
    pub fn text(&self) -> String {
        self.text_runs().map(|run| run.content.as_str()).collect()
    }

    pub fn heading_level(&self) -> Option<u8> {
        self.paragraph_style
            .as_ref()
            .and_then(ParagraphStyle::heading_level)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParagraphElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_run: Option<TextRun>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextRun {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Table {
    pub rows: usize,
    pub columns: usize,
    pub table_rows: Vec<TableRow>,
}

impl Table {
    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.table_rows.iter().flat_map(|row| row.table_cells.iter())
    }

    /// The only cell of a one-row, one-column table.
    pub fn single_cell(&self) -> Option<&TableCell> {
        match self.table_rows.as_slice() {
            [row] => match row.table_cells.as_slice() {
                [cell] => Some(cell),
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableRow {
    pub table_cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableCell {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_cell_style: Option<TableCellStyle>,
    pub content: Vec<StructuralElement>,
}

impl TableCell {
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.content.iter().filter_map(|e| e.paragraph.as_ref())
    }

    pub fn background_color(&self) -> Option<&OptionalColor> {
        self.table_cell_style.as_ref()?.background_color.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableCellStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<OptionalColor>,
}

/// A named sub-document. Tabs nest through `child_tabs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tab {
    pub tab_properties: TabProperties,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_tab: Option<DocumentTab>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub child_tabs: Vec<Tab>,
}

impl Tab {
    pub fn id(&self) -> Option<&str> {
        self.tab_properties.tab_id.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.tab_properties.title.as_deref()
    }

    pub fn body(&self) -> Option<&Body> {
        self.document_tab.as_ref()?.body.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TabProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentTab {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
}
