//! Document tree → markdown.
//!
//! The service has no paragraph kind for code, so code is recognized
//! heuristically. A paragraph is code when its first run either starts with
//! the private-use marker the service's own code blocks begin with, or is set
//! in a monospace font on a light background. The second signal is what the
//! renderer emits for fenced code.
//!
//! Ordinary text that happens to be monospace on a near-white highlight is
//! also classified as code. That false positive is accepted.

use crate::model::{Body, OptionalColor, Paragraph, Table, TableCell, TextRun, TextStyle};

/// First character of a paragraph inside a native code block.
pub const CODE_BLOCK_MARKER: char = '\u{EC03}';

/// Minimum value of every RGB channel for a background to count as light.
pub const LIGHT_BACKGROUND_MIN: f64 = 0.85;

const MONOSPACE_HINTS: &[&str] = &[
    "mono",
    "courier",
    "consolas",
    "menlo",
    "monaco",
    "inconsolata",
    "source code",
];

const FENCE: &str = "```\n";

pub fn is_monospace_family(family: &str) -> bool {
    let family = family.to_lowercase();
    MONOSPACE_HINTS.iter().any(|hint| family.contains(hint))
}

pub fn is_light_background(color: Option<&OptionalColor>) -> bool {
    color
        .and_then(OptionalColor::rgb_color)
        .is_some_and(|rgb| rgb.all_channels_at_least(LIGHT_BACKGROUND_MIN))
}

fn is_monospace_style(style: Option<&TextStyle>) -> bool {
    style
        .and_then(|s| s.weighted_font_family.as_ref())
        .is_some_and(|f| is_monospace_family(&f.font_family))
}

fn run_is_monospace(run: &TextRun) -> bool {
    is_monospace_style(run.text_style.as_ref())
}

/// Code signal (b): monospace font on a light background.
fn run_looks_like_code(run: &TextRun) -> bool {
    let style = run.text_style.as_ref();
    is_monospace_style(style)
        && is_light_background(style.and_then(|s| s.background_color.as_ref()))
}

/// A one-cell table with a light cell background and at least one monospace
/// run anywhere inside. The cell's text does not matter.
pub fn is_code_table(table: &Table) -> bool {
    table.single_cell().is_some_and(is_code_cell)
}

fn is_code_cell(cell: &TableCell) -> bool {
    is_light_background(cell.background_color())
        && cell
            .paragraphs()
            .flat_map(Paragraph::text_runs)
            .any(run_is_monospace)
}

/// Whether `paragraph` is code, and its text with the native marker removed.
fn classify_paragraph(paragraph: &Paragraph) -> (bool, String) {
    let mut text = paragraph.text();
    let Some(first) = paragraph.first_run() else {
        return (false, text);
    };
    if first.content.starts_with(CODE_BLOCK_MARKER) {
        text.remove(0);
        return (true, text);
    }
    (run_looks_like_code(first), text)
}

fn table_text(table: &Table) -> String {
    table
        .cells()
        .flat_map(TableCell::paragraphs)
        .map(Paragraph::text)
        .collect()
}

/// Reconstructs markdown from a body's top-level content.
///
/// Headings become `#` lines followed by a blank line, other paragraphs a
/// single line each. Fences are opened and closed where consecutive
/// paragraphs switch between code and non-code.
pub fn extract_markdown(body: &Body) -> String {
    let mut out = String::new();
    let mut in_code_block = false;

    for element in &body.content {
        if let Some(table) = &element.table {
            if in_code_block {
                out.push_str(FENCE);
                in_code_block = false;
            }
            push_table(&mut out, table);
        } else if let Some(paragraph) = &element.paragraph {
            let (is_code, text) = classify_paragraph(paragraph);
            if is_code != in_code_block {
                out.push_str(FENCE);
                in_code_block = is_code;
            }

            let text = text.strip_suffix('\n').unwrap_or(&text);
            if text.trim().is_empty() {
                continue;
            }
            match paragraph.heading_level() {
                Some(level) => {
                    out.push_str(&"#".repeat(level as usize));
                    out.push(' ');
                    out.push_str(text);
                    out.push_str("\n\n");
                }
                None => {
                    out.push_str(text);
                    out.push('\n');
                }
            }
        }
    }

    if in_code_block {
        out.push_str(FENCE);
    }
    out.trim().to_string()
}

fn push_table(out: &mut String, table: &Table) {
    let text = table_text(table);
    let text = text.strip_suffix('\n').unwrap_or(&text);
    if is_code_table(table) {
        out.push_str(FENCE);
        if !text.is_empty() {
            out.push_str(text);
            out.push('\n');
        }
        out.push_str(FENCE);
    } else if !text.trim().is_empty() {
        out.push_str(text);
        out.push('\n');
    }
}

/// Text of every top-level paragraph, with no markup.
pub fn extract_plain_text(body: &Body) -> String {
    body.content
        .iter()
        .filter_map(|element| element.paragraph.as_ref())
        .map(Paragraph::text)
        .collect::<String>()
        .trim()
        .to_string()
}
