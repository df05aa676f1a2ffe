//! Markdown → `batchUpdate` requests.
//!
//! The markdown is parsed with pulldown-cmark and walked once, left to right.
//! Every block becomes one paragraph insertion followed by the style and
//! bullet requests that decorate it.
//!
//! # Block mapping
//!
//! | markdown            | document                                         |
//! |---------------------|--------------------------------------------------|
//! | `# Heading`         | paragraph with `HEADING_n` named style           |
//! | paragraph           | plain paragraph (skipped when blank)             |
//! | `- item` / `1. item`| paragraph + bullet preset                        |
//! | fenced code         | paragraph with indent/spacing, monospace on gray |
//!
//! The service has no code-block paragraph kind, so fenced code is marked by
//! font plus background. The extractor looks for the same pair on the way
//! back.

pub mod builder;
pub mod inline;

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use crate::error::CodeStyleError;
use crate::extract::{LIGHT_BACKGROUND_MIN, is_monospace_family};
use crate::model::{
    Dimension, ListKind, NamedStyleType, OptionalColor, ParagraphStyle, RgbColor, TextStyle,
    WeightedFontFamily,
};

pub use builder::{RenderedBatch, RequestBuilder, utf16_len};
pub use inline::{InlineText, StyledSpan, parse_inline};

/// Visual treatment applied to code blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlockStyle {
    pub font_family: String,
    pub font_size_pt: f64,
    /// Gray level of the background, `0.0..=1.0`.
    pub background: f64,
    pub indent_pt: f64,
    pub spacing_pt: f64,
}

impl Default for CodeBlockStyle {
    fn default() -> Self {
        Self {
            font_family: "Roboto Mono".to_string(),
            font_size_pt: 9.0,
            background: 0.95,
            indent_pt: 18.0,
            spacing_pt: 6.0,
        }
    }
}

impl CodeBlockStyle {
    /// Checks that text drawn in this style is classified as code when the
    /// document is extracted again.
    pub fn validate(&self) -> Result<(), CodeStyleError> {
        if !is_monospace_family(&self.font_family) {
            return Err(CodeStyleError::NotMonospace {
                font_family: self.font_family.clone(),
            });
        }
        if !(LIGHT_BACKGROUND_MIN..=1.0).contains(&self.background) {
            return Err(CodeStyleError::BackgroundNotLight {
                background: self.background,
            });
        }
        Ok(())
    }

    pub fn font(&self) -> WeightedFontFamily {
        WeightedFontFamily::regular(self.font_family.clone())
    }

    pub fn paragraph_style(&self) -> ParagraphStyle {
        ParagraphStyle {
            named_style_type: None,
            indent_start: Some(Dimension::pt(self.indent_pt)),
            indent_end: Some(Dimension::pt(self.indent_pt)),
            space_above: Some(Dimension::pt(self.spacing_pt)),
            space_below: Some(Dimension::pt(self.spacing_pt)),
        }
    }

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            weighted_font_family: Some(self.font()),
            font_size: Some(Dimension::pt(self.font_size_pt)),
            background_color: Some(OptionalColor::rgb(RgbColor::gray(self.background))),
            ..TextStyle::default()
        }
    }
}

/// Where and how a render pass writes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Document index of the first insertion; 1 for an empty document.
    pub start_index: usize,
    /// Insert a paragraph break before any content.
    pub prepend_newline: bool,
    pub tab_id: Option<String>,
    pub code_block: CodeBlockStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            start_index: 1,
            prepend_newline: false,
            tab_id: None,
            code_block: CodeBlockStyle::default(),
        }
    }
}

impl RenderOptions {
    pub fn at(start_index: usize) -> Self {
        Self {
            start_index,
            ..Self::default()
        }
    }

    pub fn with_tab_id(mut self, tab_id: Option<String>) -> Self {
        self.tab_id = tab_id;
        self
    }

    pub fn with_prepend_newline(mut self, prepend_newline: bool) -> Self {
        self.prepend_newline = prepend_newline;
        self
    }

    pub fn with_code_block(mut self, code_block: CodeBlockStyle) -> Self {
        self.code_block = code_block;
        self
    }
}

/// Renders `markdown` into the requests that write it into a document.
///
/// Blank input yields an empty batch whose cursor is the start index; no
/// leading newline is inserted in that case.
pub fn render_markdown(markdown: &str, options: &RenderOptions) -> RenderedBatch {
    if markdown.trim().is_empty() {
        return RenderedBatch {
            requests: Vec::new(),
            cursor: options.start_index,
        };
    }

    let builder = RequestBuilder::new(
        options.start_index,
        options.prepend_newline,
        options.tab_id.clone(),
    );
    let mut renderer = MarkdownRenderer::new(builder, &options.code_block);
    for event in Parser::new(markdown) {
        renderer.process_event(event);
    }
    renderer.finish()
}

/// What a run of collected inline events will become.
#[derive(Debug, Clone, Copy)]
enum BlockTarget {
    Heading(u8),
    Paragraph,
    ListItem(ListKind),
}

struct PendingInline<'m> {
    target: BlockTarget,
    events: Vec<Event<'m>>,
}

/// Event-driven state for one render pass.
///
/// Tight list items have no paragraph wrapper: their text arrives directly
/// inside `Item`, possibly followed by a nested list. Collection for an item
/// therefore starts at `Start(Item)` and is flushed at the next block
/// boundary, whichever comes first.
struct MarkdownRenderer<'m, 's> {
    builder: RequestBuilder,
    code_style: &'s CodeBlockStyle,
    code_font: WeightedFontFamily,
    lists: Vec<ListKind>,
    inline: Option<PendingInline<'m>>,
    code: Option<String>,
}

impl<'m, 's> MarkdownRenderer<'m, 's> {
    fn new(builder: RequestBuilder, code_style: &'s CodeBlockStyle) -> Self {
        Self {
            builder,
            code_font: code_style.font(),
            code_style,
            lists: Vec::new(),
            inline: None,
            code: None,
        }
    }

    fn process_event(&mut self, event: Event<'m>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.begin_inline(BlockTarget::Heading(level as u8));
            }
            Event::Start(Tag::Paragraph) => {
                let target = match self.lists.last() {
                    Some(kind) => BlockTarget::ListItem(*kind),
                    None => BlockTarget::Paragraph,
                };
                self.begin_inline(target);
            }
            Event::Start(Tag::Item) => {
                let kind = self.lists.last().copied().unwrap_or(ListKind::Unordered);
                self.begin_inline(BlockTarget::ListItem(kind));
            }
            Event::End(TagEnd::Heading(_) | TagEnd::Paragraph | TagEnd::Item) => {
                self.flush_inline();
            }
            Event::Start(Tag::List(first_number)) => {
                self.flush_inline();
                self.lists.push(if first_number.is_some() {
                    ListKind::Ordered
                } else {
                    ListKind::Unordered
                });
            }
            Event::End(TagEnd::List(_)) => {
                self.flush_inline();
                self.lists.pop();
                self.resume_item();
            }
            Event::Start(Tag::CodeBlock(_)) => {
                self.flush_inline();
                self.code = Some(String::new());
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(code) = self.code.take() {
                    self.render_code(&code);
                }
                self.resume_item();
            }
            Event::Text(text) if self.code.is_some() => {
                if let Some(code) = self.code.as_mut() {
                    code.push_str(&text);
                }
            }
            other => {
                if let Some(pending) = self.inline.as_mut() {
                    pending.events.push(other);
                }
            }
        }
    }

    fn begin_inline(&mut self, target: BlockTarget) {
        self.flush_inline();
        self.inline = Some(PendingInline {
            target,
            events: Vec::new(),
        });
    }

    /// Reopens collection for the enclosing list item after a nested block,
    /// so tight-item text that follows it is not lost.
    fn resume_item(&mut self) {
        if let Some(kind) = self.lists.last().copied() {
            self.begin_inline(BlockTarget::ListItem(kind));
        }
    }

    fn flush_inline(&mut self) {
        let Some(pending) = self.inline.take() else {
            return;
        };
        let InlineText { text, spans } = parse_inline(pending.events, &self.code_font);
        match pending.target {
            BlockTarget::Heading(level) => {
                let style = ParagraphStyle::named(NamedStyleType::heading(level));
                self.builder.add_paragraph(&text, Some(&style), &spans, None);
            }
            BlockTarget::Paragraph => {
                if !text.trim().is_empty() {
                    self.builder.add_paragraph(&text, None, &spans, None);
                }
            }
            BlockTarget::ListItem(kind) => {
                self.builder.add_paragraph(&text, None, &spans, Some(kind));
            }
        }
    }

    fn render_code(&mut self, code: &str) {
        let text = code.strip_suffix('\n').unwrap_or(code);
        if text.is_empty() {
            return;
        }
        let span = StyledSpan::new(0, utf16_len(text), self.code_style.text_style());
        self.builder.add_paragraph(
            text,
            Some(&self.code_style.paragraph_style()),
            &[span],
            None,
        );
    }

    fn finish(mut self) -> RenderedBatch {
        self.flush_inline();
        self.builder.finish()
    }
}
