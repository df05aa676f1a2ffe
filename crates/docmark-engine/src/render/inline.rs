use pulldown_cmark::{Event, Tag, TagEnd};

use super::builder::utf16_len;
use crate::model::{TextStyle, WeightedFontFamily};

/// A half-open range of a block's plain text carrying a style.
///
/// Offsets are UTF-16 code units relative to the start of the block's text.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledSpan {
    pub start: usize,
    pub end: usize,
    pub style: TextStyle,
}

impl StyledSpan {
    pub fn new(start: usize, end: usize, style: TextStyle) -> Self {
        Self { start, end, style }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Plain text of one block plus the style spans over it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineText {
    pub text: String,
    pub spans: Vec<StyledSpan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Bold,
    Italic,
    Link,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    start: usize,
    url: Option<String>,
}

/// Walks the inline events of a single block and flattens them into text and
/// spans.
///
/// Closing a style pops the innermost open frame of the same kind, not
/// necessarily the top of the stack, so mismatched emphasis still produces
/// spans. Frames left open at the end are dropped. Inline code is atomic and
/// gets `code_font`.
pub fn parse_inline<'a, I>(events: I, code_font: &WeightedFontFamily) -> InlineText
where
    I: IntoIterator<Item = Event<'a>>,
{
    let mut out = InlineText::default();
    let mut cursor = 0;
    let mut stack: Vec<Frame> = Vec::new();
    // Image alt text is not part of the rendered text.
    let mut image_depth = 0usize;

    for event in events {
        match event {
            Event::Start(Tag::Image { .. }) => image_depth += 1,
            Event::End(TagEnd::Image) => image_depth = image_depth.saturating_sub(1),
            _ if image_depth > 0 => {}
            Event::Text(text) => {
                out.text.push_str(&text);
                cursor += utf16_len(&text);
            }
            Event::SoftBreak | Event::HardBreak => {
                out.text.push('\n');
                cursor += 1;
            }
            Event::Start(Tag::Strong) => stack.push(Frame {
                kind: FrameKind::Bold,
                start: cursor,
                url: None,
            }),
            Event::Start(Tag::Emphasis) => stack.push(Frame {
                kind: FrameKind::Italic,
                start: cursor,
                url: None,
            }),
            Event::Start(Tag::Link { dest_url, .. }) => stack.push(Frame {
                kind: FrameKind::Link,
                start: cursor,
                url: (!dest_url.is_empty()).then(|| dest_url.to_string()),
            }),
            Event::End(TagEnd::Strong) => close(&mut stack, FrameKind::Bold, cursor, &mut out),
            Event::End(TagEnd::Emphasis) => close(&mut stack, FrameKind::Italic, cursor, &mut out),
            Event::End(TagEnd::Link) => close(&mut stack, FrameKind::Link, cursor, &mut out),
            Event::Code(code) => {
                let start = cursor;
                out.text.push_str(&code);
                cursor += utf16_len(&code);
                if cursor > start {
                    out.spans.push(StyledSpan::new(
                        start,
                        cursor,
                        TextStyle::font_family(code_font.clone()),
                    ));
                }
            }
            _ => {}
        }
    }

    out
}

fn close(stack: &mut Vec<Frame>, kind: FrameKind, cursor: usize, out: &mut InlineText) {
    let Some(idx) = stack.iter().rposition(|frame| frame.kind == kind) else {
        return;
    };
    let frame = stack.remove(idx);
    if frame.start >= cursor {
        return;
    }
    let style = match frame.kind {
        FrameKind::Bold => TextStyle::bold(),
        FrameKind::Italic => TextStyle::italic(),
        FrameKind::Link => match frame.url {
            Some(url) => TextStyle::link(url),
            None => return,
        },
    };
    out.spans.push(StyledSpan::new(frame.start, cursor, style));
}
