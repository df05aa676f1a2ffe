//! In-memory stand-in for the remote document service.
//!
//! `SimBody` applies batchUpdate requests to a flat buffer of UTF-16 units
//! and renders the result back into the service's document tree, so tests can
//! go markdown → requests → document → markdown without a network.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use docmark_engine::model::{
    Body, BulletPreset, Document, DocumentTab, Paragraph, ParagraphElement, ParagraphStyle,
    Request, StructuralElement, Tab, TabProperties, TextRun, TextStyle,
};
use docmark_engine::{DocsClient, DocsError, extract_markdown};

const NEWLINE: u16 = b'\n' as u16;

/// A document body: text units with per-unit text style, and per-paragraph
/// state stored on each paragraph's terminating newline.
#[derive(Debug, Clone)]
pub struct SimBody {
    units: Vec<u16>,
    text_styles: Vec<TextStyle>,
    paragraph_styles: Vec<ParagraphStyle>,
    bullets: Vec<Option<BulletPreset>>,
}

impl Default for SimBody {
    /// A fresh body holds a single empty paragraph.
    fn default() -> Self {
        Self {
            units: vec![NEWLINE],
            text_styles: vec![TextStyle::default()],
            paragraph_styles: vec![ParagraphStyle::default()],
            bullets: vec![None],
        }
    }
}

impl SimBody {
    pub fn apply(&mut self, request: &Request) {
        match request {
            Request::InsertText(insert) => {
                let at = insert.location.index - 1;
                assert!(
                    at < self.units.len(),
                    "insert at {} past end of body ({} units)",
                    insert.location.index,
                    self.units.len()
                );
                for (offset, unit) in insert.text.encode_utf16().enumerate() {
                    self.units.insert(at + offset, unit);
                    self.text_styles.insert(at + offset, TextStyle::default());
                    self.paragraph_styles
                        .insert(at + offset, ParagraphStyle::default());
                    self.bullets.insert(at + offset, None);
                }
            }
            Request::UpdateTextStyle(update) => {
                for i in self.unit_range(update.range.start_index, update.range.end_index) {
                    merge_text_style(&mut self.text_styles[i], &update.text_style);
                }
            }
            Request::UpdateParagraphStyle(update) => {
                for nl in self.paragraph_ends(update.range.start_index, update.range.end_index) {
                    let style = &mut self.paragraph_styles[nl];
                    merge_paragraph_style(style, &update.paragraph_style);
                }
            }
            Request::CreateParagraphBullets(create) => {
                for nl in self.paragraph_ends(create.range.start_index, create.range.end_index) {
                    self.bullets[nl] = Some(create.bullet_preset);
                }
            }
            Request::DeleteContentRange(delete) => {
                let range = self.unit_range(delete.range.start_index, delete.range.end_index);
                assert!(
                    range.end < self.units.len(),
                    "cannot delete the final newline"
                );
                self.units.drain(range.clone());
                self.text_styles.drain(range.clone());
                self.paragraph_styles.drain(range.clone());
                self.bullets.drain(range);
            }
        }
    }

    pub fn text(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }

    /// Bullet preset of every bulleted paragraph, with its text.
    pub fn bulleted(&self) -> Vec<(String, BulletPreset)> {
        self.paragraphs()
            .into_iter()
            .filter_map(|(start, nl)| {
                self.bullets[nl].map(|preset| {
                    (String::from_utf16_lossy(&self.units[start..nl]), preset)
                })
            })
            .collect()
    }

    /// Text covered by each maximal run with the given style field set.
    pub fn runs_where(&self, pred: impl Fn(&TextStyle) -> bool) -> Vec<String> {
        let mut out = Vec::new();
        let mut current: Vec<u16> = Vec::new();
        for (unit, style) in self.units.iter().zip(&self.text_styles) {
            if pred(style) {
                current.push(*unit);
            } else if !current.is_empty() {
                out.push(String::from_utf16_lossy(&current));
                current.clear();
            }
        }
        if !current.is_empty() {
            out.push(String::from_utf16_lossy(&current));
        }
        out
    }

    pub fn to_body(&self) -> Body {
        let content = self
            .paragraphs()
            .into_iter()
            .map(|(start, nl)| {
                let mut elements: Vec<ParagraphElement> = Vec::new();
                let mut run_start = start;
                for i in start..=nl {
                    let boundary = i == nl || self.text_styles[i + 1] != self.text_styles[i];
                    if boundary {
                        elements.push(ParagraphElement {
                            text_run: Some(TextRun {
                                content: String::from_utf16_lossy(&self.units[run_start..=i]),
                                text_style: Some(self.text_styles[run_start].clone()),
                            }),
                        });
                        run_start = i + 1;
                    }
                }
                let style = &self.paragraph_styles[nl];
                StructuralElement {
                    start_index: Some(start + 1),
                    end_index: Some(nl + 2),
                    paragraph: Some(Paragraph {
                        elements,
                        paragraph_style: (!style.is_empty()).then(|| style.clone()),
                    }),
                    table: None,
                }
            })
            .collect();
        Body { content }
    }

    /// `(first unit, terminating newline)` of every paragraph.
    fn paragraphs(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        let mut start = 0;
        for (i, unit) in self.units.iter().enumerate() {
            if *unit == NEWLINE {
                out.push((start, i));
                start = i + 1;
            }
        }
        out
    }

    fn unit_range(&self, start_index: usize, end_index: usize) -> std::ops::Range<usize> {
        assert!(start_index >= 1 && start_index < end_index, "bad range");
        assert!(end_index - 1 <= self.units.len(), "range past end of body");
        start_index - 1..end_index - 1
    }

    fn paragraph_ends(&self, start_index: usize, end_index: usize) -> Vec<usize> {
        let range = self.unit_range(start_index, end_index);
        self.paragraphs()
            .into_iter()
            .filter(|(start, nl)| *start < range.end && *nl >= range.start)
            .map(|(_, nl)| nl)
            .collect()
    }
}

/// Copies every populated field of `update` over `style`, the way the
/// service applies an update under its field mask.
fn merge_text_style(style: &mut TextStyle, update: &TextStyle) {
    if update.bold.is_some() {
        style.bold = update.bold;
    }
    if update.italic.is_some() {
        style.italic = update.italic;
    }
    if update.link.is_some() {
        style.link.clone_from(&update.link);
    }
    if update.weighted_font_family.is_some() {
        style
            .weighted_font_family
            .clone_from(&update.weighted_font_family);
    }
    if update.font_size.is_some() {
        style.font_size.clone_from(&update.font_size);
    }
    if update.background_color.is_some() {
        style.background_color.clone_from(&update.background_color);
    }
}

fn merge_paragraph_style(style: &mut ParagraphStyle, update: &ParagraphStyle) {
    if update.named_style_type.is_some() {
        style.named_style_type = update.named_style_type;
    }
    if update.indent_start.is_some() {
        style.indent_start.clone_from(&update.indent_start);
    }
    if update.indent_end.is_some() {
        style.indent_end.clone_from(&update.indent_end);
    }
    if update.space_above.is_some() {
        style.space_above.clone_from(&update.space_above);
    }
    if update.space_below.is_some() {
        style.space_below.clone_from(&update.space_below);
    }
}

#[derive(Debug, Clone)]
pub struct SimTab {
    pub id: String,
    pub title: String,
    pub body: SimBody,
}

/// A document that is either tabless or has a flat list of root tabs.
#[derive(Debug, Clone)]
pub struct SimDocument {
    pub id: String,
    pub title: String,
    pub body: SimBody,
    pub tabs: Vec<SimTab>,
}

impl SimDocument {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            body: SimBody::default(),
            tabs: Vec::new(),
        }
    }

    pub fn with_tab(mut self, id: &str, title: &str) -> Self {
        self.tabs.push(SimTab {
            id: id.to_string(),
            title: title.to_string(),
            body: SimBody::default(),
        });
        self
    }

    pub fn body_for(&self, tab_id: Option<&str>) -> &SimBody {
        match tab_id {
            Some(id) => &self.tabs.iter().find(|t| t.id == id).expect("unknown tab").body,
            None => self.tabs.first().map_or(&self.body, |t| &t.body),
        }
    }

    fn body_for_mut(&mut self, tab_id: Option<&str>) -> &mut SimBody {
        match tab_id {
            Some(id) => {
                &mut self
                    .tabs
                    .iter_mut()
                    .find(|t| t.id == id)
                    .expect("unknown tab")
                    .body
            }
            None => match self.tabs.first_mut() {
                Some(tab) => &mut tab.body,
                None => &mut self.body,
            },
        }
    }

    pub fn apply_all(&mut self, requests: &[Request]) {
        for request in requests {
            let tab_id = match request {
                Request::InsertText(insert) => insert.location.tab_id.clone(),
                other => other.range().and_then(|r| r.tab_id.clone()),
            };
            self.body_for_mut(tab_id.as_deref()).apply(request);
        }
    }

    pub fn to_document(&self) -> Document {
        let tabs = self
            .tabs
            .iter()
            .map(|tab| Tab {
                tab_properties: TabProperties {
                    tab_id: Some(tab.id.clone()),
                    title: Some(tab.title.clone()),
                },
                document_tab: Some(DocumentTab {
                    body: Some(tab.body.to_body()),
                }),
                child_tabs: Vec::new(),
            })
            .collect::<Vec<_>>();
        Document {
            document_id: Some(self.id.clone()),
            title: Some(self.title.clone()),
            body: tabs.is_empty().then(|| self.body.to_body()),
            tabs,
        }
    }
}

/// Renders `requests` into a fresh tabless document and reads it back.
pub fn apply_to_fresh(requests: &[Request]) -> SimDocument {
    let mut doc = SimDocument::new("doc", "Doc");
    doc.apply_all(requests);
    doc
}

/// A `DocsClient` over in-memory documents.
#[derive(Default)]
pub struct FakeClient {
    pub docs: RefCell<HashMap<String, SimDocument>>,
    pub batches: RefCell<Vec<(String, Vec<Request>)>>,
    pub signed_out: bool,
    created: RefCell<usize>,
}

impl FakeClient {
    pub fn with_document(doc: SimDocument) -> Self {
        let client = Self::default();
        client.docs.borrow_mut().insert(doc.id.clone(), doc);
        client
    }

    pub fn without_session() -> Self {
        Self {
            signed_out: true,
            ..Self::default()
        }
    }

    pub fn document(&self, id: &str) -> SimDocument {
        self.docs.borrow().get(id).cloned().expect("unknown document")
    }

    fn check_session(&self) -> Result<(), DocsError> {
        if self.signed_out {
            return Err(DocsError::MissingCredentials(
                "Authorize the server first by visiting /auth/start".to_string(),
            ));
        }
        Ok(())
    }
}

impl DocsClient for FakeClient {
    fn get_document(&self, document_id: &str) -> Result<Document, DocsError> {
        self.check_session()?;
        self.docs
            .borrow()
            .get(document_id)
            .map(SimDocument::to_document)
            .ok_or_else(|| DocsError::Service("Requested entity was not found.".to_string()))
    }

    fn batch_update(&self, document_id: &str, requests: &[Request]) -> Result<(), DocsError> {
        self.check_session()?;
        let mut docs = self.docs.borrow_mut();
        let doc = docs
            .get_mut(document_id)
            .ok_or_else(|| DocsError::Service("Requested entity was not found.".to_string()))?;
        doc.apply_all(requests);
        self.batches
            .borrow_mut()
            .push((document_id.to_string(), requests.to_vec()));
        Ok(())
    }

    fn create_document(&self, title: &str) -> Result<Document, DocsError> {
        self.check_session()?;
        let mut created = self.created.borrow_mut();
        *created += 1;
        let id = format!("doc-{created}");
        let doc = SimDocument::new(&id, title).with_tab("t.0", "Tab 1");
        let snapshot = doc.to_document();
        self.docs.borrow_mut().insert(id, doc);
        Ok(snapshot)
    }

    fn export_markdown(&self, document_id: &str) -> Result<String, DocsError> {
        self.check_session()?;
        let doc = self.get_document(document_id)?;
        Ok(doc.body.as_ref().map(extract_markdown).unwrap_or_default())
    }
}
