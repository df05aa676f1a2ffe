//! Document-level operations composed from the converter and a remote client.
//!
//! The client is injected; nothing here talks to the network directly.

use serde::Serialize;

use crate::error::{CodeStyleError, DocsError};
use crate::extract::{extract_markdown, extract_plain_text};
use crate::model::{DeleteContentRange, Document, Range, Request};
use crate::render::{CodeBlockStyle, RenderOptions, render_markdown};
use crate::tabs::{self, TabMetadata};

/// Remote calls against the document service.
///
/// Implementations own authentication. They report a missing session as
/// [`DocsError::MissingCredentials`] and any transport or HTTP failure as
/// [`DocsError::Service`] carrying the service's message.
pub trait DocsClient {
    /// Fetches a document with every tab's content included.
    fn get_document(&self, document_id: &str) -> Result<Document, DocsError>;

    fn batch_update(&self, document_id: &str, requests: &[Request]) -> Result<(), DocsError>;

    /// Creates an empty document and returns it as the service reports it.
    fn create_document(&self, title: &str) -> Result<Document, DocsError>;

    /// The service's own markdown export of the whole document.
    fn export_markdown(&self, document_id: &str) -> Result<String, DocsError>;
}

pub fn document_url(document_id: &str) -> String {
    format!("https://docs.google.com/document/d/{document_id}/edit")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub document_id: String,
    pub title: Option<String>,
    pub url: String,
    pub tab_id: Option<String>,
}

impl DocumentSummary {
    fn new(document_id: &str, title: Option<&str>, tab_id: Option<String>) -> Self {
        Self {
            document_id: document_id.to_string(),
            title: title.map(str::to_string),
            url: document_url(document_id),
            tab_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentContent {
    #[serde(flatten)]
    pub summary: DocumentSummary,
    pub content: String,
}

/// How [`DocsService::read_document`] turns a document into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadMode {
    /// Walk the document tree and rebuild markdown locally.
    #[default]
    Markdown,
    /// Concatenated paragraph text.
    PlainText,
    /// The service's own export. Whole documents only.
    Export,
}

pub struct DocsService<C> {
    client: C,
    code_block: CodeBlockStyle,
}

impl<C: DocsClient> DocsService<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            code_block: CodeBlockStyle::default(),
        }
    }

    /// Replaces the code-block treatment, refusing one whose code would not
    /// be recognized when the document is read back.
    pub fn with_code_block(mut self, code_block: CodeBlockStyle) -> Result<Self, CodeStyleError> {
        code_block.validate()?;
        self.code_block = code_block;
        Ok(self)
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Creates a document, seeding its first tab with rendered markdown.
    pub fn create_document(
        &self,
        title: &str,
        initial_markdown: Option<&str>,
    ) -> Result<DocumentSummary, DocsError> {
        let doc = self.client.create_document(title)?;
        let document_id = doc
            .document_id
            .clone()
            .ok_or_else(|| DocsError::Service("created document has no id".to_string()))?;
        let tab_id = doc.tabs.first().and_then(|t| t.id()).map(str::to_string);

        if let Some(markdown) = initial_markdown {
            let options = self.options(1).with_tab_id(tab_id.clone());
            let batch = render_markdown(markdown, &options);
            self.apply(&document_id, &batch.requests)?;
        }
        log::info!("created document {document_id}");
        Ok(DocumentSummary::new(&document_id, doc.title.as_deref(), tab_id))
    }

    /// Appends markdown after the last paragraph of the target tab.
    pub fn append_markdown(
        &self,
        document_id: &str,
        markdown: &str,
        tab_id: Option<&str>,
    ) -> Result<DocumentSummary, DocsError> {
        let doc = self.client.get_document(document_id)?;
        let target = tabs::resolve(&doc, tab_id)?;
        let end_index = target.body(&doc).map_or(1, |body| body.end_index());

        // The body always ends with a newline the service will not let us
        // write past, so insertion happens just before it.
        let options = self
            .options(end_index.saturating_sub(1).max(1))
            .with_tab_id(target.effective_tab_id())
            .with_prepend_newline(end_index > 2);
        let batch = render_markdown(markdown, &options);
        self.apply(document_id, &batch.requests)?;
        Ok(DocumentSummary::new(
            document_id,
            doc.title.as_deref(),
            target.effective_tab_id(),
        ))
    }

    /// Replaces the target tab's content with rendered markdown in one batch.
    pub fn replace_markdown(
        &self,
        document_id: &str,
        markdown: &str,
        tab_id: Option<&str>,
    ) -> Result<DocumentSummary, DocsError> {
        let doc = self.client.get_document(document_id)?;
        let target = tabs::resolve(&doc, tab_id)?;
        let effective_tab_id = target.effective_tab_id();
        let end_index = target.body(&doc).map_or(1, |body| body.end_index());

        // The final newline cannot be deleted; a body holding only that
        // newline has nothing to clear.
        let mut requests = Vec::new();
        let delete_end = end_index.saturating_sub(1).max(1);
        if delete_end > 1 {
            requests.push(Request::DeleteContentRange(DeleteContentRange {
                range: Range::new(1, delete_end, effective_tab_id.clone()),
            }));
        }
        let options = self.options(1).with_tab_id(effective_tab_id.clone());
        requests.extend(render_markdown(markdown, &options).requests);
        self.apply(document_id, &requests)?;
        Ok(DocumentSummary::new(
            document_id,
            doc.title.as_deref(),
            effective_tab_id,
        ))
    }

    pub fn read_document(
        &self,
        document_id: &str,
        tab_id: Option<&str>,
        mode: ReadMode,
    ) -> Result<DocumentContent, DocsError> {
        if mode == ReadMode::Export {
            if tab_id.is_some() {
                return Err(DocsError::Unsupported {
                    operation: "markdown export",
                });
            }
            let content = self.client.export_markdown(document_id)?;
            return Ok(DocumentContent {
                summary: DocumentSummary::new(document_id, None, None),
                content,
            });
        }

        let doc = self.client.get_document(document_id)?;
        let target = tabs::resolve(&doc, tab_id)?;
        let content = match target.body(&doc) {
            Some(body) if mode == ReadMode::PlainText => extract_plain_text(body),
            Some(body) => extract_markdown(body),
            None => String::new(),
        };
        Ok(DocumentContent {
            summary: DocumentSummary::new(
                document_id,
                doc.title.as_deref(),
                target.effective_tab_id(),
            ),
            content,
        })
    }

    pub fn list_tabs(&self, document_id: &str) -> Result<Vec<TabMetadata>, DocsError> {
        let doc = self.client.get_document(document_id)?;
        Ok(tabs::list_tabs(&doc))
    }

    fn options(&self, start_index: usize) -> RenderOptions {
        RenderOptions::at(start_index).with_code_block(self.code_block.clone())
    }

    fn apply(&self, document_id: &str, requests: &[Request]) -> Result<(), DocsError> {
        if requests.is_empty() {
            log::debug!("nothing to write to {document_id}");
            return Ok(());
        }
        log::debug!("sending {} requests to {document_id}", requests.len());
        self.client.batch_update(document_id, requests)
    }
}
