pub mod error;
pub mod extract;
pub mod model;
pub mod render;
pub mod service;
pub mod tabs;

// Re-export key types for easier usage
pub use error::{CodeStyleError, DocsError};
pub use extract::{extract_markdown, extract_plain_text};
pub use model::{BatchUpdate, Document, Request};
pub use render::{CodeBlockStyle, RenderOptions, RenderedBatch, render_markdown};
pub use service::{DocsClient, DocsService, DocumentContent, DocumentSummary, ReadMode};
pub use tabs::{ResolvedTarget, TabMetadata, TabNode, flatten, list_tabs, resolve};
