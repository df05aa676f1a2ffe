use crate::extract::LIGHT_BACKGROUND_MIN;

#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("Tab '{tab_id}' not found in document.")]
    TabNotFound { tab_id: String },
    #[error("{operation} does not support tab-scoped access; omit the tab id")]
    Unsupported { operation: &'static str },
    #[error("Missing Google credentials: {0}")]
    MissingCredentials(String),
    #[error("{0}")]
    Service(String),
}

/// A code-block style whose text would not be read back as code.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodeStyleError {
    #[error("code font '{font_family}' is not recognized as monospace")]
    NotMonospace { font_family: String },
    #[error(
        "code background {background} must be between {min} and 1.0",
        min = LIGHT_BACKGROUND_MIN
    )]
    BackgroundNotLight { background: f64 },
}

impl DocsError {
    pub fn tab_not_found(tab_id: impl Into<String>) -> Self {
        Self::TabNotFound {
            tab_id: tab_id.into(),
        }
    }
}
