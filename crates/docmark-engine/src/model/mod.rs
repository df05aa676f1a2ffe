//! Wire types for the Google Docs REST API.

pub mod document;
pub mod requests;
pub mod style;

pub use document::*;
pub use requests::*;
pub use style::*;
