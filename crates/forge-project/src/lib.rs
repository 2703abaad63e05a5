//! forge-project: project document model and wire-grammar parsers.

mod buffered;
mod document;
mod error;
mod parser;

pub use buffered::parse_complete;
pub use document::{ProjectDocument, UpdateOp, DEFAULT_PROJECT_NAME};
pub use error::ProjectParseError;
pub use parser::StreamingParser;
