//! Error types for the forge-project crate.

/// Errors from the buffered (non-streaming) parse path.
///
/// The incremental parser never fails: malformed fragments at stream
/// boundaries resolve themselves as more data arrives, and unmatched
/// elements are dropped by omission.
#[derive(Debug, thiserror::Error)]
pub enum ProjectParseError {
    /// No `<project>` root element was found in the response.
    #[error("no <project> root element found in response")]
    MissingRoot,

    /// A root element was found but it contained no files or updates.
    #[error("project contained no files or updates")]
    EmptyProject,
}
