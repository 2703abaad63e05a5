//! Buffered (non-streaming) parse path.
//!
//! Applies the same grammar as [`StreamingParser`] to one complete string.
//! Running the complete text through a fresh incremental parser keeps the
//! two paths in exact agreement by construction.

use crate::document::ProjectDocument;
use crate::error::ProjectParseError;
use crate::parser::{StreamingParser, ROOT_CLOSE, ROOT_OPEN};
use tracing::debug;

/// Parse a complete response into a [`ProjectDocument`].
///
/// Prose before the first `<project>` and after the last `</project>` is
/// tolerated and discarded. Fails if no root element is present, or if the
/// document yields neither files nor updates.
pub fn parse_complete(input: &str) -> Result<ProjectDocument, ProjectParseError> {
    let start = input.find(ROOT_OPEN).ok_or(ProjectParseError::MissingRoot)?;
    if start > 0 {
        debug!(discarded = start, "dropping prose before project root");
    }

    let end = input
        .rfind(ROOT_CLOSE)
        .map(|at| at + ROOT_CLOSE.len())
        .unwrap_or(input.len());
    let body = &input[start..end.max(start + ROOT_OPEN.len())];

    let mut parser = StreamingParser::new();
    let doc = parser.process_chunk(body);

    if doc.files.is_empty() && doc.updates.is_empty() {
        return Err(ProjectParseError::EmptyProject);
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "Here is your project:\n<project>\
         <projectName>blog</projectName>\
         <file path=\"index.html\"><![CDATA[<html></html>]]></file>\
         <command>npm start</command>\
         <explanation>A blog.</explanation>\
         </project>\nLet me know how it goes.";

    #[test]
    fn test_parses_with_surrounding_prose() {
        let doc = parse_complete(DOC).unwrap();
        assert_eq!(doc.project_name, "blog");
        assert_eq!(doc.files["index.html"], "<html></html>");
        assert_eq!(doc.commands, vec!["npm start"]);
        assert_eq!(doc.explanation, "A blog.");
        assert!(doc.is_complete);
    }

    #[test]
    fn test_agrees_with_incremental_parser() {
        let buffered = parse_complete(DOC).unwrap();
        let mut parser = StreamingParser::new();
        let mut incremental = parser.snapshot();
        for chunk in DOC.as_bytes().chunks(3) {
            incremental = parser.process_chunk(std::str::from_utf8(chunk).unwrap());
        }
        assert_eq!(buffered, incremental);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let err = parse_complete("I can't do that.").unwrap_err();
        assert!(matches!(err, ProjectParseError::MissingRoot));
    }

    #[test]
    fn test_empty_project_is_an_error() {
        let err = parse_complete("<project><explanation>hm</explanation></project>")
            .unwrap_err();
        assert!(matches!(err, ProjectParseError::EmptyProject));
    }

    #[test]
    fn test_updates_only_project_is_accepted() {
        let doc = parse_complete(
            "<project><update file=\"a.js\">\
             <search><![CDATA[x]]></search>\
             <replace><![CDATA[y]]></replace>\
             </update></project>",
        )
        .unwrap();
        assert_eq!(doc.updates.len(), 1);
        assert!(doc.files.is_empty());
    }
}
