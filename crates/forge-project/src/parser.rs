//! Incremental parser for the project wire grammar.
//!
//! The grammar is a small XML subset: one `<project>` root containing an
//! optional `<projectName>` leaf, `<file path="...">` elements with CDATA
//! bodies, `<update file="...">` elements holding ordered
//! `<search>`/`<replace>` CDATA pairs, `<command>` elements (CDATA or plain
//! text) and an optional `<explanation>`.
//!
//! Input arrives as arbitrary text fragments with no tag alignment: a chunk
//! may split a tag name, an attribute value or a CDATA marker at any byte.
//! The parser keeps unconsumed text buffered across calls and never consumes
//! a construct until it is complete, so feeding a document one byte at a time
//! yields the same result as feeding it whole.

use crate::document::ProjectDocument;
use crate::document::UpdateOp;

pub(crate) const ROOT_OPEN: &str = "<project>";
pub(crate) const ROOT_CLOSE: &str = "</project>";
const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// The element whose body is currently being accumulated.
///
/// The grammar nests at most one leaf under the root, plus the active
/// search/replace slot inside an update, so a tagged variant is enough —
/// no general-purpose stack is needed.
#[derive(Debug)]
enum Context {
    Idle,
    File { path: Option<String>, content: String },
    Update { file: Option<String>, search: Option<String>, leaf: UpdateLeaf },
    Command { text: String },
    Explanation { text: String },
}

#[derive(Debug)]
enum UpdateLeaf {
    Idle,
    Search(String),
    Replace(String),
}

/// Incremental parsing cursor over the project grammar.
///
/// Exclusively owned by one generation session. `process_chunk` must be
/// called with fragments in arrival order.
#[derive(Debug)]
pub struct StreamingParser {
    buf: String,
    in_root: bool,
    in_cdata: bool,
    cdata: String,
    context: Context,
    doc: ProjectDocument,
}

impl Default for StreamingParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingParser {
    pub fn new() -> Self {
        Self {
            buf: String::new(),
            in_root: false,
            in_cdata: false,
            cdata: String::new(),
            context: Context::Idle,
            doc: ProjectDocument::default(),
        }
    }

    /// Feed the next fragment and return the refreshed document snapshot.
    pub fn process_chunk(&mut self, chunk: &str) -> ProjectDocument {
        self.buf.push_str(chunk);

        if !self.in_root {
            // Conversational prose before the root is never parsed.
            match self.buf.find(ROOT_OPEN) {
                Some(at) => {
                    self.buf.drain(..at + ROOT_OPEN.len());
                    self.in_root = true;
                }
                None => return self.snapshot(),
            }
        }

        self.scan();
        self.snapshot()
    }

    /// Current document state. Idempotent between chunks.
    pub fn snapshot(&self) -> ProjectDocument {
        self.doc.clone()
    }

    /// One left-to-right pass over the buffered text. Consumes everything it
    /// can route; leaves partial tags and partial CDATA markers in place for
    /// the next pass.
    fn scan(&mut self) {
        let mut i = 0;

        while i < self.buf.len() {
            if self.in_cdata {
                match self.buf[i..].find(CDATA_CLOSE) {
                    Some(j) => {
                        self.cdata.push_str(&self.buf[i..i + j]);
                        i += j + CDATA_CLOSE.len();
                        self.in_cdata = false;
                        let text = std::mem::take(&mut self.cdata);
                        self.route_text(&text);
                    }
                    None => {
                        // Hold back a trailing prefix of "]]>" so a close
                        // marker split across chunks is still recognized.
                        let keep = partial_suffix_len(&self.buf[i..], CDATA_CLOSE);
                        let upto = self.buf.len() - keep;
                        self.cdata.push_str(&self.buf[i..upto]);
                        i = upto;
                        break;
                    }
                }
                continue;
            }

            let rest = &self.buf[i..];
            let Some(lt) = rest.find('<') else {
                // Plain text to the end of the buffer.
                let text = rest.to_string();
                i = self.buf.len();
                self.route_text(&text);
                break;
            };

            if lt > 0 {
                let text = self.buf[i..i + lt].to_string();
                self.route_text(&text);
                i += lt;
            }

            let at = i;
            let rest = &self.buf[at..];

            if rest.starts_with(CDATA_OPEN) {
                i += CDATA_OPEN.len();
                self.in_cdata = true;
                self.cdata.clear();
                continue;
            }
            if CDATA_OPEN.starts_with(rest) {
                // Buffer ends inside "<![CDATA[".
                break;
            }

            let Some(gt) = rest.find('>') else {
                // Buffer ends inside a tag; reprocess once more data arrives.
                break;
            };

            let tag_body = rest[1..gt].to_string();
            let after = at + gt + 1;

            if let Some(name) = tag_body.strip_prefix('/') {
                i = after;
                self.close_tag(name.trim());
                if !self.in_root {
                    // Root closed: anything further is trailing prose.
                    i = self.buf.len();
                    break;
                }
                continue;
            }

            let (name, attrs) = split_tag(&tag_body);

            if name == "projectName" {
                // Captured immediately: the name is visible in snapshots
                // before its close tag arrives.
                match self.buf[after..].find('<') {
                    Some(j) => {
                        let text = self.buf[after..after + j].trim().to_string();
                        if !text.is_empty() {
                            self.doc.project_name = text;
                        }
                        i = after + j;
                    }
                    None => {
                        // Name may be split across chunks; wait.
                        i = at;
                        break;
                    }
                }
                continue;
            }

            i = after;
            self.open_tag(name, attrs);
        }

        self.buf.drain(..i);
    }

    fn open_tag(&mut self, name: &str, attrs: &str) {
        match name {
            "file" => {
                self.context = Context::File {
                    path: attr_value(attrs, "path"),
                    content: String::new(),
                };
            }
            "update" => {
                self.context = Context::Update {
                    file: attr_value(attrs, "file"),
                    search: None,
                    leaf: UpdateLeaf::Idle,
                };
            }
            "search" => {
                if let Context::Update { leaf, .. } = &mut self.context {
                    *leaf = UpdateLeaf::Search(String::new());
                }
            }
            "replace" => {
                if let Context::Update { leaf, .. } = &mut self.context {
                    *leaf = UpdateLeaf::Replace(String::new());
                }
            }
            "command" => {
                self.context = Context::Command { text: String::new() };
            }
            "explanation" => {
                self.context = Context::Explanation { text: String::new() };
            }
            // Duplicate root opens and unknown elements are ignored.
            _ => {}
        }
    }

    fn close_tag(&mut self, name: &str) {
        match name {
            "file" => {
                if let Context::File { path, content } =
                    std::mem::replace(&mut self.context, Context::Idle)
                {
                    // Committed only when both path and content are present.
                    if let Some(path) = path {
                        if !content.is_empty() {
                            self.doc.files.insert(path, content);
                        }
                    }
                }
            }
            "search" => {
                if let Context::Update { search, leaf, .. } = &mut self.context {
                    if matches!(leaf, UpdateLeaf::Search(_)) {
                        if let UpdateLeaf::Search(text) =
                            std::mem::replace(leaf, UpdateLeaf::Idle)
                        {
                            *search = Some(text);
                        }
                    }
                }
            }
            "replace" => {
                if let Context::Update { file, search, leaf } = &mut self.context {
                    if matches!(leaf, UpdateLeaf::Replace(_)) {
                        if let UpdateLeaf::Replace(replace) =
                            std::mem::replace(leaf, UpdateLeaf::Idle)
                        {
                            // A pair is recorded at its replace close; the
                            // update's file attribute is shared by every
                            // pair inside it.
                            if let (Some(file), Some(search)) = (file.clone(), search.take())
                            {
                                self.doc.updates.push(UpdateOp { file, search, replace });
                            }
                        }
                    }
                }
            }
            "update" => {
                // Pairs were recorded as their replace closes arrived; an
                // unmatched trailing search is dropped here.
                self.context = Context::Idle;
            }
            "command" => {
                if let Context::Command { text } =
                    std::mem::replace(&mut self.context, Context::Idle)
                {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        self.doc.commands.push(trimmed.to_string());
                    }
                }
            }
            "explanation" => {
                if let Context::Explanation { text } =
                    std::mem::replace(&mut self.context, Context::Idle)
                {
                    self.doc.explanation = text.trim().to_string();
                }
            }
            "project" => {
                self.context = Context::Idle;
                self.in_root = false;
                self.doc.is_complete = true;
            }
            _ => {}
        }
    }

    /// Route extracted text (a closed CDATA section or ordinary characters)
    /// to the open leaf accumulator, or discard it when none is open.
    fn route_text(&mut self, text: &str) {
        match &mut self.context {
            Context::File { content, .. } => content.push_str(text),
            Context::Update { leaf, .. } => match leaf {
                UpdateLeaf::Search(acc) | UpdateLeaf::Replace(acc) => acc.push_str(text),
                UpdateLeaf::Idle => {}
            },
            Context::Command { text: acc } | Context::Explanation { text: acc } => {
                acc.push_str(text)
            }
            Context::Idle => {}
        }
    }
}

/// Split a tag body into (name, attribute text).
fn split_tag(body: &str) -> (&str, &str) {
    let body = body.trim_end_matches('/').trim();
    match body.find(char::is_whitespace) {
        Some(at) => (&body[..at], body[at..].trim_start()),
        None => (body, ""),
    }
}

/// Extract a quoted attribute value, e.g. `path="src/main.rs"`.
fn attr_value(attrs: &str, key: &str) -> Option<String> {
    let mut rest = attrs;
    while let Some(at) = rest.find(key) {
        let after = rest[at + key.len()..].trim_start();
        if let Some(eq) = after.strip_prefix('=') {
            let eq = eq.trim_start();
            let quote = eq.chars().next()?;
            if quote == '"' || quote == '\'' {
                let body = &eq[1..];
                if let Some(end) = body.find(quote) {
                    return Some(body[..end].to_string());
                }
            }
            return None;
        }
        rest = &rest[at + key.len()..];
    }
    None
}

/// Length of the longest proper prefix of `marker` that `text` ends with.
fn partial_suffix_len(text: &str, marker: &str) -> usize {
    for k in (1..marker.len()).rev() {
        if text.ends_with(&marker[..k]) {
            return k;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DEFAULT_PROJECT_NAME;

    const SCENARIO: &str = "<project><projectName>Demo</projectName>\
         <file path=\"a.txt\"><![CDATA[hello]]></file></project>";

    fn parse_whole(input: &str) -> ProjectDocument {
        let mut parser = StreamingParser::new();
        parser.process_chunk(input)
    }

    fn parse_in_pieces(input: &str, size: usize) -> ProjectDocument {
        let mut parser = StreamingParser::new();
        let chars: Vec<char> = input.chars().collect();
        let mut doc = parser.snapshot();
        for piece in chars.chunks(size) {
            let piece: String = piece.iter().collect();
            doc = parser.process_chunk(&piece);
        }
        doc
    }

    #[test]
    fn test_scenario_single_shot() {
        let doc = parse_whole(SCENARIO);
        assert_eq!(doc.project_name, "Demo");
        assert_eq!(doc.files.len(), 1);
        assert_eq!(doc.files["a.txt"], "hello");
        assert!(doc.updates.is_empty());
        assert!(doc.commands.is_empty());
        assert_eq!(doc.explanation, "");
        assert!(doc.is_complete);
    }

    #[test]
    fn test_scenario_split_at_every_boundary() {
        let whole = parse_whole(SCENARIO);
        for at in 1..SCENARIO.len() {
            let mut parser = StreamingParser::new();
            parser.process_chunk(&SCENARIO[..at]);
            let doc = parser.process_chunk(&SCENARIO[at..]);
            assert_eq!(doc, whole, "diverged when split at byte {at}");
        }
    }

    #[test]
    fn test_fragmentation_is_invisible() {
        let input = "Sure, here you go:\n<project>\
             <projectName>todo-app</projectName>\
             <file path=\"src/index.js\"><![CDATA[console.log(\"<hi>\");\n]]></file>\
             <file path=\"README.md\"><![CDATA[# Todo\n]]></file>\
             <update file=\"src/app.js\">\
             <search><![CDATA[let x = 1;]]></search>\
             <replace><![CDATA[let x = 2;]]></replace>\
             <search><![CDATA[foo()]]></search>\
             <replace><![CDATA[bar()]]></replace>\
             </update>\
             <command>npm install</command>\
             <command><![CDATA[npm run dev]]></command>\
             <explanation>  A small demo.  </explanation>\
             </project>\nEnjoy!";

        let whole = parse_whole(input);
        assert!(whole.is_complete);
        assert_eq!(whole.files.len(), 2);
        assert_eq!(whole.updates.len(), 2);
        assert_eq!(whole.commands, vec!["npm install", "npm run dev"]);
        assert_eq!(whole.explanation, "A small demo.");

        for size in 1..=9 {
            assert_eq!(
                parse_in_pieces(input, size),
                whole,
                "diverged at fragment size {size}"
            );
        }
    }

    #[test]
    fn test_is_complete_flips_only_at_root_close() {
        let mut parser = StreamingParser::new();
        let head = "<project><file path=\"a\"><![CDATA[x]]></file>";
        for ch in head.chars() {
            let doc = parser.process_chunk(&ch.to_string());
            assert!(!doc.is_complete);
        }
        let doc = parser.process_chunk("</project>");
        assert!(doc.is_complete);
        // Sticky thereafter.
        let doc = parser.process_chunk("trailing prose");
        assert!(doc.is_complete);
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let mut parser = StreamingParser::new();
        parser.process_chunk("<project><file path=\"a\"><![CDATA[one]]></file>");
        let first = parser.snapshot();
        let second = parser.snapshot();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_file_path_overwrites() {
        let doc = parse_whole(
            "<project>\
             <file path=\"a.txt\"><![CDATA[first]]></file>\
             <file path=\"a.txt\"><![CDATA[second]]></file>\
             </project>",
        );
        assert_eq!(doc.files.len(), 1);
        assert_eq!(doc.files["a.txt"], "second");
    }

    #[test]
    fn test_update_pairs_with_angle_brackets_in_cdata() {
        let doc = parse_whole(
            "<project><update file=\"index.html\">\
             <search><![CDATA[<div class=\"old\">]]></search>\
             <replace><![CDATA[<div class=\"new\">]]></replace>\
             <search><![CDATA[a < b && b > c]]></search>\
             <replace><![CDATA[a <= b]]></replace>\
             </update></project>",
        );
        assert_eq!(doc.updates.len(), 2);
        assert_eq!(doc.updates[0].search, "<div class=\"old\">");
        assert_eq!(doc.updates[0].replace, "<div class=\"new\">");
        assert_eq!(doc.updates[1].search, "a < b && b > c");
        assert_eq!(doc.updates[1].replace, "a <= b");
        assert!(doc.updates.iter().all(|op| op.file == "index.html"));
    }

    #[test]
    fn test_command_is_trimmed() {
        let doc = parse_whole("<project><command>  npm install \n</command></project>");
        assert_eq!(doc.commands, vec!["npm install"]);
    }

    #[test]
    fn test_empty_command_is_dropped() {
        let doc = parse_whole("<project><command>   </command></project>");
        assert!(doc.commands.is_empty());
    }

    #[test]
    fn test_leading_prose_is_discarded() {
        let doc = parse_whole(
            "Sure, here you go:\n<command>rm -rf /</command>\
             <project><file path=\"a\"><![CDATA[ok]]></file></project>",
        );
        assert!(doc.commands.is_empty());
        assert_eq!(doc.files["a"], "ok");
        assert!(!doc.explanation.contains("Sure"));
    }

    #[test]
    fn test_unclosed_file_never_commits() {
        let doc = parse_whole("<project><file path=\"a\"><![CDATA[partial");
        assert!(doc.files.is_empty());
        assert!(!doc.is_complete);
    }

    #[test]
    fn test_file_without_path_never_commits() {
        let doc = parse_whole("<project><file><![CDATA[orphan]]></file></project>");
        assert!(doc.files.is_empty());
    }

    #[test]
    fn test_file_with_empty_content_never_commits() {
        let doc = parse_whole("<project><file path=\"a\"></file></project>");
        assert!(doc.files.is_empty());
    }

    #[test]
    fn test_trailing_search_without_replace_is_dropped() {
        let doc = parse_whole(
            "<project><update file=\"a\">\
             <search><![CDATA[x]]></search>\
             <replace><![CDATA[y]]></replace>\
             <search><![CDATA[dangling]]></search>\
             </update></project>",
        );
        assert_eq!(doc.updates.len(), 1);
        assert_eq!(doc.updates[0].search, "x");
    }

    #[test]
    fn test_project_name_visible_before_close() {
        let mut parser = StreamingParser::new();
        let doc = parser.process_chunk("<project><projectName>Demo");
        assert_eq!(doc.project_name, DEFAULT_PROJECT_NAME);
        let doc = parser.process_chunk("<");
        assert_eq!(doc.project_name, "Demo");
    }

    #[test]
    fn test_plain_text_command_without_cdata() {
        let doc = parse_whole("<project><command>cargo build</command></project>");
        assert_eq!(doc.commands, vec!["cargo build"]);
    }

    #[test]
    fn test_cdata_with_bracket_runs_inside() {
        let doc = parse_whole(
            "<project><file path=\"a\"><![CDATA[arr[idx]] = v; x]]></file></project>",
        );
        assert_eq!(doc.files["a"], "arr[idx]] = v; x");
    }

    #[test]
    fn test_cdata_close_split_between_chunks() {
        let mut parser = StreamingParser::new();
        parser.process_chunk("<project><file path=\"a\"><![CDATA[hello]]");
        let doc = parser.process_chunk("></file></project>");
        assert_eq!(doc.files["a"], "hello");
        assert!(doc.is_complete);
    }

    #[test]
    fn test_default_document_before_root() {
        let mut parser = StreamingParser::new();
        let doc = parser.process_chunk("thinking about it...");
        assert_eq!(doc, ProjectDocument::default());
    }
}
