//! Server-sent-event line decoding.
//!
//! Transport chunks arrive with no line alignment and no UTF-8 alignment,
//! so the decoder buffers both a trailing incomplete byte sequence and a
//! trailing incomplete line, prepending them to the next chunk.

/// Stateful SSE framing decoder.
///
/// Feeds on raw transport bytes and yields complete `data:` payloads.
/// Blank lines and comment lines (leading `:`) are skipped.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending: Vec<u8>,
    buf: String,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one transport chunk, returning every data payload whose line
    /// completed within it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        self.take_valid_utf8();
        self.drain_lines()
    }

    /// Flush at end of transport: a final line without a trailing newline
    /// is still delivered.
    pub fn finish(&mut self) -> Vec<String> {
        if !self.pending.is_empty() {
            // Whatever is left can no longer complete; decode it lossily.
            self.buf.push_str(&String::from_utf8_lossy(&self.pending));
            self.pending.clear();
        }
        if !self.buf.is_empty() && !self.buf.ends_with('\n') {
            self.buf.push('\n');
        }
        self.drain_lines()
    }

    /// Move every complete UTF-8 sequence from the byte buffer into the
    /// text buffer, holding back an incomplete trailing one.
    fn take_valid_utf8(&mut self) {
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    self.buf.push_str(text);
                    self.pending.clear();
                    return;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    self.buf
                        .push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match err.error_len() {
                        // Invalid bytes mid-buffer: replace and keep going.
                        Some(bad) => {
                            self.buf.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + bad);
                        }
                        // Incomplete sequence at the end: wait for more bytes.
                        None => {
                            self.pending.drain(..valid);
                            return;
                        }
                    }
                }
            }
        }
    }

    fn drain_lines(&mut self) -> Vec<String> {
        let mut payloads = Vec::new();
        while let Some(nl) = self.buf.find('\n') {
            let line: String = self.buf.drain(..=nl).collect();
            let line = line.trim();
            if line.is_empty() || line.starts_with(':') {
                continue;
            }
            if let Some(data) = line.strip_prefix("data:") {
                payloads.push(data.trim_start().to_string());
            }
        }
        payloads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_lines() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push(b"data: one\ndata: two\n");
        assert_eq!(payloads, vec!["one", "two"]);
    }

    #[test]
    fn test_partial_line_buffered_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: hel").is_empty());
        assert_eq!(decoder.push(b"lo\n"), vec!["hello"]);
    }

    #[test]
    fn test_split_inside_prefix() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"da").is_empty());
        assert_eq!(decoder.push(b"ta: x\n"), vec!["x"]);
    }

    #[test]
    fn test_multibyte_char_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let bytes = "data: héllo\n".as_bytes();
        // The split lands inside the two-byte encoding of 'é'.
        assert!(decoder.push(&bytes[..8]).is_empty());
        assert_eq!(decoder.push(&bytes[8..]), vec!["héllo"]);
    }

    #[test]
    fn test_invalid_bytes_are_replaced_not_fatal() {
        let mut decoder = SseDecoder::new();
        assert_eq!(decoder.push(b"data: a\xFFb\n"), vec!["a\u{FFFD}b"]);
    }

    #[test]
    fn test_finish_flushes_unterminated_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: last").is_empty());
        assert_eq!(decoder.finish(), vec!["last"]);
        // A second flush has nothing left.
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push(b": keepalive\n\ndata: real\n");
        assert_eq!(payloads, vec!["real"]);
    }

    #[test]
    fn test_crlf_lines() {
        let mut decoder = SseDecoder::new();
        assert_eq!(decoder.push(b"data: a\r\ndata: b\r\n"), vec!["a", "b"]);
    }

    #[test]
    fn test_prefix_without_space() {
        let mut decoder = SseDecoder::new();
        assert_eq!(decoder.push(b"data:[DONE]\n"), vec!["[DONE]"]);
    }

    #[test]
    fn test_non_data_fields_ignored() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"event: message\nid: 7\n").is_empty());
    }
}
