//! Newline-delimited JSON decoding for streamed generation responses.
//!
//! The generation endpoint answers with one JSON object per line:
//!
//! ```text
//! {"model":"llama3.2","response":"Hel","done":false}
//! {"model":"llama3.2","response":"lo","done":false}
//! {"model":"llama3.2","response":"","done":true}
//! ```
//!
//! Transport deliveries do not line up with record boundaries. A delivery
//! may hold several records, or end halfway through one (possibly halfway
//! through a multi-byte character). [`NdjsonDecoder`] keeps the unfinished
//! tail of each delivery and completes it with the next one.
//!
//! Lines that are not valid JSON records are dropped without failing the
//! stream.

use serde::Deserialize;

/// A meaningful record decoded from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamRecord {
    /// A non-empty text fragment to append to the response.
    Text(String),
    /// An in-stream error reported by the server.
    Error(String),
}

#[derive(Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Incremental decoder for newline-delimited JSON generation output
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    pending: Vec<u8>,
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one transport delivery and return every complete record in it.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<StreamRecord> {
        self.pending.extend_from_slice(bytes);

        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };
        let tail = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, tail);

        complete
            .split(|&b| b == b'\n')
            .filter_map(parse_line)
            .collect()
    }

    /// Decode whatever is left once the stream has ended.
    ///
    /// A final record without a trailing newline is still honoured; an
    /// incomplete one is dropped like any other malformed line.
    pub fn finish(&mut self) -> Option<StreamRecord> {
        let rest = std::mem::take(&mut self.pending);
        parse_line(&rest)
    }

    /// Bytes buffered while waiting for the rest of a record.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

fn parse_line(line: &[u8]) -> Option<StreamRecord> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return None;
    }
    let chunk: GenerateChunk = serde_json::from_slice(line).ok()?;
    if let Some(error) = chunk.error {
        return Some(StreamRecord::Error(error));
    }
    chunk
        .response
        .filter(|text| !text.is_empty())
        .map(StreamRecord::Text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> StreamRecord {
        StreamRecord::Text(s.to_string())
    }

    #[test]
    fn test_multiple_records_in_one_delivery() {
        let mut decoder = NdjsonDecoder::new();
        let records = decoder.push(b"{\"response\":\"a\"}\n{\"response\":\"b\"}\n");
        assert_eq!(records, vec![text("a"), text("b")]);
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let mut decoder = NdjsonDecoder::new();
        let records = decoder.push(b"{\"response\":\"ab\"}\nNOT_JSON\n{\"response\":\"c\"}\n");
        assert_eq!(records, vec![text("ab"), text("c")]);
    }

    #[test]
    fn test_record_split_across_deliveries() {
        let mut decoder = NdjsonDecoder::new();
        assert_eq!(decoder.push(b"{\"respo"), vec![]);
        assert_eq!(decoder.push(b"nse\":\"hi\"}\n{\"response\""), vec![text("hi")]);
        assert_eq!(decoder.push(b":\"!\"}\n"), vec![text("!")]);
    }

    #[test]
    fn test_multibyte_character_split_across_deliveries() {
        let line = "{\"response\":\"héllo\"}\n".as_bytes();
        let split = line.iter().position(|&b| b == 0xc3).unwrap() + 1;

        let mut decoder = NdjsonDecoder::new();
        assert!(decoder.push(&line[..split]).is_empty());
        assert_eq!(decoder.push(&line[split..]), vec![text("héllo")]);
    }

    #[test]
    fn test_final_record_without_newline() {
        let mut decoder = NdjsonDecoder::new();
        assert!(decoder.push(b"{\"response\":\"end\"}").is_empty());
        assert_eq!(decoder.finish(), Some(text("end")));
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_truncated_tail_is_dropped_at_finish() {
        let mut decoder = NdjsonDecoder::new();
        decoder.push(b"{\"response\":\"ok\"}\n{\"respon");
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_records_without_text_are_ignored() {
        let mut decoder = NdjsonDecoder::new();
        let records = decoder.push(
            b"{\"model\":\"m\",\"done\":false}\n{\"response\":\"\",\"done\":true}\n\n  \n",
        );
        assert!(records.is_empty());
    }

    #[test]
    fn test_in_stream_error() {
        let mut decoder = NdjsonDecoder::new();
        let records = decoder.push(b"{\"response\":\"a\"}\n{\"error\":\"model not found\"}\n");
        assert_eq!(
            records,
            vec![text("a"), StreamRecord::Error("model not found".to_string())]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut decoder = NdjsonDecoder::new();
        let records = decoder.push(b"{\"response\":\"x\"}\r\n{\"response\":\"y\"}\r\n");
        assert_eq!(records, vec![text("x"), text("y")]);
    }
}
