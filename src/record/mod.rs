use crate::error::RecordError;
use crate::lines::read_lines;
use serde_json::Value;
use std::io;
use std::path::Path;

// ===================================================================
// Record: one JSONL line, loosely typed
// ===================================================================

/// A single line of a Claude Code `.jsonl` transcript.
///
/// The log format has drifted across Claude Code releases, so instead of a
/// rigid schema the record keeps the raw JSON and exposes accessors that
/// return `None` for anything missing or of the wrong shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Record(Value);

/// `message.content` is either a plain string (user text) or an array of
/// content items (`text`, `tool_use`, `tool_result`, ...).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Content<'a> {
    Text(&'a str),
    Items(&'a [Value]),
}

impl Record {
    /// Parse one line. Only JSON syntax (and UTF-8 encoding) is checked;
    /// shape is up to the caller.
    pub fn parse(line: impl AsRef<[u8]>) -> Result<Self, RecordError> {
        Ok(Self(serde_json::from_slice(line.as_ref())?))
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// The `type` discriminator (`"user"`, `"assistant"`, `"summary"`, ...).
    pub fn record_type(&self) -> Option<&str> {
        self.str_field("type")
    }

    pub fn is_summary(&self) -> bool {
        self.record_type() == Some("summary")
    }

    /// The `summary` field, if present and non-empty.
    pub fn summary(&self) -> Option<&str> {
        self.str_field("summary").filter(|s| !s.is_empty())
    }

    pub fn message(&self) -> Option<&Value> {
        self.0.get("message").filter(|m| m.is_object())
    }

    pub fn role(&self) -> Option<&str> {
        self.message()?.get("role").and_then(Value::as_str)
    }

    pub fn content(&self) -> Option<Content<'_>> {
        match self.message()?.get("content")? {
            Value::String(s) => Some(Content::Text(s)),
            Value::Array(items) => Some(Content::Items(items)),
            _ => None,
        }
    }

    /// The `toolUseResult` payload. `null` counts as absent.
    pub fn tool_use_result(&self) -> Option<&Value> {
        self.0.get("toolUseResult").filter(|v| !v.is_null())
    }

    pub fn is_meta(&self) -> bool {
        self.0.get("isMeta").and_then(Value::as_bool).unwrap_or(false)
    }

    /// The `sessionId` field, if present and non-empty.
    pub fn session_id(&self) -> Option<&str> {
        self.str_field("sessionId").filter(|s| !s.is_empty())
    }

    /// The raw `timestamp` field. May be empty; callers decide what that means.
    pub fn timestamp(&self) -> Option<&str> {
        self.str_field("timestamp")
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

// ===================================================================
// Reading the head of a transcript file
// ===================================================================

/// The leading records of a transcript, plus any lines that failed to parse
/// (1-based line number and error).
#[derive(Debug, Default)]
pub struct LeadingRecords {
    pub records: Vec<Record>,
    pub malformed: Vec<(usize, serde_json::Error)>,
}

/// Read and parse up to `limit` non-blank lines from `path`.
///
/// Malformed lines, including ones that aren't valid UTF-8, are collected
/// rather than aborting the read; they count toward the limit. I/O errors
/// abort immediately.
pub fn read_leading(path: &Path, limit: Option<usize>) -> io::Result<LeadingRecords> {
    let mut leading = LeadingRecords::default();
    for line in read_lines(path, limit)? {
        let (line_no, line) = line?;
        match Record::parse(&line) {
            Ok(record) => leading.records.push(record),
            Err(RecordError::Malformed(e)) => leading.malformed.push((line_no, e)),
        }
    }
    Ok(leading)
}

#[cfg(test)]
mod tests;
