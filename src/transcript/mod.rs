use crate::error::SkipReason;
use crate::record::{Content, Record, read_leading};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Records read from the head of each transcript. Identity and summary data
/// sit near the start of a conversation, so there is no need to go further.
pub const DEFAULT_RECORD_LIMIT: usize = 10;

/// Leading tokens of a user-typed `!` shell command.
const COMMAND_INPUT_MARKERS: &[&str] = &["<bash-input>"];

/// Leading tokens of captured shell or slash-command output.
const COMMAND_OUTPUT_MARKERS: &[&str] = &[
    "<bash-stdout>",
    "<bash-stderr>",
    "<local-command-stdout>",
];

// ===================================================================
// Per-record classification
// ===================================================================

/// Coarse category of a record, used for the inspection view and to decide
/// which records may stand in as a conversation summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Meta,
    CommandInput,
    CommandOutput,
    ToolResult,
    ToolUse,
    /// Ordinary conversational text (unclassified).
    Text,
}

impl RecordKind {
    /// Display label; `None` for ordinary text.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::Meta => Some("meta"),
            Self::CommandInput => Some("command-input"),
            Self::CommandOutput => Some("command-output"),
            Self::ToolResult => Some("tool-result"),
            Self::ToolUse => Some("tool-use"),
            Self::Text => None,
        }
    }
}

/// What a single record says, and what kind of record it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    pub description: Option<String>,
    pub kind: RecordKind,
    /// The description came from an explicit `summary` field.
    pub from_summary_field: bool,
}

/// Derive a record's description and kind.
///
/// Description sources, first match wins: the `summary` field, slash-command
/// markup in a user string, the plain string content, the text and tool_use
/// items of array content, and finally the `toolUseResult` payload.
pub fn describe_record(record: &Record) -> RecordView {
    let mut has_tool_use = false;
    let mut from_summary_field = false;

    let description = if let Some(summary) = record.summary() {
        from_summary_field = true;
        Some(summary.to_string())
    } else {
        let from_content = match record.content() {
            Some(Content::Text(text)) => {
                let command = if record.role() == Some("user") {
                    command_markup(text)
                } else {
                    None
                };
                Some(command.unwrap_or_else(|| text.to_string()))
            }
            Some(Content::Items(items)) => {
                let (text, tool_use) = render_items(items);
                has_tool_use = tool_use;
                text
            }
            None => None,
        };
        from_content.or_else(|| record.tool_use_result().map(render_value))
    };

    let kind = classify_kind(record, description.as_deref(), has_tool_use);
    RecordView {
        description,
        kind,
        from_summary_field,
    }
}

fn classify_kind(record: &Record, description: Option<&str>, has_tool_use: bool) -> RecordKind {
    let starts_with_any = |markers: &[&str]| {
        description
            .map(str::trim_start)
            .is_some_and(|d| markers.iter().any(|m| d.starts_with(m)))
    };

    if record.is_meta() {
        RecordKind::Meta
    } else if starts_with_any(COMMAND_INPUT_MARKERS) {
        RecordKind::CommandInput
    } else if starts_with_any(COMMAND_OUTPUT_MARKERS) {
        RecordKind::CommandOutput
    } else if record.tool_use_result().is_some() {
        RecordKind::ToolResult
    } else if has_tool_use {
        RecordKind::ToolUse
    } else {
        RecordKind::Text
    }
}

/// Split `text` into its `<tag>inner</tag>` elements.
///
/// Returns `None` unless the whole (trimmed) text is a sequence of balanced
/// elements separated only by whitespace. Tag names are restricted to
/// alphanumerics, `-` and `_`.
fn markup_elements(text: &str) -> Option<Vec<(&str, &str)>> {
    let mut elements = Vec::new();
    let mut rest = text.trim();
    while !rest.is_empty() {
        let after_open = rest.strip_prefix('<')?;
        let name_len = after_open.find('>')?;
        let name = &after_open[..name_len];
        let valid_name = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid_name {
            return None;
        }
        let body = &after_open[name_len + 1..];
        let close = format!("</{name}>");
        let inner_len = body.find(&close)?;
        elements.push((name, &body[..inner_len]));
        rest = body[inner_len + close.len()..].trim_start();
    }
    Some(elements)
}

/// `"/name args"` for slash-command markup. The content must consist only of
/// well-formed elements, including both `command-name` and `command-args`.
fn command_markup(text: &str) -> Option<String> {
    let elements = markup_elements(text)?;
    let find = |tag: &str| {
        elements
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, inner)| inner.trim())
    };
    let name = find("command-name")?;
    let args = find("command-args")?;
    let command = format!("{name} {args}");
    Some(command.trim_end().to_string())
}

/// Join the text and tool_use items of array content, one per line.
/// Returns `None` when no item contributed a line.
fn render_items(items: &[Value]) -> (Option<String>, bool) {
    let mut lines = Vec::new();
    let mut has_tool_use = false;
    for item in items {
        match item.get("type").and_then(Value::as_str) {
            Some("text") => {
                if let Some(text) = item.get("text").and_then(Value::as_str) {
                    lines.push(text.to_string());
                }
            }
            Some("tool_use") => {
                has_tool_use = true;
                lines.push(render_tool_use(item));
            }
            _ => {}
        }
    }
    let text = if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    };
    (text, has_tool_use)
}

fn render_tool_use(item: &Value) -> String {
    let name = item.get("name").and_then(Value::as_str).unwrap_or("(unknown)");
    match item.get("input").filter(|v| !v.is_null()) {
        Some(input) => format!("[tool_use: {name}] {input}"),
        None => format!("[tool_use: {name}]"),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ===================================================================
// Conversation summary
// ===================================================================

/// Identity and one-line summary of a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub session_id: String,
    pub timestamp: String,
    pub summary: String,
}

/// Summarize the leading records of one transcript.
///
/// The root record is the first one carrying a `sessionId`; it must also
/// carry a timestamp. The summary is the first `type: "summary"` record's
/// text, falling back to the first plain user message.
pub fn summarize(records: &[Record]) -> Result<Summary, SkipReason> {
    let mut explicit: Option<&str> = None;
    let mut candidate: Option<String> = None;
    let mut root: Option<(&str, &str)> = None;

    for (index, record) in records.iter().enumerate() {
        if explicit.is_none() && record.is_summary() {
            explicit = record.summary();
        }

        if root.is_none() {
            if let Some(session_id) = record.session_id() {
                match record.timestamp().filter(|t| !t.is_empty()) {
                    Some(timestamp) => root = Some((session_id, timestamp)),
                    None => {
                        return Err(SkipReason::MissingTimestamp {
                            index,
                            session_id: session_id.to_string(),
                        });
                    }
                }
            }
        }

        if candidate.is_none() && record.role() == Some("user") {
            let view = describe_record(record);
            if view.kind == RecordKind::Text && !view.from_summary_field {
                candidate = view.description.filter(|d| !d.trim().is_empty());
            }
        }
    }

    let summary = explicit.map(str::to_string).or(candidate);
    match (root, summary) {
        (Some((session_id, timestamp)), Some(summary)) => Ok(Summary {
            session_id: session_id.to_string(),
            timestamp: timestamp.to_string(),
            summary,
        }),
        _ => Err(SkipReason::NoUsableContent),
    }
}

// ===================================================================
// Transcript: one catalog entry per file
// ===================================================================

/// A summarized transcript file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub session_id: String,
    /// ISO-8601, as written by Claude Code.
    pub timestamp: String,
    pub summary: String,
    pub path: PathBuf,
}

impl Transcript {
    /// Read the head of `path` and summarize it.
    ///
    /// Malformed lines are skipped with a warning. If the file then has no
    /// usable content, the first malformed line is blamed instead.
    pub fn load(path: &Path, record_limit: usize) -> Result<Self, SkipReason> {
        let leading = read_leading(path, Some(record_limit))?;
        for (line, err) in &leading.malformed {
            warn!(path = %path.display(), line, "malformed transcript record: {err}");
        }

        match summarize(&leading.records) {
            Ok(s) => Ok(Self {
                session_id: s.session_id,
                timestamp: s.timestamp,
                summary: s.summary,
                path: path.to_path_buf(),
            }),
            Err(SkipReason::NoUsableContent) => match leading.malformed.into_iter().next() {
                Some((line, source)) => Err(SkipReason::Malformed { line, source }),
                None => {
                    debug!(path = %path.display(), "no usable content");
                    Err(SkipReason::NoUsableContent)
                }
            },
            Err(e) => Err(e),
        }
    }
}

// ===================================================================
// Inspection view
// ===================================================================

/// Debug view of one record: `name` encodes index, role and kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedDescription {
    pub name: String,
    pub description: String,
}

/// Describe every record. A pure projection; never affects `summarize`.
pub fn classify(records: &[Record]) -> Vec<ClassifiedDescription> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let view = describe_record(record);
            let role = record.role().or(record.record_type()).unwrap_or("?");
            let name = match view.kind.label() {
                Some(kind) => format!("{index}: {role} [{kind}]"),
                None => format!("{index}: {role}"),
            };
            ClassifiedDescription {
                name,
                description: view.description.unwrap_or_default(),
            }
        })
        .collect()
}
