use crate::error::{LookupError, SkipReason};
use crate::transcript::{DEFAULT_RECORD_LIMIT, Transcript};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const TRANSCRIPT_EXTENSION: &str = "jsonl";

/// Default width of a rendered catalog line, relative time included.
pub const DEFAULT_DISPLAY_WIDTH: usize = 80;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Only scan files whose name contains this substring.
    pub filter: Option<String>,
    pub record_limit: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            filter: None,
            record_limit: DEFAULT_RECORD_LIMIT,
        }
    }
}

/// Every transcript in a project directory that could be summarized,
/// newest first, plus the files that had to be skipped for a reportable
/// reason.
#[derive(Debug, Default)]
pub struct Catalog {
    pub transcripts: Vec<Transcript>,
    pub failures: Vec<(PathBuf, SkipReason)>,
}

impl Catalog {
    /// Summarize every `.jsonl` file in `dir`, one file at a time.
    ///
    /// A damaged file never aborts the scan: it lands in `failures` (or is
    /// dropped silently if it simply has no content). Only failing to read
    /// the directory itself is an error.
    pub fn scan(dir: &Path, options: &ScanOptions) -> Result<Self, LookupError> {
        let mut catalog = Catalog::default();
        for path in transcript_files(dir, options.filter.as_deref())? {
            match Transcript::load(&path, options.record_limit) {
                Ok(transcript) => catalog.transcripts.push(transcript),
                Err(reason) if reason.is_reportable() => {
                    debug!(path = %path.display(), "skipping damaged transcript: {reason}");
                    catalog.failures.push((path, reason));
                }
                Err(reason) => debug!(path = %path.display(), "skipping transcript: {reason}"),
            }
        }

        sort_newest_first(&mut catalog.transcripts);
        debug!(
            dir = %dir.display(),
            found = catalog.transcripts.len(),
            failed = catalog.failures.len(),
            "scanned transcripts"
        );
        Ok(catalog)
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }
}

/// `.jsonl` files in `dir` whose name contains `filter`, sorted by name.
pub fn transcript_files(dir: &Path, filter: Option<&str>) -> Result<Vec<PathBuf>, LookupError> {
    let read_dir_err = |source| LookupError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(read_dir_err)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_candidate(path, filter))
        .collect();
    files.sort();
    Ok(files)
}

fn is_candidate(path: &Path, filter: Option<&str>) -> bool {
    if path.extension().and_then(|e| e.to_str()) != Some(TRANSCRIPT_EXTENSION) || !path.is_file() {
        return false;
    }
    match filter {
        Some(needle) => path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.contains(needle)),
        None => true,
    }
}

/// ISO-8601 timestamps are fixed-width, so string order is time order.
/// The sort is stable; equal timestamps keep scan order.
pub fn sort_newest_first(transcripts: &mut [Transcript]) {
    transcripts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

// ===================================================================
// Display formatting
// ===================================================================

/// Cut `s` to at most `max_len` chars, ending in `suffix` when cut.
pub fn truncate(s: &str, max_len: usize, suffix: &str) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let suffix_len = suffix.chars().count();
    if max_len <= suffix_len {
        return suffix.chars().take(max_len).collect();
    }
    let mut out: String = s.chars().take(max_len - suffix_len).collect();
    out.push_str(suffix);
    out
}

/// Collapse all runs of whitespace (newlines included) into single spaces.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Format relative time like "5 mins ago", "2 hours ago", etc.
pub fn relative_time(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(time);
    let plural = |n: i64, unit: &str| format!("{n} {unit}{} ago", if n == 1 { "" } else { "s" });

    if duration.num_seconds() < 60 {
        "just now".to_string()
    } else if duration.num_minutes() < 60 {
        plural(duration.num_minutes(), "min")
    } else if duration.num_hours() < 24 {
        plural(duration.num_hours(), "hour")
    } else if duration.num_days() < 7 {
        plural(duration.num_days(), "day")
    } else if duration.num_weeks() < 4 {
        plural(duration.num_weeks(), "week")
    } else {
        let months = duration.num_days() / 30;
        if months < 12 {
            plural(months.max(1), "month")
        } else {
            plural(months / 12, "year")
        }
    }
}

/// `relative_time` for a raw transcript timestamp; unparsable timestamps are
/// shown as-is.
pub fn relative_timestamp(timestamp: &str, now: DateTime<Utc>) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(t) => relative_time(t.with_timezone(&Utc), now),
        Err(_) => timestamp.to_string(),
    }
}

/// One line of the selection list: `"(2 days ago) summary..."`, at most
/// `width` chars in total.
pub fn display_line(transcript: &Transcript, now: DateTime<Utc>, width: usize) -> String {
    let prefix = format!("({}) ", relative_timestamp(&transcript.timestamp, now));
    let budget = width.saturating_sub(prefix.chars().count());
    let summary = truncate(&collapse_whitespace(&transcript.summary), budget, ELLIPSIS);
    truncate(&format!("{prefix}{summary}"), width, ELLIPSIS)
}
