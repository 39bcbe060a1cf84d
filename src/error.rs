use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A single transcript line that isn't valid JSON.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Why a transcript file was left out of the catalog.
///
/// Every variant is file-local: the catalog records it and moves on to the
/// next file.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("reading transcript: {0}")]
    Io(#[from] io::Error),

    /// A malformed line made the file unusable (no root or summary could be
    /// derived from the lines that did parse).
    #[error("malformed record at line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The root record names a session but carries no timestamp.
    #[error("record {index} has sessionId {session_id:?} but no timestamp")]
    MissingTimestamp { index: usize, session_id: String },

    /// Neither a summary nor a root record was found (e.g. summary-only
    /// artifacts). Expected, and never reported to the operator.
    #[error("no summary or root record")]
    NoUsableContent,
}

impl SkipReason {
    /// Whether this skip should be surfaced to the operator.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, SkipReason::NoUsableContent)
    }
}

/// Failures locating the transcript directory. Fatal to the whole run.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("could not determine home directory")]
    NoHome,

    #[error("{path} is not inside a git repository")]
    NotARepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("git repository at {0} is bare, no working directory")]
    BareRepository(PathBuf),

    #[error("failed to find Claude Code project directory {0}")]
    ProjectDirMissing(PathBuf),

    #[error("reading transcript directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
