use crate::catalog::DEFAULT_DISPLAY_WIDTH;
use crate::transcript::DEFAULT_RECORD_LIMIT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const FILENAME: &str = "cctranscripts.toml";

const DEFAULT_EXPORT_COMMAND: &str = "claude-code-log --open-browser {{ path | quote }}";
const DEFAULT_RESUME_COMMAND: &str = "claude --resume {{ session_id | quote }}";

/// User-facing preferences stored in `~/.claude/cctranscripts.toml`.
///
/// The command templates are rendered with minijinja and run through
/// `sh -c`. Available variables: `session_id`, `path`, `project_root`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    /// Leading records read from each transcript when building the list.
    #[serde(default = "default_record_limit")]
    pub record_limit: usize,

    /// Width of each line in the selection list.
    #[serde(default = "default_display_width")]
    pub display_width: usize,

    /// Command that exports the chosen transcript to HTML.
    #[serde(default = "default_export_command")]
    pub export_command: String,

    /// Command that resumes the chosen session.
    #[serde(default = "default_resume_command")]
    pub resume_command: String,
}

fn default_record_limit() -> usize {
    DEFAULT_RECORD_LIMIT
}

fn default_display_width() -> usize {
    DEFAULT_DISPLAY_WIDTH
}

fn default_export_command() -> String {
    DEFAULT_EXPORT_COMMAND.into()
}

fn default_resume_command() -> String {
    DEFAULT_RESUME_COMMAND.into()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            record_limit: default_record_limit(),
            display_width: default_display_width(),
            export_command: default_export_command(),
            resume_command: default_resume_command(),
        }
    }
}

impl Preferences {
    /// `~/.claude/cctranscripts.toml`
    pub fn default_path(home: &Path) -> PathBuf {
        home.join(".claude").join(FILENAME)
    }

    /// Load preferences from `path`.
    ///
    /// If the file doesn't exist it is created with defaults. Missing keys
    /// in an existing file are filled in with defaults via serde.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let prefs: Preferences = toml::from_str(&contents)
                    .with_context(|| format!("parsing {}", path.display()))?;
                Ok(prefs)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let prefs = Preferences::default();
                let toml_str = toml::to_string_pretty(&prefs)
                    .context("serializing default preferences")?;
                if let Some(dir) = path.parent() {
                    fs::create_dir_all(dir)
                        .with_context(|| format!("creating {}", dir.display()))?;
                }
                fs::write(path, &toml_str)
                    .with_context(|| format!("writing default {}", path.display()))?;
                Ok(prefs)
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }
}
