use crate::error::LookupError;
use std::path::{Path, PathBuf};

/// Where a project's transcripts live and which repository they belong to.
#[derive(Debug, Clone)]
pub struct Project {
    /// Working directory of the repository (used as cwd for resume).
    pub root: PathBuf,
    pub transcript_dir: PathBuf,
}

impl Project {
    /// Locate the git repository containing `cwd` and its Claude Code
    /// transcript directory under `~/.claude/projects/`.
    pub fn discover(cwd: &Path) -> Result<Self, LookupError> {
        let repo = git2::Repository::discover(cwd).map_err(|source| {
            LookupError::NotARepository {
                path: cwd.to_path_buf(),
                source,
            }
        })?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| LookupError::BareRepository(repo.path().to_path_buf()))?;
        let root = strip_trailing_separator(workdir);
        let home = dirs::home_dir().ok_or(LookupError::NoHome)?;
        let transcript_dir = projects_dir(&home).join(encode_project_name(&root));
        Self::at(root, transcript_dir)
    }

    /// Use an explicit transcript directory (`--dir`).
    pub fn at(root: PathBuf, transcript_dir: PathBuf) -> Result<Self, LookupError> {
        if !transcript_dir.is_dir() {
            return Err(LookupError::ProjectDirMissing(transcript_dir));
        }
        Ok(Self {
            root,
            transcript_dir,
        })
    }
}

pub fn projects_dir(home: &Path) -> PathBuf {
    home.join(".claude").join("projects")
}

/// Claude Code names a project's directory after its absolute path with
/// every non-alphanumeric character replaced by `-`.
pub fn encode_project_name(root: &Path) -> String {
    root.to_string_lossy()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

fn strip_trailing_separator(path: &Path) -> PathBuf {
    // `workdir()` reports "/repo/"; components() drops the trailing slash.
    path.components().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_absolute_paths() {
        assert_eq!(
            encode_project_name(Path::new("/Users/me/code/my_app.rs")),
            "-Users-me-code-my-app-rs"
        );
    }

    #[test]
    fn strips_trailing_separator() {
        assert_eq!(
            strip_trailing_separator(Path::new("/tmp/repo/")),
            PathBuf::from("/tmp/repo")
        );
    }

    #[test]
    fn explicit_dir_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = Project::at(dir.path().to_path_buf(), missing.clone()).unwrap_err();
        assert!(matches!(err, LookupError::ProjectDirMissing(p) if p == missing));
        assert!(Project::at(dir.path().to_path_buf(), dir.path().to_path_buf()).is_ok());
    }

    #[test]
    fn discover_outside_repo_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A fresh temp dir isn't inside a repository (unless $TMPDIR is).
        if git2::Repository::discover(dir.path()).is_err() {
            assert!(matches!(
                Project::discover(dir.path()),
                Err(LookupError::NotARepository { .. })
            ));
        }
    }
}
