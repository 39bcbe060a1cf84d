use crate::preferences::Preferences;
use crate::transcript::Transcript;
use anyhow::{Context, Result, bail};
use minijinja::{Environment, context};
use std::path::Path;
use std::process::Command;
use tracing::info;

/// What to do with the transcript the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Run `export_command` (HTML export).
    Export,
    /// Run `resume_command` from the project root.
    Resume,
    /// Print the session id to stdout.
    Print,
}

/// Single-quote `value` for POSIX shells.
fn shell_quote(value: String) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Render a command template for `transcript`.
pub fn render_command(
    template: &str,
    transcript: &Transcript,
    project_root: &Path,
) -> Result<String> {
    let mut env = Environment::new();
    env.add_filter("quote", shell_quote);
    let tmpl = env
        .template_from_str(template)
        .context("parsing command template")?;
    tmpl.render(context! {
        session_id => &transcript.session_id,
        path => transcript.path.to_string_lossy(),
        project_root => project_root.to_string_lossy(),
    })
    .context("rendering command template")
}

fn run_shell(command: &str, cwd: &Path) -> Result<()> {
    info!(command, cwd = %cwd.display(), "running");
    let status = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(cwd)
        .status()
        .with_context(|| format!("spawning `{command}`"))?;
    if !status.success() {
        bail!("`{command}` exited with {status}");
    }
    Ok(())
}

impl Action {
    pub fn run(
        self,
        transcript: &Transcript,
        project_root: &Path,
        prefs: &Preferences,
    ) -> Result<()> {
        let template = match self {
            Action::Print => {
                println!("{}", transcript.session_id);
                return Ok(());
            }
            Action::Export => &prefs.export_command,
            Action::Resume => &prefs.resume_command,
        };
        let command = render_command(template, transcript, project_root)?;
        run_shell(&command, project_root)
    }
}
