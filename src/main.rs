mod action;
mod catalog;
mod error;
mod lines;
mod picker;
mod preferences;
mod project;
mod record;
mod transcript;

use action::Action;
use anyhow::{Context, Result};
use catalog::{Catalog, ScanOptions, collapse_whitespace, transcript_files};
use clap::{Parser, Subcommand};
use error::LookupError;
use preferences::Preferences;
use project::Project;
use std::env;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Browse Claude Code transcripts for the current repository, then export
/// or resume one.
#[derive(Debug, Parser)]
#[command(name = "cctranscripts", version)]
struct Cli {
    /// Transcript directory to scan instead of the current repository's
    /// `~/.claude/projects/<project>` directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Preferences file (default: `~/.claude/cctranscripts.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Only scan transcripts whose file name contains this string.
    #[arg(long, global = true)]
    filter: Option<String>,

    /// Leading records to read from each transcript.
    #[arg(long, global = true)]
    limit: Option<usize>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Pick a transcript and export it to HTML (default).
    Export,
    /// Pick a transcript and resume its session.
    Resume,
    /// Pick a transcript and print its session id.
    Pick,
    /// Print the transcript list without prompting.
    List {
        /// Print a JSON array instead of tab-separated lines.
        #[arg(long)]
        json: bool,
    },
    /// Show how each leading record of the matching transcripts is classified.
    Inspect {
        /// Print every record instead of prompting.
        #[arg(long)]
        print: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_preferences(cli: &Cli) -> Result<Preferences> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => Preferences::default_path(&dirs::home_dir().ok_or(LookupError::NoHome)?),
    };
    let mut prefs = Preferences::load(&path)?;
    if let Some(limit) = cli.limit {
        prefs.record_limit = limit;
    }
    Ok(prefs)
}

fn locate_project(cli: &Cli) -> Result<Project> {
    let cwd = env::current_dir().context("reading current directory")?;
    let project = match &cli.dir {
        Some(dir) => Project::at(cwd, dir.clone())?,
        None => Project::discover(&cwd)?,
    };
    Ok(project)
}

fn scan(project: &Project, filter: Option<&str>, prefs: &Preferences) -> Result<Catalog> {
    let options = ScanOptions {
        filter: filter.map(str::to_string),
        record_limit: prefs.record_limit,
    };
    let catalog = Catalog::scan(&project.transcript_dir, &options)?;
    for (path, reason) in &catalog.failures {
        eprintln!("cctranscripts: skipped {}: {reason}", path.display());
    }
    Ok(catalog)
}

fn run(cli: Cli) -> Result<()> {
    let prefs = load_preferences(&cli)?;
    let project = locate_project(&cli)?;
    let filter = cli.filter.as_deref();

    let action = match cli.command {
        None | Some(Command::Export) => Action::Export,
        Some(Command::Resume) => Action::Resume,
        Some(Command::Pick) => Action::Print,
        Some(Command::List { json }) => return list(&scan(&project, filter, &prefs)?, json),
        Some(Command::Inspect { print }) => {
            return inspect(&project, filter, prefs.record_limit, print);
        }
    };

    let catalog = scan(&project, filter, &prefs)?;
    if catalog.is_empty() {
        eprintln!(
            "cctranscripts: no transcripts found in {}",
            project.transcript_dir.display()
        );
        return Ok(());
    }

    let prompt = match action {
        Action::Export => "Select a conversation to export",
        Action::Resume => "Select a conversation to resume",
        Action::Print => "Select a conversation",
    };
    match picker::select_transcript(prompt, &catalog.transcripts, prefs.display_width)? {
        Some(transcript) => {
            eprintln!("{}\n", picker::selection_summary(transcript));
            action.run(transcript, &project.root, &prefs)
        }
        None => Ok(()),
    }
}

fn list(catalog: &Catalog, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(&catalog.transcripts)
            .context("serializing transcript list")?;
        println!("{out}");
    } else {
        for t in &catalog.transcripts {
            println!(
                "{}\t{}\t{}",
                t.session_id,
                t.timestamp,
                collapse_whitespace(&t.summary)
            );
        }
    }
    Ok(())
}

fn inspect(project: &Project, filter: Option<&str>, limit: usize, print: bool) -> Result<()> {
    let files = transcript_files(&project.transcript_dir, filter)?;
    let multiple = files.len() > 1;
    let mut descriptions = Vec::new();

    for path in &files {
        let leading = match record::read_leading(path, Some(limit)) {
            Ok(leading) => leading,
            Err(e) => {
                eprintln!("cctranscripts: skipped {}: {e}", path.display());
                continue;
            }
        };
        for (line, err) in &leading.malformed {
            eprintln!(
                "cctranscripts: {} line {line}: malformed record: {err}",
                path.display()
            );
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        for mut d in transcript::classify(&leading.records) {
            if multiple {
                d.name = format!("{stem} {}", d.name);
            }
            descriptions.push(d);
        }
    }

    if print {
        for d in &descriptions {
            println!("{}\n{}\n", d.name, d.description);
        }
        return Ok(());
    }
    if descriptions.is_empty() {
        eprintln!("cctranscripts: no records to inspect");
        return Ok(());
    }
    picker::inspect(&descriptions)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("cctranscripts: {err:#}");
        process::exit(2);
    }
}
