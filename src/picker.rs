use crate::catalog::display_line;
use crate::transcript::{ClassifiedDescription, Transcript};
use anyhow::{Context, Result};
use chrono::Utc;
use dialoguer::FuzzySelect;
use dialoguer::theme::ColorfulTheme;

/// Ask the user to pick a transcript. `None` if they cancelled.
pub fn select_transcript<'a>(
    prompt: &str,
    transcripts: &'a [Transcript],
    width: usize,
) -> Result<Option<&'a Transcript>> {
    let now = Utc::now();
    let items: Vec<String> = transcripts
        .iter()
        .map(|t| display_line(t, now, width))
        .collect();

    let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact_opt()
        .context("displaying transcript selector")?;

    Ok(selection.map(|idx| &transcripts[idx]))
}

/// Confirmation shown once a transcript is picked. The picker line is
/// truncated to the terminal width, so this carries the whole summary.
pub fn selection_summary(transcript: &Transcript) -> String {
    format!("{}\n{}", transcript.session_id, transcript.summary.trim())
}

/// Browse classified records, printing the full description of each one
/// picked, until the user cancels.
pub fn inspect(descriptions: &[ClassifiedDescription]) -> Result<()> {
    let names: Vec<&str> = descriptions.iter().map(|d| d.name.as_str()).collect();
    let mut last = 0;
    loop {
        let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Inspect a record")
            .items(&names)
            .default(last)
            .interact_opt()
            .context("displaying record inspector")?;
        let Some(idx) = selection else {
            return Ok(());
        };
        last = idx;
        println!("{}\n", descriptions[idx].description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn selection_summary_is_not_truncated() {
        let summary = "Refactor the session loader so that transcripts with very long \
                       opening prompts still show up in full after they are picked";
        let transcript = Transcript {
            session_id: "abc".into(),
            timestamp: "2024-01-01T00:00:00Z".into(),
            summary: summary.into(),
            path: PathBuf::from("/tmp/abc.jsonl"),
        };
        let shown = selection_summary(&transcript);
        assert_eq!(shown, format!("abc\n{summary}"));
        assert!(!shown.ends_with("..."));
    }

    #[test]
    fn selection_summary_keeps_line_breaks() {
        let transcript = Transcript {
            session_id: "abc".into(),
            timestamp: "2024-01-01T00:00:00Z".into(),
            summary: "first line\nsecond line\n".into(),
            path: PathBuf::from("/tmp/abc.jsonl"),
        };
        assert_eq!(selection_summary(&transcript), "abc\nfirst line\nsecond line");
    }
}
