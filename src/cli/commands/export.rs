//! Export command.

use std::io::Write;

use imagelabel::config::Settings;

/// Write the labeling history to stdout as JSON.
pub async fn cmd_export(settings: &Settings, jsonl: bool) -> anyhow::Result<()> {
    let entries = super::open_repositories(settings)
        .await?
        .labelings
        .entries()
        .await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if jsonl {
        for entry in &entries {
            serde_json::to_writer(&mut out, entry)?;
            writeln!(out)?;
        }
    } else {
        serde_json::to_writer_pretty(&mut out, &entries)?;
        writeln!(out)?;
    }

    Ok(())
}
