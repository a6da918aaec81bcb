//! Status command.

use console::style;

use imagelabel::config::Settings;
use imagelabel::repository::util::redact_url_password;
use imagelabel::services::LabelingService;

/// Show catalog counts and per-annotator progress.
pub async fn cmd_status(settings: &Settings) -> anyhow::Result<()> {
    let repos = super::open_repositories(settings).await?;

    println!("{}", style("imagelabel status").bold());
    println!("  Database:   {}", redact_url_password(&settings.database_url()));
    println!("  Images dir: {}", settings.image_dir.display());
    println!();
    println!("  Images:     {}", repos.images.count().await?);
    println!("  Labels:     {}", repos.labels.count().await?);
    println!("  Annotators: {}", repos.annotators.count().await?);
    println!("  Labelings:  {}", repos.labelings.count().await?);

    let progress = LabelingService::new(repos).progress().await?;
    if progress.is_empty() {
        return Ok(());
    }

    println!();
    println!(
        "  {:<20} {:>8} {:>10} {:>10}",
        style("ANNOTATOR").dim(),
        style("IMAGES").dim(),
        style("LABELINGS").dim(),
        style("REMAINING").dim()
    );
    for entry in progress {
        let remaining = if entry.remaining == 0 {
            style(entry.remaining.to_string()).green()
        } else {
            style(entry.remaining.to_string()).yellow()
        };
        println!(
            "  {:<20} {:>8} {:>10} {:>10}",
            entry.name, entry.images_labeled, entry.labelings, remaining
        );
    }

    Ok(())
}
