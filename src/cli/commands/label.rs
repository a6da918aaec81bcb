//! Labeling commands: next image and label submission.

use console::style;

use imagelabel::assignment::Selection;
use imagelabel::config::Settings;
use imagelabel::services::LabelingService;

/// Print the next image for an annotator.
pub async fn cmd_next(settings: &Settings, annotator: &str) -> anyhow::Result<()> {
    let service = LabelingService::new(super::open_repositories(settings).await?);

    match service.next_for(annotator).await? {
        (_, Selection::Next(image)) => {
            println!("{}", image.filename);
            println!(
                "  {}",
                style(settings.image_dir.join(&image.filename).display()).dim()
            );
        }
        (annotator, Selection::Exhausted) => {
            println!(
                "{} {} has labeled every image",
                style("✓").green(),
                annotator.name
            );
        }
    }

    Ok(())
}

/// Record a label from the command line.
pub async fn cmd_label(
    settings: &Settings,
    annotator: &str,
    filename: &str,
    label: &str,
) -> anyhow::Result<()> {
    let service = LabelingService::new(super::open_repositories(settings).await?);
    let labeling = service.submit_label(annotator, filename, label).await?;

    if !settings.labels.iter().any(|known| known == label) {
        println!(
            "{} '{}' is not in the configured vocabulary",
            style("!").yellow(),
            label
        );
    }
    println!(
        "{} Recorded labeling #{}: {} labeled {} as '{}'",
        style("✓").green(),
        labeling.id,
        annotator,
        filename,
        label
    );

    Ok(())
}
