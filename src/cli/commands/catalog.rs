//! Catalog sync command.

use console::style;

use imagelabel::config::Settings;
use imagelabel::repository::migrations::run_migrations;
use imagelabel::services::CatalogService;

/// Register new images from the image directory and the label vocabulary.
pub async fn cmd_sync(settings: &Settings) -> anyhow::Result<()> {
    run_migrations(&settings.database_url()).await?;

    println!(
        "{} Scanning {}",
        style("→").cyan(),
        settings.image_dir.display()
    );

    let catalog = CatalogService::new(settings.repositories()?);
    let report = catalog
        .sync(
            &settings.image_dir,
            &settings.image_extensions,
            &settings.labels,
        )
        .await?;

    println!(
        "{} {} images found, {} new",
        style("✓").green(),
        report.images_found,
        report.images_added
    );
    if report.labels_added > 0 {
        println!("  {} new labels", report.labels_added);
    }

    Ok(())
}
