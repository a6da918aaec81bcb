//! Initialize command.

use console::style;

use imagelabel::config::Settings;
use imagelabel::repository::migrations::run_migrations;
use imagelabel::services::CatalogService;

/// Initialize the data directory and database, then register what is on disk.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_directories()?;

    let applied = run_migrations(&settings.database_url()).await?;
    for name in &applied {
        println!("  {} Applied migration {}", style("✓").green(), name);
    }

    let catalog = CatalogService::new(settings.repositories()?);
    let report = catalog
        .sync(
            &settings.image_dir,
            &settings.image_extensions,
            &settings.labels,
        )
        .await?;

    println!(
        "  {} {} new images, {} new labels",
        style("✓").green(),
        report.images_added,
        report.labels_added
    );

    if report.images_found == 0 {
        println!(
            "{} No images yet. Copy some into {} and run 'imagelabel sync'",
            style("!").yellow(),
            settings.image_dir.display()
        );
    }

    println!(
        "{} Initialized imagelabel in {}",
        style("✓").green(),
        settings.data_dir.display()
    );

    Ok(())
}
