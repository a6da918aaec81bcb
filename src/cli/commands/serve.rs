//! Web server command.

use console::style;

use imagelabel::config::Settings;
use imagelabel::repository::migrations::run_migrations;
use imagelabel::services::{CatalogService, ServiceError};

/// Migrate, sync the catalog, and start the web server.
pub async fn cmd_serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;

    // Run database migrations first
    println!("{} Running database migrations...", style("→").cyan());
    if let Some(parent) = settings.database_path().parent() {
        std::fs::create_dir_all(parent)?;
    }
    match run_migrations(&settings.database_url()).await {
        Ok(_) => println!("  {} Database ready", style("✓").green()),
        Err(e) => {
            eprintln!("  {} Migration failed: {}", style("✗").red(), e);
            return Err(anyhow::anyhow!("Database migration failed: {}", e));
        }
    }

    let catalog = CatalogService::new(settings.repositories()?);
    match catalog
        .sync(
            &settings.image_dir,
            &settings.image_extensions,
            &settings.labels,
        )
        .await
    {
        Ok(report) => println!(
            "  {} {} images in catalog ({} new)",
            style("✓").green(),
            report.images_found,
            report.images_added
        ),
        Err(ServiceError::MissingImageDir(dir)) => {
            tracing::warn!("Image directory {} not found", dir.display());
            println!(
                "  {} Image directory {} not found, serving existing catalog",
                style("!").yellow(),
                dir.display()
            );
            catalog.sync_labels(&settings.labels).await?;
        }
        Err(e) => return Err(e.into()),
    }

    println!(
        "{} Starting imagelabel server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Label at http://{}:{}/next-label/<your-name>", host, port);
    println!("  Press Ctrl+C to stop");

    imagelabel::server::serve(settings, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> 127.0.0.1:3030
/// - Just a host: "0.0.0.0" -> 0.0.0.0:3030
/// - Host and port: "0.0.0.0:3030" -> 0.0.0.0:3030
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
        anyhow::bail!("Invalid port in bind address: {}", bind);
    }

    Ok((bind.to_string(), 3030))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_address() {
        assert_eq!(
            parse_bind_address("8080").unwrap(),
            ("127.0.0.1".to_string(), 8080)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0").unwrap(),
            ("0.0.0.0".to_string(), 3030)
        );
        assert_eq!(
            parse_bind_address("0.0.0.0:9000").unwrap(),
            ("0.0.0.0".to_string(), 9000)
        );
        assert!(parse_bind_address("localhost:http").is_err());
    }
}
