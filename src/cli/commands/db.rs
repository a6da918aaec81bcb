//! Database management commands.

use console::style;

use imagelabel::config::Settings;
use imagelabel::repository::migrations::{pending_migrations, run_migrations};
use imagelabel::repository::util::redact_url_password;

/// Run database migrations.
pub async fn cmd_migrate(settings: &Settings, check: bool) -> anyhow::Result<()> {
    println!("{} Database migration", style("→").cyan());
    println!(
        "  Database: {}",
        redact_url_password(&settings.database_url())
    );

    if let Some(parent) = settings.database_path().parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pending = pending_migrations(&settings.database_url()).await?;

    if check {
        if pending.is_empty() {
            println!("\n{} Schema is up to date.", style("✓").green());
        } else {
            println!(
                "\n{} {} pending migration(s). Run 'imagelabel db migrate' to apply:",
                style("!").yellow(),
                pending.len()
            );
            for name in &pending {
                println!("  - {}", name);
            }
        }
        return Ok(());
    }

    if pending.is_empty() {
        println!("\n{} Schema is already up to date.", style("✓").green());
        return Ok(());
    }

    println!("\n{} Running migrations...", style("→").cyan());
    match run_migrations(&settings.database_url()).await {
        Ok(applied) => {
            for name in &applied {
                println!("  {} {}", style("✓").green(), name);
            }
            println!("{} Migration complete!", style("✓").green());
        }
        Err(e) => {
            eprintln!("{} Migration failed: {}", style("✗").red(), e);
            return Err(anyhow::anyhow!("Migration failed: {}", e));
        }
    }

    Ok(())
}
