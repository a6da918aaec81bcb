//! Web server for labeling images.
//!
//! Serves the labeling page, the images themselves, and a small JSON API
//! for clients that want to drive labeling without the HTML page.

mod assets;
mod handlers;
mod routes;
mod template_structs;

pub use routes::create_router;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::repository::Repositories;
use crate::services::LabelingService;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub labeling: LabelingService,
    pub image_dir: PathBuf,
    /// Labels offered as buttons on the labeling page.
    pub labels: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(repos: Repositories, settings: &Settings) -> Self {
        Self {
            labeling: LabelingService::new(repos),
            image_dir: settings.image_dir.clone(),
            labels: Arc::new(settings.labels.clone()),
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let ctx = settings.create_db_context()?;
    ctx.test_connection().await?;
    let state = AppState::new(Repositories::new(ctx), settings);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
