use platform_finder::{
    api::{create_router, AppState},
    config::Config,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("platform_finder=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let state = AppState::from_config(&config);

    // A dataset that cannot be loaded is fatal at startup
    let catalog = state.catalog().await?;
    tracing::info!(
        dataset = %config.dataset_url,
        titles = catalog.len(),
        "Dataset ready"
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
