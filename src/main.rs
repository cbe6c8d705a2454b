use revvere_api::config::Config;
use revvere_api::{AppState, app, db};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let pool = db::init_db(&config.database_url).await?;
    db::migrate(&pool).await?;

    let addr = format!("0.0.0.0:{}", config.port);
    let state = AppState::new(pool, config);
    state.journal.write().await.seed_samples();
    state.comments.write().await.seed_samples();

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "revvere API listening");
    axum::serve(listener, app(state).await).await?;
    Ok(())
}
