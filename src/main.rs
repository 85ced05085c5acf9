use std::net::SocketAddr;

use cordly::config::Config;
use cordly::models::Backend;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load configuration");

    let backend = Backend::new(&config)
        .await
        .expect("Failed to initialize backend");
    let app = cordly::create_router(backend);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("{} running at http://{}", config.site.name, addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
