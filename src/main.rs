use std::sync::Arc;

use scour_api::api::create_router;
use scour_api::config::ServiceConfig;
use scour_api::fetch::HttpFetcher;
use scour_api::google::GoogleSearch;
use scour_api::service::SearchService;
use scour_api::throttle::UniformJitter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ServiceConfig::default();
    config.validate().expect("invalid service configuration");
    let fetcher = HttpFetcher::new(&config).expect("failed to build HTTP client");

    let service = Arc::new(SearchService::new(
        config,
        Arc::new(fetcher),
        Arc::new(GoogleSearch),
        Arc::new(UniformJitter),
    ));
    let app = create_router(service);

    let port = std::env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .unwrap();
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}
