#[tokio::main]
async fn main() {
    fleetwatch_observability::init();

    let config = match fleetwatch_api::config::ApiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // A bad signing secret makes every token operation meaningless.
            tracing::error!(error = %e, "refusing to start with unusable configuration");
            std::process::exit(1);
        }
    };

    let app = fleetwatch_api::app::build_app(config).expect("failed to build application");

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
