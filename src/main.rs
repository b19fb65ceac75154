use accident_severity::{
    web::{self, AppState},
    AppConfig, Artifacts, Predictor,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("accident_severity=info".parse()?),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        model = %config.model_path,
        encoders = %config.encoders_path,
        feature_order = %config.feature_order_path,
        "loading artifacts"
    );

    let artifacts = Artifacts::load(&config)?;
    tracing::info!(
        "loaded artifacts; feature_order[{}]: {:?}",
        artifacts.feature_order().len(),
        artifacts.feature_order().names()
    );

    let predictor = Predictor::new(Arc::new(artifacts)).with_row_logging(config.log_pred);
    let state = AppState {
        predictor: Arc::new(predictor),
    };
    let app = web::router(state);

    let addr = config.socket_addr();
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
