use crate::cli::ServeArgs;
use crate::routes::{with_report_routes, AppState};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use psyrisk_core::config::AppConfig;
use psyrisk_core::error::AppError;
use psyrisk_core::scoring::{ScoringConfig, ScoringEngine};
use psyrisk_core::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let scoring = ScoringConfig::from_path(&config.scoring.config_path)?;
    info!(
        path = %config.scoring.config_path.display(),
        items = scoring.items().count(),
        dimensions = scoring.dimensions().count(),
        "scoring configuration loaded"
    );
    let engine = Arc::new(ScoringEngine::new(scoring));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_report_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "psychosocial risk service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
