use crate::cli::ServeArgs;
use crate::infra::{build_store, AppState};
use crate::routes::with_catalog_routes;
use amenity_catalog::auth::{Authenticator, StaticTokenAuthenticator};
use amenity_catalog::catalog::AmenityCatalogService;
use amenity_catalog::config::AppConfig;
use amenity_catalog::error::AppError;
use amenity_catalog::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(build_store(&config.catalog)?);
    let catalog_service = Arc::new(AmenityCatalogService::new(
        store,
        config.catalog.default_category,
    ));

    let tokens = StaticTokenAuthenticator::from_config(&config.auth);
    if tokens.is_empty() {
        warn!("APP_API_TOKENS is empty; every amenity request will be rejected");
    }
    let authenticator: Arc<dyn Authenticator> = Arc::new(tokens);

    let default_category = catalog_service.default_category();
    let app = with_catalog_routes(catalog_service, authenticator)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_category = default_category.0,
        "amenity catalog service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
