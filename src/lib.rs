pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod submission;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::SubmissionStore;
use crate::email::{Notifier, SmtpNotifier};
use crate::state::{AppState, SharedState};

pub const LIVENESS_MESSAGE: &str = "API is running successfully!";

/// Build the SMTP notifier when credentials are configured. A transport
/// that cannot be built is logged and treated as absent.
pub fn build_notifier(config: &Config) -> Option<Arc<dyn Notifier>> {
    let smtp = config.smtp.as_ref()?;
    match SmtpNotifier::new(smtp) {
        Ok(notifier) => {
            tracing::info!("SMTP configured ({}:{})", smtp.host, smtp.port);
            Some(Arc::new(notifier))
        }
        Err(e) => {
            tracing::warn!("SMTP not available: {e}");
            None
        }
    }
}

pub fn build_app(
    config: Config,
    store: Arc<dyn SubmissionStore>,
    notifier: Option<Arc<dyn Notifier>>,
) -> Router {
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        config,
        store,
        notifier,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(liveness))
        .merge(routes::api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                )),
        )
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(state)
}

async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}
