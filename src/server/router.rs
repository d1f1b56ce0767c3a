use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Router, routing::get};

use super::admin::admin_router;
use super::auth::auth_router;
use super::counselor::counselor_router;
use super::home::home_router;
use super::principal::principal_router;
use super::profile::profile_router;
use super::registration::registration_router;
use super::simulation::simulation_router;
use super::universities::university_router;
use crate::auth::SessionKeys;
use crate::notify::Notifier;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: SessionKeys,
    pub notifier: Arc<dyn Notifier>,
    /// Public base URL of the portal. Used for the lookup link in selection emails.
    pub public_url: Option<String>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, sessions: SessionKeys, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            sessions,
            notifier,
            public_url: None,
        }
    }

    #[must_use]
    pub fn with_public_url(mut self, url: Option<String>) -> Self {
        self.public_url = url.map(|u| u.trim_end_matches('/').to_string());
        self
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_router())
        .nest("/profil", profile_router())
        .nest("/pendaftaran", registration_router())
        .nest("/universitas", university_router())
        .nest("/simulasi", simulation_router())
        .nest("/bk", counselor_router())
        .nest("/kepsek", principal_router())
        .nest("/admin", admin_router())
        .nest("/home", home_router())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
