pub mod handlers;

use crate::{
    auth::{AuthService, Hasher},
    cli::globals::GlobalArgs,
    store::PgCredentialStore,
};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderName, HeaderValue, Method, Request},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug_span, info, Span};
use ulid::Ulid;

/// Auth service shared with the handlers.
pub type AuthState = Arc<AuthService<PgCredentialStore>>;

/// Connect to the store, wire up the service and serve it.
/// # Errors
/// Returns an error if the server fails to start
pub async fn new(port: u16, dsn: String, globals: &GlobalArgs) -> Result<()> {
    let store = PgCredentialStore::connect(&dsn, globals.store_timeout)
        .await
        .context("Failed to connect to database")?;

    store
        .ensure_schema()
        .await
        .context("Failed to create accounts schema")?;

    let hasher = Hasher::new(
        globals.hash_memory_cost,
        globals.hash_iterations,
        globals.hash_parallelism,
    )?;

    let auth: AuthState = Arc::new(AuthService::new(store, hasher));

    let app = router(auth);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Routes plus the request-id, trace and CORS layers.
#[must_use]
pub fn router(auth: AuthState) -> Router {
    let cors = CorsLayer::new()
        // allow `GET` and `POST` when accessing the resource
        .allow_methods([Method::GET, Method::POST])
        // allow requests from any origin
        .allow_origin(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(auth)),
        )
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, ?headers, request_id)
}
