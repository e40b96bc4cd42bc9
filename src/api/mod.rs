use crate::{
    auth::{gateway::SharedGateway, token::SessionTokenStore},
    content::store::ContentStore,
    guard::route::route_guard,
};
use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod handlers;
mod openapi;

/// Build the full router: public pages, login flow, admin shell, content API
/// and health, with the route guard in front of everything.
#[must_use]
pub fn app(gateway: SharedGateway, tokens: SessionTokenStore, content: ContentStore) -> Router {
    Router::new()
        .route("/", get(handlers::pages::home))
        .route("/about", get(handlers::pages::about))
        .route(
            "/login",
            get(handlers::login::form).post(handlers::login::submit),
        )
        .route("/logout", post(handlers::login::logout))
        .route("/admin", get(handlers::admin::index))
        .route("/admin/dashboard", get(handlers::admin::dashboard))
        .route("/admin/content", get(handlers::admin::content))
        .route("/admin/jobs", get(handlers::admin::jobs))
        .route(
            "/api/content",
            get(handlers::content::list)
                .post(handlers::content::save)
                .delete(handlers::content::remove),
        )
        .route("/health", get(handlers::health::health))
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
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
                .layer(middleware::from_fn(route_guard))
                .layer(Extension(gateway))
                .layer(Extension(tokens))
                .layer(Extension(content)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn serve(
    port: u16,
    gateway: SharedGateway,
    tokens: SessionTokenStore,
    content: ContentStore,
) -> Result<()> {
    let router = app(gateway, tokens, content);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
