use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

// Module for routing segregation (Research, Admin).
pub mod routes;
use auth::{AdminUser, AuthUser};
use routes::{admin, research};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use email::{MailerState, MockMailer, SmtpMailer};
pub use repository::{PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the application.
/// It aggregates all API paths and data schemas decorated with the
/// `#[utoipa::path]` and `#[derive(utoipa::ToSchema)]` macros.
/// The resulting JSON is served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::admin::get_all_projects, handlers::admin::delete_project,
        handlers::admin::get_all_hackathons, handlers::admin::delete_hackathon,
        handlers::admin::get_all_users, handlers::admin::toggle_user_active,
        handlers::admin::get_stats, handlers::admin::get_all_research_papers,
        handlers::admin::delete_research_paper, handlers::admin::get_all_reports,
        handlers::admin::update_report_status,
        handlers::research::get_papers, handlers::research::get_paper,
        handlers::research::create_paper, handlers::research::update_paper,
        handlers::research::delete_paper, handlers::research::publish_paper,
        handlers::research::get_my_papers, handlers::research::report_paper
    ),
    components(
        schemas(
            models::User, models::Project, models::HackathonPost, models::ResearchPaper,
            models::Report, models::OwnerSummary, models::PaperOwner, models::ReporterSummary,
            models::AdminProjectView, models::AdminHackathonView, models::AdminUserView,
            models::AdminPaperView, models::ReportTargetInfo, models::ReportView,
            models::PlatformStats, models::UserCounts, models::ContentCounts,
            models::ReportCounts, models::PaperView, models::MyPaperView,
            models::CreatePaperRequest, models::UpdatePaperRequest,
            models::PublishPaperRequest, models::ReportPaperRequest,
            models::UpdateReportStatusRequest
        )
    ),
    tags(
        (name = "assemble-platform", description = "Assemble Community Platform API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding all essential
/// application services and configuration, shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: abstracts database access via the PgPool connection.
    pub repo: RepositoryState,
    /// Mail Layer: the verification-mail collaborator (SMTP in production).
    pub mailer: MailerState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These implementations allow extractors and handlers to selectively pull
// components from the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for MailerState {
    fn from_ref(app_state: &AppState) -> MailerState {
        app_state.mailer.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces authentication for the research routes. `AuthUser` implements
/// `FromRequestParts`, so a failed JWT validation or user lookup rejects the
/// request (401/404) before the handler runs.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// admin_middleware
///
/// The composable admin gate, applied once to the whole `/api/admin` nest.
/// `AdminUser` authenticates first and then requires the admin flag, so the
/// 401/404 of a broken token always wins over the 403 of a missing role.
async fn admin_middleware(_admin: AdminUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and
/// scoped middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Monitoring endpoint for load balancer checks; unauthenticated.
        .route("/health", get(|| async { "ok" }))
        // Research routes: any authenticated user.
        .nest(
            "/api/research",
            research::research_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        // Admin routes: the admin gate wraps the entire nest uniformly.
        .nest(
            "/api/admin",
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                admin_middleware,
            )),
        )
        .with_state(state);

    // Observability and correlation layers (applied outermost).
    base_router
        .layer(
            ServiceBuilder::new()
                // Request ID generation: a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // Request tracing: wraps the request/response lifecycle in a span
                // that carries the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes `TraceLayer` span creation: extracts the `x-request-id` header
/// and includes it in the structured logging metadata alongside the HTTP method
/// and URI, so every log line for a single request is correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
