use crate::{AppState, handlers::research};
use axum::{
    Router,
    routing::{get, post},
};

/// Research Router Module
///
/// Defines the authenticated research-paper surface. Every route here sits
/// behind the `auth_middleware` layer applied in `create_router`; ownership
/// checks for mutations are performed inside the individual handlers
/// (`owner_id == caller || caller.is_admin`).
pub fn research_routes() -> Router<AppState> {
    Router::new()
        // GET /api/research/papers?status=&category=
        // Lists active papers with optional exact-match filters.
        // POST /api/research/papers
        // Submits a new paper in the 'abstract' state.
        .route(
            "/papers",
            get(research::get_papers).post(research::create_paper),
        )
        // GET/PUT/DELETE /api/research/papers/{id}
        // Detail view, owner-scoped partial update, owner-scoped soft delete.
        .route(
            "/papers/{id}",
            get(research::get_paper)
                .put(research::update_paper)
                .delete(research::delete_paper),
        )
        // POST /api/research/papers/{id}/publish
        // The abstract → published transition; requires a paper URL.
        .route("/papers/{id}/publish", post(research::publish_paper))
        // GET /api/research/my-papers
        // The caller's own active papers.
        .route("/my-papers", get(research::get_my_papers))
        // POST /api/research/papers/{id}/report
        // Files a moderation report against someone else's paper.
        .route("/papers/{id}/report", post(research::report_paper))
}
