use crate::{AppState, handlers::admin};
use axum::{
    Router,
    routing::{delete, get, put},
};

/// Admin Router Module
///
/// Defines the routes exclusively accessible to users with the admin flag.
/// These endpoints provide moderation, oversight, and statistical access across
/// all content tables.
///
/// Access Control:
/// The entire router is wrapped (in `create_router`) in a route layer that runs
/// the `AdminUser` extractor, which authenticates first and then requires
/// `is_admin`. Authentication failure therefore always takes precedence over
/// the 403, and no handler below runs for a non-admin caller.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /api/admin/stats
        // Dashboard aggregates: per-table total/active counts, report totals,
        // and the per-target-type report breakdown.
        .route("/stats", get(admin::get_stats))
        // GET /api/admin/projects
        // Lists ALL projects (active and hidden) with owner and application count.
        // DELETE /api/admin/projects/{id}
        // Force-deletes any project (hard delete, no ownership check).
        .route("/projects", get(admin::get_all_projects))
        .route("/projects/{id}", delete(admin::delete_project))
        // GET/DELETE /api/admin/hackathons[/{id}]
        // Same oversight pair for hackathon postings.
        .route("/hackathons", get(admin::get_all_hackathons))
        .route("/hackathons/{id}", delete(admin::delete_hackathon))
        // GET /api/admin/users
        // Lists every user with derived content counts.
        .route("/users", get(admin::get_all_users))
        // PUT /api/admin/users/{id}/toggle-active
        // Flips a user's activation flag; calling twice restores the original.
        .route("/users/{id}/toggle-active", put(admin::toggle_user_active))
        // GET/DELETE /api/admin/research-papers[/{id}]
        // Moderation listing (truncated abstracts, report counts) and hard delete.
        .route("/research-papers", get(admin::get_all_research_papers))
        .route("/research-papers/{id}", delete(admin::delete_research_paper))
        // GET /api/admin/reports
        // All moderation reports with resolved target info.
        // PUT /api/admin/reports/{id}/status
        // Moves a report through pending → reviewed → resolved.
        .route("/reports", get(admin::get_all_reports))
        .route("/reports/{id}/status", put(admin::update_report_status))
}
