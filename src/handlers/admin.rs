use crate::{
    AppState,
    error::ApiError,
    models::{
        AdminHackathonView, AdminPaperView, AdminProjectView, AdminUserView, PlatformStats,
        ReportStatus, ReportView, UpdateReportStatusRequest,
    },
};
use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use uuid::Uuid;

// Every handler in this module sits behind the admin route-layer middleware
// (`AdminUser` extractor), so authentication and the is_admin check have
// already passed by the time these run.

/// get_all_projects
///
/// [Admin Route] Lists every project in the system, active or hidden, with the
/// owner summary and live application count per entry.
#[utoipa::path(
    get,
    path = "/api/admin/projects",
    responses((status = 200, description = "All projects", body = [AdminProjectView]))
)]
pub async fn get_all_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminProjectView>>, ApiError> {
    let projects = state
        .repo
        .get_all_projects()
        .await
        .map_err(ApiError::internal("Failed to fetch projects"))?;
    Ok(Json(projects))
}

/// delete_project
///
/// [Admin Route] Hard-deletes any project by ID (no ownership check). The
/// entity name and owner username are captured by the repository before the
/// row disappears, for the audit log.
#[utoipa::path(
    delete,
    path = "/api/admin/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let deleted = state
        .repo
        .delete_project_admin(id)
        .await
        .map_err(ApiError::internal("Failed to delete project"))?
        .ok_or(ApiError::NotFound("Project not found"))?;

    tracing::info!(
        "Admin deleted project: {} (ID: {}) by {}",
        deleted.name,
        id,
        deleted.owner_username
    );
    Ok(Json(json!({ "message": "Project deleted successfully" })))
}

/// get_all_hackathons
///
/// [Admin Route] Lists every hackathon posting with owner and application count.
#[utoipa::path(
    get,
    path = "/api/admin/hackathons",
    responses((status = 200, description = "All hackathons", body = [AdminHackathonView]))
)]
pub async fn get_all_hackathons(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminHackathonView>>, ApiError> {
    let hackathons = state
        .repo
        .get_all_hackathons()
        .await
        .map_err(ApiError::internal("Failed to fetch hackathons"))?;
    Ok(Json(hackathons))
}

/// delete_hackathon
///
/// [Admin Route] Hard-deletes any hackathon posting by ID.
#[utoipa::path(
    delete,
    path = "/api/admin/hackathons/{id}",
    params(("id" = Uuid, Path, description = "Hackathon ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_hackathon(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let deleted = state
        .repo
        .delete_hackathon_admin(id)
        .await
        .map_err(ApiError::internal("Failed to delete hackathon"))?
        .ok_or(ApiError::NotFound("Hackathon not found"))?;

    tracing::info!(
        "Admin deleted hackathon: {} (ID: {}) by {}",
        deleted.name,
        id,
        deleted.owner_username
    );
    Ok(Json(json!({ "message": "Hackathon deleted successfully" })))
}

/// get_all_users
///
/// [Admin Route] Lists every user with derived project and hackathon counts.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses((status = 200, description = "All users", body = [AdminUserView]))
)]
pub async fn get_all_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminUserView>>, ApiError> {
    let users = state
        .repo
        .get_all_users()
        .await
        .map_err(ApiError::internal("Failed to fetch users"))?;
    Ok(Json(users))
}

/// toggle_user_active
///
/// [Admin Route] Flips a user's is_active flag and returns the new value.
/// Calling it twice restores the original state.
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/toggle-active",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Toggled"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn toggle_user_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let toggled = state
        .repo
        .toggle_user_active(id)
        .await
        .map_err(ApiError::internal("Failed to update user"))?
        .ok_or(ApiError::NotFound("User not found"))?;

    let status = if toggled.is_active {
        "activated"
    } else {
        "deactivated"
    };
    tracing::info!("Admin {} user: {} (ID: {})", status, toggled.username, id);

    Ok(Json(json!({
        "message": format!("User {} successfully", status),
        "is_active": toggled.is_active
    })))
}

/// get_stats
///
/// [Admin Route] Dashboard aggregates: total/active counts per table, report
/// totals, and the per-target-type report breakdown, read as one snapshot.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses((status = 200, description = "Stats", body = PlatformStats))
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<PlatformStats>, ApiError> {
    let stats = state
        .repo
        .get_stats()
        .await
        .map_err(ApiError::internal("Failed to fetch stats"))?;
    Ok(Json(stats))
}

/// get_all_research_papers
///
/// [Admin Route] Moderation listing of every paper, abstract truncated to 200
/// characters, with the live report count per paper.
#[utoipa::path(
    get,
    path = "/api/admin/research-papers",
    responses((status = 200, description = "All research papers", body = [AdminPaperView]))
)]
pub async fn get_all_research_papers(
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminPaperView>>, ApiError> {
    let papers = state
        .repo
        .get_all_papers_admin()
        .await
        .map_err(ApiError::internal("Failed to fetch research papers"))?;
    Ok(Json(papers))
}

/// delete_research_paper
///
/// [Admin Route] Hard-deletes any research paper by ID. Unlike the owner-facing
/// delete (which soft-deletes), the admin override removes the row.
#[utoipa::path(
    delete,
    path = "/api/admin/research-papers/{id}",
    params(("id" = Uuid, Path, description = "Paper ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_research_paper(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let deleted = state
        .repo
        .delete_paper_admin(id)
        .await
        .map_err(ApiError::internal("Failed to delete research paper"))?
        .ok_or(ApiError::NotFound("Research paper not found"))?;

    tracing::info!(
        "Admin deleted research paper: {} (ID: {}) by {}",
        deleted.name,
        id,
        deleted.owner_username
    );
    Ok(Json(json!({ "message": "Research paper deleted successfully" })))
}

/// get_all_reports
///
/// [Admin Route] Lists every moderation report newest-first. Each entry carries
/// the resolved target display info; targets that were hard-deleted since the
/// report was filed resolve to an empty object.
#[utoipa::path(
    get,
    path = "/api/admin/reports",
    responses((status = 200, description = "All reports", body = [ReportView]))
)]
pub async fn get_all_reports(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReportView>>, ApiError> {
    let reports = state
        .repo
        .get_all_reports()
        .await
        .map_err(ApiError::internal("Failed to fetch reports"))?;
    Ok(Json(reports))
}

/// update_report_status
///
/// [Admin Route] Moves a report through the moderation workflow. The existence
/// check runs before status validation, so an unknown id is a 404 even when the
/// payload status is also bad.
#[utoipa::path(
    put,
    path = "/api/admin/reports/{id}/status",
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = UpdateReportStatusRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_report_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReportStatusRequest>,
) -> Result<Json<Value>, ApiError> {
    state
        .repo
        .get_report(id)
        .await
        .map_err(ApiError::internal("Failed to update report status"))?
        .ok_or(ApiError::NotFound("Report not found"))?;

    let new_status =
        ReportStatus::parse(&payload.status).ok_or(ApiError::InvalidInput("Invalid status"))?;

    state
        .repo
        .set_report_status(id, new_status)
        .await
        .map_err(ApiError::internal("Failed to update report status"))?;

    tracing::info!("Admin updated report {} status to {}", id, new_status.as_str());
    Ok(Json(json!({ "message": "Report status updated successfully" })))
}
