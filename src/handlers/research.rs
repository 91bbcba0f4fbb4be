use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    models::{
        CreatePaperRequest, MyPaperView, PaperChanges, PaperView, PublishPaperRequest,
        ReportPaperRequest, ReportType, UpdatePaperRequest,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

/// PaperFilter
///
/// Accepted query parameters for the paper listing endpoint
/// (GET /api/research/papers). Both filters are exact matches.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct PaperFilter {
    pub status: Option<String>,
    pub category: Option<String>,
}

/// Parses an ISO-8601 publication date, tolerating a trailing `Z` offset
/// marker, a naive datetime, or a bare date (interpreted as midnight UTC).
fn parse_publication_date(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc());
    }
    Err(ApiError::InvalidInput("Invalid publication date"))
}

/// Trims an optional update field in place. Present keys are applied even when
/// they trim down to an empty string; absent keys leave the column untouched.
fn trimmed(field: Option<String>) -> Option<String> {
    field.map(|v| v.trim().to_string())
}

/// get_papers
///
/// [Authenticated Route] Lists active research papers, newest first, optionally
/// filtered by status and/or category. Owner blocks omit the email in list view.
#[utoipa::path(
    get,
    path = "/api/research/papers",
    params(PaperFilter),
    responses((status = 200, description = "Research papers", body = [PaperView]))
)]
pub async fn get_papers(
    State(state): State<AppState>,
    Query(filter): Query<PaperFilter>,
) -> Result<Json<Vec<PaperView>>, ApiError> {
    let papers = state
        .repo
        .get_papers(filter.status, filter.category)
        .await
        .map_err(ApiError::internal("Failed to fetch research papers"))?;
    Ok(Json(papers))
}

/// get_paper
///
/// [Authenticated Route] Single-paper detail view; active papers only. The
/// owner block includes the email here (and only here).
#[utoipa::path(
    get,
    path = "/api/research/papers/{id}",
    params(("id" = Uuid, Path, description = "Paper ID")),
    responses(
        (status = 200, description = "Found", body = PaperView),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_paper(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaperView>, ApiError> {
    let paper = state
        .repo
        .get_paper(id)
        .await
        .map_err(ApiError::internal("Failed to fetch research paper"))?
        .ok_or(ApiError::NotFound("Research paper not found"))?;
    Ok(Json(paper))
}

/// create_paper
///
/// [Authenticated Route] Submits a new paper in the 'abstract' lifecycle state.
/// Title, abstract, and authors must be non-empty after trimming.
#[utoipa::path(
    post,
    path = "/api/research/papers",
    request_body = CreatePaperRequest,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Missing required fields")
    )
)]
pub async fn create_paper(
    AuthUser { id: user_id, username, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreatePaperRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let title = payload.title.trim().to_string();
    let abstract_text = payload.abstract_text.trim().to_string();
    let authors = payload.authors.trim().to_string();

    if title.is_empty() || abstract_text.is_empty() || authors.is_empty() {
        return Err(ApiError::InvalidInput(
            "Title, abstract, and authors are required",
        ));
    }

    let req = CreatePaperRequest {
        title: title.clone(),
        abstract_text,
        authors,
        category: payload.category.map(|c| c.trim().to_string()),
        keywords: payload.keywords.map(|k| k.trim().to_string()),
    };

    let paper_id = state
        .repo
        .create_paper(req, user_id)
        .await
        .map_err(ApiError::internal("Failed to create research paper"))?;

    tracing::info!("Research paper created: {} by user {}", title, username);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Research paper created successfully",
            "paper_id": paper_id
        })),
    ))
}

/// update_paper
///
/// [Authenticated Route] Partial update of a paper. Only the owner or an admin
/// may update; only supplied keys are mutated; updated_at is always refreshed.
#[utoipa::path(
    put,
    path = "/api/research/papers/{id}",
    params(("id" = Uuid, Path, description = "Paper ID")),
    request_body = UpdatePaperRequest,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Invalid publication date"),
        (status = 403, description = "Not owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_paper(
    AuthUser { id: user_id, username, is_admin }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePaperRequest>,
) -> Result<Json<Value>, ApiError> {
    let paper = state
        .repo
        .get_active_paper(id)
        .await
        .map_err(ApiError::internal("Failed to update research paper"))?
        .ok_or(ApiError::NotFound("Research paper not found"))?;

    if paper.owner_id != user_id && !is_admin {
        return Err(ApiError::Forbidden("Unauthorized"));
    }

    // An empty publication_date string is ignored rather than rejected, like a
    // missing key.
    let publication_date = match payload.publication_date.as_deref() {
        Some(raw) if !raw.is_empty() => Some(parse_publication_date(raw)?),
        _ => None,
    };

    let changes = PaperChanges {
        title: trimmed(payload.title),
        abstract_text: trimmed(payload.abstract_text),
        authors: trimmed(payload.authors),
        category: trimmed(payload.category),
        keywords: trimmed(payload.keywords),
        status: payload.status,
        paper_url: trimmed(payload.paper_url),
        doi: trimmed(payload.doi),
        publication_date,
    };

    let updated = state
        .repo
        .update_paper(id, changes)
        .await
        .map_err(ApiError::internal("Failed to update research paper"))?;
    if !updated {
        return Err(ApiError::NotFound("Research paper not found"));
    }

    tracing::info!("Research paper updated: {} by user {}", paper.title, username);
    Ok(Json(json!({ "message": "Research paper updated successfully" })))
}

/// delete_paper
///
/// [Authenticated Route] Owner-facing delete: a soft delete that flags the row
/// inactive and refreshes updated_at. The row itself persists.
#[utoipa::path(
    delete,
    path = "/api/research/papers/{id}",
    params(("id" = Uuid, Path, description = "Paper ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 403, description = "Not owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_paper(
    AuthUser { id: user_id, username, is_admin }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let paper = state
        .repo
        .get_active_paper(id)
        .await
        .map_err(ApiError::internal("Failed to delete research paper"))?
        .ok_or(ApiError::NotFound("Research paper not found"))?;

    if paper.owner_id != user_id && !is_admin {
        return Err(ApiError::Forbidden("Unauthorized"));
    }

    let deleted = state
        .repo
        .soft_delete_paper(id)
        .await
        .map_err(ApiError::internal("Failed to delete research paper"))?;
    if !deleted {
        return Err(ApiError::NotFound("Research paper not found"));
    }

    tracing::info!("Research paper deleted: {} by user {}", paper.title, username);
    Ok(Json(json!({ "message": "Research paper deleted successfully" })))
}

/// publish_paper
///
/// [Authenticated Route] The abstract → published transition. Requires a
/// non-empty paper URL; records an optional DOI and stamps publication_date.
#[utoipa::path(
    post,
    path = "/api/research/papers/{id}/publish",
    params(("id" = Uuid, Path, description = "Paper ID")),
    request_body = PublishPaperRequest,
    responses(
        (status = 200, description = "Published"),
        (status = 400, description = "Missing paper URL"),
        (status = 403, description = "Not owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn publish_paper(
    AuthUser { id: user_id, username, is_admin }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PublishPaperRequest>,
) -> Result<Json<Value>, ApiError> {
    let paper = state
        .repo
        .get_active_paper(id)
        .await
        .map_err(ApiError::internal("Failed to publish research paper"))?
        .ok_or(ApiError::NotFound("Research paper not found"))?;

    if paper.owner_id != user_id && !is_admin {
        return Err(ApiError::Forbidden("Unauthorized"));
    }

    let paper_url = payload.paper_url.trim().to_string();
    if paper_url.is_empty() {
        return Err(ApiError::InvalidInput(
            "Paper URL is required for publishing",
        ));
    }

    // An empty DOI leaves any previously stored value in place.
    let doi = payload
        .doi
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let published = state
        .repo
        .publish_paper(id, paper_url, doi)
        .await
        .map_err(ApiError::internal("Failed to publish research paper"))?;
    if !published {
        return Err(ApiError::NotFound("Research paper not found"));
    }

    tracing::info!("Research paper published: {} by user {}", paper.title, username);
    Ok(Json(json!({ "message": "Research paper published successfully" })))
}

/// get_my_papers
///
/// [Authenticated Route] The caller's own active papers, newest first. No owner
/// nesting in the payload.
#[utoipa::path(
    get,
    path = "/api/research/my-papers",
    responses((status = 200, description = "My papers", body = [MyPaperView]))
)]
pub async fn get_my_papers(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<MyPaperView>>, ApiError> {
    let papers = state
        .repo
        .get_my_papers(user_id)
        .await
        .map_err(ApiError::internal("Failed to fetch research papers"))?;
    Ok(Json(papers))
}

/// report_paper
///
/// [Authenticated Route] Files a moderation report against a paper. Self-reports
/// and duplicate (reporter, target) pairs are rejected; the duplicate check is
/// an application-level pre-check, not a storage constraint.
#[utoipa::path(
    post,
    path = "/api/research/papers/{id}/report",
    params(("id" = Uuid, Path, description = "Paper ID")),
    request_body = ReportPaperRequest,
    responses(
        (status = 201, description = "Reported"),
        (status = 400, description = "Self report, duplicate, or empty reason"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn report_paper(
    AuthUser { id: user_id, username, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReportPaperRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    // The report flow resolves the paper regardless of is_active: soft-deleted
    // papers remain reportable.
    let paper = state
        .repo
        .get_paper_any(id)
        .await
        .map_err(ApiError::internal("Failed to report research paper"))?
        .ok_or(ApiError::NotFound("Research paper not found"))?;

    if paper.owner_id == user_id {
        return Err(ApiError::InvalidInput(
            "You cannot report your own research paper",
        ));
    }

    let already_reported = state
        .repo
        .has_report(user_id, ReportType::ResearchPaper, id)
        .await
        .map_err(ApiError::internal("Failed to report research paper"))?;
    if already_reported {
        return Err(ApiError::InvalidInput(
            "You have already reported this research paper",
        ));
    }

    let reason = payload.reason.trim().to_string();
    if reason.is_empty() {
        return Err(ApiError::InvalidInput("Reason is required"));
    }

    state
        .repo
        .create_report(user_id, ReportType::ResearchPaper, id, reason)
        .await
        .map_err(ApiError::internal("Failed to report research paper"))?;

    tracing::info!("Research paper reported: {} by user {}", paper.title, username);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Research paper reported successfully" })),
    ))
}
