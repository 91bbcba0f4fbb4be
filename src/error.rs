use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// ApiError
///
/// The single error taxonomy for every route. Each variant maps to exactly one
/// HTTP status, and `IntoResponse` renders the uniform `{"error": "..."}` JSON
/// body the frontend expects. Database failures keep a per-operation `context`
/// string as the client-facing message while the underlying `sqlx::Error` is
/// only ever logged server-side.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, malformed, or expired bearer token.
    #[error("Authentication required")]
    Unauthenticated,

    /// Role or ownership check failed.
    #[error("{0}")]
    Forbidden(&'static str),

    /// The id (or token subject) does not resolve to a row.
    #[error("{0}")]
    NotFound(&'static str),

    /// Missing/empty required field, invalid enum value, or a business-rule
    /// rejection (self-report, duplicate report).
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("{context}")]
    Database {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl ApiError {
    /// Adapter for `map_err` on repository calls: attaches the generic message
    /// the client will see if the query fails.
    ///
    /// ```ignore
    /// let rows = state.repo.get_all_projects().await
    ///     .map_err(ApiError::internal("Failed to fetch projects"))?;
    /// ```
    pub fn internal(context: &'static str) -> impl FnOnce(sqlx::Error) -> ApiError {
        move |source| ApiError::Database { context, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Database { context, source } => {
                // The client only sees the generic context string; the real
                // failure is recorded here with its type and message.
                tracing::error!("{}: {:?}", context, source);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
