use assemble_platform::{
    AppConfig, AppState, MockMailer,
    auth::{AdminUser, AuthUser, Claims},
    config::Env,
    models::{
        AdminHackathonView, AdminPaperView, AdminProjectView, AdminUserView, CreatePaperRequest,
        DeletedEntity, MyPaperView, PaperChanges, PaperView, PlatformStats, Report, ReportStatus,
        ReportType, ReportView, ResearchPaper, ToggledUser, User,
    },
    repository::Repository,
};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::{sync::Arc, time::SystemTime};
use uuid::Uuid;

// --- Mock Repository for Auth Logic ---

#[derive(Default)]
struct MockAuthRepo {
    user_to_return: Option<User>,
}

#[async_trait]
impl Repository for MockAuthRepo {
    async fn get_user(&self, _id: Uuid) -> Result<Option<User>, sqlx::Error> {
        Ok(self.user_to_return.clone())
    }
    async fn get_user_by_username(&self, _username: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self.user_to_return.clone())
    }

    // The auth extractors only touch the user lookups; everything below is a
    // placeholder to satisfy the trait.
    async fn get_all_projects(&self) -> Result<Vec<AdminProjectView>, sqlx::Error> {
        Ok(vec![])
    }
    async fn get_all_hackathons(&self) -> Result<Vec<AdminHackathonView>, sqlx::Error> {
        Ok(vec![])
    }
    async fn get_all_papers_admin(&self) -> Result<Vec<AdminPaperView>, sqlx::Error> {
        Ok(vec![])
    }
    async fn delete_project_admin(&self, _id: Uuid) -> Result<Option<DeletedEntity>, sqlx::Error> {
        Ok(None)
    }
    async fn delete_hackathon_admin(
        &self,
        _id: Uuid,
    ) -> Result<Option<DeletedEntity>, sqlx::Error> {
        Ok(None)
    }
    async fn delete_paper_admin(&self, _id: Uuid) -> Result<Option<DeletedEntity>, sqlx::Error> {
        Ok(None)
    }
    async fn get_all_users(&self) -> Result<Vec<AdminUserView>, sqlx::Error> {
        Ok(vec![])
    }
    async fn toggle_user_active(&self, _id: Uuid) -> Result<Option<ToggledUser>, sqlx::Error> {
        Ok(None)
    }
    async fn get_stats(&self) -> Result<PlatformStats, sqlx::Error> {
        Ok(PlatformStats::default())
    }
    async fn get_all_reports(&self) -> Result<Vec<ReportView>, sqlx::Error> {
        Ok(vec![])
    }
    async fn get_report(&self, _id: Uuid) -> Result<Option<Report>, sqlx::Error> {
        Ok(None)
    }
    async fn set_report_status(
        &self,
        _id: Uuid,
        _status: ReportStatus,
    ) -> Result<bool, sqlx::Error> {
        Ok(false)
    }
    async fn get_papers(
        &self,
        _status: Option<String>,
        _category: Option<String>,
    ) -> Result<Vec<PaperView>, sqlx::Error> {
        Ok(vec![])
    }
    async fn get_paper(&self, _id: Uuid) -> Result<Option<PaperView>, sqlx::Error> {
        Ok(None)
    }
    async fn get_active_paper(&self, _id: Uuid) -> Result<Option<ResearchPaper>, sqlx::Error> {
        Ok(None)
    }
    async fn get_paper_any(&self, _id: Uuid) -> Result<Option<ResearchPaper>, sqlx::Error> {
        Ok(None)
    }
    async fn create_paper(
        &self,
        _req: CreatePaperRequest,
        _owner_id: Uuid,
    ) -> Result<Uuid, sqlx::Error> {
        Ok(Uuid::nil())
    }
    async fn update_paper(&self, _id: Uuid, _changes: PaperChanges) -> Result<bool, sqlx::Error> {
        Ok(false)
    }
    async fn soft_delete_paper(&self, _id: Uuid) -> Result<bool, sqlx::Error> {
        Ok(false)
    }
    async fn publish_paper(
        &self,
        _id: Uuid,
        _paper_url: String,
        _doi: Option<String>,
    ) -> Result<bool, sqlx::Error> {
        Ok(false)
    }
    async fn get_my_papers(&self, _owner_id: Uuid) -> Result<Vec<MyPaperView>, sqlx::Error> {
        Ok(vec![])
    }
    async fn has_report(
        &self,
        _reporter_id: Uuid,
        _report_type: ReportType,
        _target_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        Ok(false)
    }
    async fn create_report(
        &self,
        _reporter_id: Uuid,
        _report_type: ReportType,
        _target_id: Uuid,
        _reason: String,
    ) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

// --- Test Utilities ---

const TEST_JWT_SECRET: &str = "super-secure-test-secret-value-local";

fn create_token(username: &str, exp_offset: i64) -> String {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: username.to_string(),
        iat: now as usize,
        exp: (now + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

fn create_app_state(env: Env, repo: MockAuthRepo) -> AppState {
    let mut config = AppConfig::default();
    config.env = env;
    config.jwt_secret = TEST_JWT_SECRET.to_string();

    AppState {
        repo: Arc::new(repo),
        mailer: Arc::new(MockMailer::new()),
        config,
    }
}

fn test_user(username: &str, is_admin: bool) -> User {
    User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        full_name: "Test User".to_string(),
        is_active: true,
        is_admin,
        ..User::default()
    }
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn bearer(parts: &mut Parts, token: &str) {
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
}

async fn rejection_status<T, E: axum::response::IntoResponse>(
    result: Result<T, E>,
) -> StatusCode {
    match result {
        Ok(_) => panic!("expected the extractor to reject"),
        Err(e) => e.into_response().status(),
    }
}

// --- Tests ---

#[tokio::test]
async fn test_auth_success_with_valid_jwt() {
    let token = create_token("jane", 3600);

    let expected = test_user("jane", false);
    let state = create_app_state(
        Env::Production,
        MockAuthRepo {
            user_to_return: Some(expected.clone()),
        },
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    bearer(&mut parts, &token);

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await.unwrap();

    assert_eq!(auth_user.id, expected.id);
    assert_eq!(auth_user.username, "jane");
    assert!(!auth_user.is_admin);
}

#[tokio::test]
async fn test_auth_failure_with_missing_header() {
    let state = create_app_state(Env::Production, MockAuthRepo::default());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());

    let result = AuthUser::from_request_parts(&mut parts, &state).await;
    assert_eq!(rejection_status(result).await, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_expired_jwt() {
    // Issued an hour ago, expired half an hour ago.
    let token = create_token("jane", -1800);

    let state = create_app_state(
        Env::Production,
        MockAuthRepo {
            user_to_return: Some(test_user("jane", false)),
        },
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    bearer(&mut parts, &token);

    let result = AuthUser::from_request_parts(&mut parts, &state).await;
    assert_eq!(rejection_status(result).await, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_with_garbage_token() {
    let state = create_app_state(Env::Production, MockAuthRepo::default());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    bearer(&mut parts, "not.a.jwt");

    let result = AuthUser::from_request_parts(&mut parts, &state).await;
    assert_eq!(rejection_status(result).await, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_valid_token_for_vanished_user_is_404() {
    // The token verifies, but the subject no longer resolves to a row.
    let token = create_token("ghost", 3600);
    let state = create_app_state(Env::Production, MockAuthRepo::default());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    bearer(&mut parts, &token);

    let result = AuthUser::from_request_parts(&mut parts, &state).await;
    assert_eq!(rejection_status(result).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_gate_rejects_non_admin() {
    let token = create_token("jane", 3600);
    let state = create_app_state(
        Env::Production,
        MockAuthRepo {
            user_to_return: Some(test_user("jane", false)),
        },
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    bearer(&mut parts, &token);

    let result = AdminUser::from_request_parts(&mut parts, &state).await;
    assert_eq!(rejection_status(result).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_gate_authentication_takes_precedence() {
    // No token at all: the gate must answer 401, not 403.
    let state = create_app_state(Env::Production, MockAuthRepo::default());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());

    let result = AdminUser::from_request_parts(&mut parts, &state).await;
    assert_eq!(rejection_status(result).await, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_gate_accepts_admin() {
    let token = create_token("root", 3600);
    let state = create_app_state(
        Env::Production,
        MockAuthRepo {
            user_to_return: Some(test_user("root", true)),
        },
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    bearer(&mut parts, &token);

    let AdminUser(user) = AdminUser::from_request_parts(&mut parts, &state).await.unwrap();
    assert!(user.is_admin);
    assert_eq!(user.username, "root");
}

#[tokio::test]
async fn test_local_bypass_success() {
    let mock_user = test_user("dev", true);
    let mock_user_id = mock_user.id;
    let state = create_app_state(
        Env::Local,
        MockAuthRepo {
            user_to_return: Some(mock_user),
        },
    );

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&mock_user_id.to_string()).unwrap(),
    );

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await.unwrap();

    assert_eq!(auth_user.id, mock_user_id);
    assert!(auth_user.is_admin);
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let state = create_app_state(Env::Production, MockAuthRepo::default());

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    // Provide ONLY the local bypass header.
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap(),
    );

    let result = AuthUser::from_request_parts(&mut parts, &state).await;
    assert_eq!(rejection_status(result).await, StatusCode::UNAUTHORIZED);
}
