use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// Represents the user's canonical identity record stored in the `users` table.
/// Resolved during authentication and reused for every ownership and role check.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    /// Unique handle; also the JWT subject claim.
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    /// Deactivated accounts keep their rows but are flagged off by an admin.
    pub is_active: bool,
    /// The RBAC flag gating the entire `/api/admin` surface.
    pub is_admin: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Project
///
/// A community project posting from the `projects` table.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: String,
    pub is_active: bool,
    // FK to users.id (Owner).
    pub owner_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// HackathonPost
///
/// A hackathon teammate-search posting from the `hackathon_posts` table.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct HackathonPost {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub hackathon_name: String,
    #[ts(type = "string | null")]
    pub hackathon_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub owner_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// ResearchPaper
///
/// A research paper record from the `research_papers` table. Papers start life as
/// an abstract and move to `published` once a paper URL is recorded.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ResearchPaper {
    pub id: Uuid,
    pub title: String,

    /// Maps SQL column "abstract" to Rust field "abstract_text".
    /// This renaming is necessary because `abstract` is a reserved keyword in Rust.
    #[sqlx(rename = "abstract")]
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    pub authors: String,
    pub category: String,
    pub keywords: String,
    /// Lifecycle marker: 'abstract' on creation, 'published' after the publish
    /// transition.
    pub status: String,
    pub paper_url: Option<String>,
    pub doi: Option<String>,
    #[ts(type = "string | null")]
    pub publication_date: Option<DateTime<Utc>>,
    /// Soft-delete flag: inactive papers persist but never appear in listings.
    pub is_active: bool,
    pub owner_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Report
///
/// A moderation report from the `reports` table. `target_id` is a polymorphic
/// reference resolved through `report_type`; the storage layer cannot enforce
/// referential integrity across the three target tables, so resolution happens
/// at the application layer (see `ReportType`).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Report {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub report_type: String,
    pub target_id: Uuid,
    pub reason: String,
    pub status: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Application-Layer Enums ---

/// ReportType
///
/// The tagged union behind `Report.report_type`. Dispatching on this enum (rather
/// than on raw strings) is what resolves the polymorphic `target_id` against the
/// correct content table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Project,
    Hackathon,
    ResearchPaper,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Project => "project",
            ReportType::Hackathon => "hackathon",
            ReportType::ResearchPaper => "research_paper",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "project" => Some(ReportType::Project),
            "hackathon" => Some(ReportType::Hackathon),
            "research_paper" => Some(ReportType::ResearchPaper),
            _ => None,
        }
    }
}

/// ReportStatus
///
/// Moderation workflow states. `update_report_status` rejects anything outside
/// this set before touching the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewed => "reviewed",
            ReportStatus::Resolved => "resolved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReportStatus::Pending),
            "reviewed" => Some(ReportStatus::Reviewed),
            "resolved" => Some(ReportStatus::Resolved),
            _ => None,
        }
    }
}

// --- Nested Owner / Reporter Summaries (Output) ---

/// OwnerSummary
///
/// The owner block nested inside every admin listing entry.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// PaperOwner
///
/// The owner block nested inside research-paper responses. The email is only
/// populated in the single-paper view; list views omit the key entirely.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PaperOwner {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// ReporterSummary
///
/// Who filed a report; nested inside the admin report listing.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ReporterSummary {
    pub id: Uuid,
    pub username: String,
}

// --- Admin Listing Schemas (Output) ---

/// AdminProjectView
///
/// One row of GET /api/admin/projects: the project plus its owner summary and a
/// live application count.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminProjectView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: String,
    pub is_active: bool,
    pub owner: OwnerSummary,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub application_count: i64,
}

/// AdminHackathonView
///
/// One row of GET /api/admin/hackathons.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminHackathonView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub hackathon_name: String,
    #[ts(type = "string | null")]
    pub hackathon_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub owner: OwnerSummary,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub application_count: i64,
}

/// AdminUserView
///
/// One row of GET /api/admin/users, with derived content counts.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct AdminUserView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub is_admin: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub project_count: i64,
    pub hackathon_count: i64,
}

/// AdminPaperView
///
/// One row of GET /api/admin/research-papers. The abstract is truncated to its
/// first 200 characters (plus "...") to keep the moderation table compact; the
/// live report count is computed per paper.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminPaperView {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: String,
    pub category: String,
    pub status: String,
    pub is_active: bool,
    pub owner: OwnerSummary,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    pub report_count: i64,
}

// --- Report Moderation Schemas (Output) ---

/// ReportTargetInfo
///
/// Display info for the reported entity, resolved by dispatching on the report
/// type. When the target has since been hard-deleted both fields are absent and
/// the block serializes as an empty object rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ReportTargetInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// ReportView
///
/// One row of GET /api/admin/reports.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ReportView {
    pub id: Uuid,
    pub report_type: String,
    pub target_id: Uuid,
    pub target_info: ReportTargetInfo,
    pub reason: String,
    pub status: String,
    pub reporter: ReporterSummary,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Dashboard Schemas (Output) ---

/// UserCounts
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserCounts {
    pub total: i64,
    pub active: i64,
}

/// ContentCounts
///
/// Per-content-table slice of the stats dashboard, including how many reports
/// point at that table.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ContentCounts {
    pub total: i64,
    pub active: i64,
    pub reports: i64,
}

/// ReportCounts
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ReportCounts {
    pub total: i64,
    pub pending: i64,
}

/// PlatformStats
///
/// Output schema for the administrative statistics dashboard (GET /api/admin/stats).
/// Computed inside a single read transaction so the counters form a consistent
/// snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PlatformStats {
    pub users: UserCounts,
    pub projects: ContentCounts,
    pub hackathons: ContentCounts,
    pub research_papers: ContentCounts,
    pub reports: ReportCounts,
}

// --- Research Paper Schemas (Output) ---

/// PaperView
///
/// Full research-paper payload for listing and detail routes, with the nested
/// owner block.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PaperView {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: String,
    pub category: String,
    pub keywords: String,
    pub status: String,
    pub paper_url: Option<String>,
    pub doi: Option<String>,
    #[ts(type = "string | null")]
    pub publication_date: Option<DateTime<Utc>>,
    pub owner_id: Uuid,
    pub owner: PaperOwner,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// MyPaperView
///
/// Listing entry for GET /api/research/my-papers. No owner nesting: the caller
/// already knows the papers are theirs.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct MyPaperView {
    pub id: Uuid,
    pub title: String,
    #[sqlx(rename = "abstract")]
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: String,
    pub category: String,
    pub keywords: String,
    pub status: String,
    pub paper_url: Option<String>,
    pub doi: Option<String>,
    #[ts(type = "string | null")]
    pub publication_date: Option<DateTime<Utc>>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// CreatePaperRequest
///
/// Input payload for submitting a new research paper (POST /api/research/papers).
/// Title, abstract, and authors are required after trimming; category and
/// keywords default to empty strings.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatePaperRequest {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: String,
    pub category: Option<String>,
    pub keywords: Option<String>,
}

/// UpdatePaperRequest
///
/// Partial update payload for PUT /api/research/papers/{id}. Only keys present
/// in the JSON are mutated; `publication_date` is an ISO-8601 string (a trailing
/// `Z` offset marker is accepted).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdatePaperRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
}

/// PublishPaperRequest
///
/// Input payload for the draft → published transition. `paper_url` is mandatory.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PublishPaperRequest {
    pub paper_url: String,
    pub doi: Option<String>,
}

/// ReportPaperRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ReportPaperRequest {
    pub reason: String,
}

/// UpdateReportStatusRequest
///
/// Carries the raw status string; validated against `ReportStatus` in the handler.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateReportStatusRequest {
    pub status: String,
}

// --- Internal Write Models (Repository Use Only) ---

/// PaperChanges
///
/// The validated form of `UpdatePaperRequest`: string fields already trimmed and
/// the publication date parsed. Only used between handler and repository.
#[derive(Debug, Clone, Default)]
pub struct PaperChanges {
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub authors: Option<String>,
    pub category: Option<String>,
    pub keywords: Option<String>,
    pub status: Option<String>,
    pub paper_url: Option<String>,
    pub doi: Option<String>,
    pub publication_date: Option<DateTime<Utc>>,
}

/// DeletedEntity
///
/// Display name and owner username of a hard-deleted row, captured by the
/// DELETE's RETURNING clause for the audit log.
#[derive(Debug, Clone)]
pub struct DeletedEntity {
    pub name: String,
    pub owner_username: String,
}

/// ToggledUser
///
/// Result of an activation toggle: the username (for logging) and the new flag.
#[derive(Debug, Clone)]
pub struct ToggledUser {
    pub username: String,
    pub is_active: bool,
}
