use crate::models::{
    AdminHackathonView, AdminPaperView, AdminProjectView, AdminUserView, ContentCounts,
    CreatePaperRequest, DeletedEntity, MyPaperView, OwnerSummary, PaperChanges, PaperOwner,
    PaperView, PlatformStats, Report, ReportCounts, ReportStatus, ReportTargetInfo, ReportType,
    ReportView, ReporterSummary, ResearchPaper, ToggledUser, User, UserCounts,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, query_builder::QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations, allowing the
/// handlers to interact with the data layer without knowing the concrete
/// implementation (Postgres in production, mocks in tests).
///
/// Every method returns `Result<_, sqlx::Error>`: handlers decide the generic
/// client-facing message for a failed query, the repository never swallows one.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- User / Auth ---
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error>;

    // --- Admin: content oversight ---
    // Listings return every row (active or not), newest first, with the owner
    // summary and derived count attached.
    async fn get_all_projects(&self) -> Result<Vec<AdminProjectView>, sqlx::Error>;
    async fn get_all_hackathons(&self) -> Result<Vec<AdminHackathonView>, sqlx::Error>;
    async fn get_all_papers_admin(&self) -> Result<Vec<AdminPaperView>, sqlx::Error>;

    // Hard deletes. `None` means the id did not resolve; `Some` carries the
    // display name and owner username captured before the row disappeared.
    async fn delete_project_admin(&self, id: Uuid) -> Result<Option<DeletedEntity>, sqlx::Error>;
    async fn delete_hackathon_admin(&self, id: Uuid) -> Result<Option<DeletedEntity>, sqlx::Error>;
    async fn delete_paper_admin(&self, id: Uuid) -> Result<Option<DeletedEntity>, sqlx::Error>;

    // --- Admin: users & stats ---
    async fn get_all_users(&self) -> Result<Vec<AdminUserView>, sqlx::Error>;
    /// Flips `is_active` and reports the new value; involution by construction.
    async fn toggle_user_active(&self, id: Uuid) -> Result<Option<ToggledUser>, sqlx::Error>;
    async fn get_stats(&self) -> Result<PlatformStats, sqlx::Error>;

    // --- Admin: moderation reports ---
    async fn get_all_reports(&self) -> Result<Vec<ReportView>, sqlx::Error>;
    async fn get_report(&self, id: Uuid) -> Result<Option<Report>, sqlx::Error>;
    /// Returns false when the report id does not exist. The status value has
    /// already been validated by the handler.
    async fn set_report_status(&self, id: Uuid, status: ReportStatus)
    -> Result<bool, sqlx::Error>;

    // --- Research papers ---
    async fn get_papers(
        &self,
        status: Option<String>,
        category: Option<String>,
    ) -> Result<Vec<PaperView>, sqlx::Error>;
    /// Active papers only; the owner block includes the email (detail view).
    async fn get_paper(&self, id: Uuid) -> Result<Option<PaperView>, sqlx::Error>;
    /// Raw active row, used by mutation handlers for the ownership check.
    async fn get_active_paper(&self, id: Uuid) -> Result<Option<ResearchPaper>, sqlx::Error>;
    /// Raw row regardless of is_active; the report flow targets soft-deleted
    /// papers too.
    async fn get_paper_any(&self, id: Uuid) -> Result<Option<ResearchPaper>, sqlx::Error>;
    async fn create_paper(
        &self,
        req: CreatePaperRequest,
        owner_id: Uuid,
    ) -> Result<Uuid, sqlx::Error>;
    /// Partial update via COALESCE; refreshes updated_at. False = no active row.
    async fn update_paper(&self, id: Uuid, changes: PaperChanges) -> Result<bool, sqlx::Error>;
    async fn soft_delete_paper(&self, id: Uuid) -> Result<bool, sqlx::Error>;
    async fn publish_paper(
        &self,
        id: Uuid,
        paper_url: String,
        doi: Option<String>,
    ) -> Result<bool, sqlx::Error>;
    async fn get_my_papers(&self, owner_id: Uuid) -> Result<Vec<MyPaperView>, sqlx::Error>;

    // --- Report filing ---
    async fn has_report(
        &self,
        reporter_id: Uuid,
        report_type: ReportType,
        target_id: Uuid,
    ) -> Result<bool, sqlx::Error>;
    async fn create_report(
        &self,
        reporter_id: Uuid,
        report_type: ReportType,
        target_id: Uuid,
        reason: String,
    ) -> Result<(), sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Dispatches on the stored report type to the matching content table and
    /// reads the target's display name and owner username. A vanished target
    /// (or an unknown type string) resolves to the empty info block.
    async fn resolve_report_target(
        &self,
        report_type: &str,
        target_id: Uuid,
    ) -> Result<ReportTargetInfo, sqlx::Error> {
        let query = match ReportType::parse(report_type) {
            Some(ReportType::Project) => {
                "SELECT p.name AS name, u.username AS owner
                 FROM projects p JOIN users u ON u.id = p.owner_id
                 WHERE p.id = $1"
            }
            Some(ReportType::Hackathon) => {
                "SELECT h.title AS name, u.username AS owner
                 FROM hackathon_posts h JOIN users u ON u.id = h.owner_id
                 WHERE h.id = $1"
            }
            Some(ReportType::ResearchPaper) => {
                "SELECT p.title AS name, u.username AS owner
                 FROM research_papers p JOIN users u ON u.id = p.owner_id
                 WHERE p.id = $1"
            }
            None => return Ok(ReportTargetInfo::default()),
        };

        let row: Option<(String, String)> = sqlx::query_as(query)
            .bind(target_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match row {
            Some((name, owner)) => ReportTargetInfo {
                name: Some(name),
                owner: Some(owner),
            },
            None => ReportTargetInfo::default(),
        })
    }
}

// --- Private row types for joined queries ---
// sqlx's FromRow cannot populate nested structs, so enriched listings fetch a
// flat row first and fold it into the response shape.

#[derive(FromRow)]
struct AdminProjectRow {
    id: Uuid,
    name: String,
    description: String,
    status: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    owner_id: Uuid,
    owner_username: String,
    owner_email: String,
    application_count: i64,
}

#[derive(FromRow)]
struct AdminHackathonRow {
    id: Uuid,
    title: String,
    description: String,
    hackathon_name: String,
    hackathon_date: Option<DateTime<Utc>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    owner_id: Uuid,
    owner_username: String,
    owner_email: String,
    application_count: i64,
}

#[derive(FromRow)]
struct AdminPaperRow {
    id: Uuid,
    title: String,
    #[sqlx(rename = "abstract")]
    abstract_text: String,
    authors: String,
    category: String,
    status: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    owner_id: Uuid,
    owner_username: String,
    owner_email: String,
    report_count: i64,
}

#[derive(FromRow)]
struct PaperRow {
    id: Uuid,
    title: String,
    #[sqlx(rename = "abstract")]
    abstract_text: String,
    authors: String,
    category: String,
    keywords: String,
    status: String,
    paper_url: Option<String>,
    doi: Option<String>,
    publication_date: Option<DateTime<Utc>>,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_username: String,
    owner_full_name: String,
    owner_avatar_url: Option<String>,
    owner_email: String,
}

impl PaperRow {
    /// Folds the flat row into the API shape. The owner email is only carried
    /// in the single-paper view.
    fn into_view(self, include_email: bool) -> PaperView {
        PaperView {
            id: self.id,
            title: self.title,
            abstract_text: self.abstract_text,
            authors: self.authors,
            category: self.category,
            keywords: self.keywords,
            status: self.status,
            paper_url: self.paper_url,
            doi: self.doi,
            publication_date: self.publication_date,
            owner_id: self.owner_id,
            owner: PaperOwner {
                id: self.owner_id,
                username: self.owner_username,
                full_name: self.owner_full_name,
                avatar_url: self.owner_avatar_url,
                email: include_email.then_some(self.owner_email),
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ReportRow {
    id: Uuid,
    report_type: String,
    target_id: Uuid,
    reason: String,
    status: String,
    created_at: DateTime<Utc>,
    reporter_id: Uuid,
    reporter_username: String,
}

/// Truncates a moderation-table abstract to its first 200 characters.
fn truncate_abstract(text: &str) -> String {
    if text.chars().count() > 200 {
        let mut short: String = text.chars().take(200).collect();
        short.push_str("...");
        short
    } else {
        text.to_string()
    }
}

const PAPER_SELECT: &str = r#"
    SELECT p.id, p.title, p.abstract, p.authors, p.category, p.keywords, p.status,
           p.paper_url, p.doi, p.publication_date, p.owner_id, p.created_at, p.updated_at,
           u.username AS owner_username, u.full_name AS owner_full_name,
           u.avatar_url AS owner_avatar_url, u.email AS owner_email
    FROM research_papers p
    JOIN users u ON u.id = p.owner_id
    WHERE p.is_active = true
"#;

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, full_name, avatar_url, is_active, is_admin, created_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, full_name, avatar_url, is_active, is_admin, created_at
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    /// get_all_projects
    ///
    /// Administrative listing of every project, active or not, with the owner
    /// summary and a live application count per row.
    async fn get_all_projects(&self) -> Result<Vec<AdminProjectView>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AdminProjectRow>(
            r#"
            SELECT p.id, p.name, p.description, p.status, p.is_active, p.created_at,
                   u.id AS owner_id, u.username AS owner_username, u.email AS owner_email,
                   (SELECT COUNT(*) FROM project_applications a WHERE a.project_id = p.id)
                       AS application_count
            FROM projects p
            JOIN users u ON u.id = p.owner_id
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| AdminProjectView {
                id: r.id,
                name: r.name,
                description: r.description,
                status: r.status,
                is_active: r.is_active,
                owner: OwnerSummary {
                    id: r.owner_id,
                    username: r.owner_username,
                    email: r.owner_email,
                },
                created_at: r.created_at,
                application_count: r.application_count,
            })
            .collect())
    }

    async fn get_all_hackathons(&self) -> Result<Vec<AdminHackathonView>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AdminHackathonRow>(
            r#"
            SELECT h.id, h.title, h.description, h.hackathon_name, h.hackathon_date,
                   h.is_active, h.created_at,
                   u.id AS owner_id, u.username AS owner_username, u.email AS owner_email,
                   (SELECT COUNT(*) FROM hackathon_applications a WHERE a.hackathon_id = h.id)
                       AS application_count
            FROM hackathon_posts h
            JOIN users u ON u.id = h.owner_id
            ORDER BY h.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| AdminHackathonView {
                id: r.id,
                title: r.title,
                description: r.description,
                hackathon_name: r.hackathon_name,
                hackathon_date: r.hackathon_date,
                is_active: r.is_active,
                owner: OwnerSummary {
                    id: r.owner_id,
                    username: r.owner_username,
                    email: r.owner_email,
                },
                created_at: r.created_at,
                application_count: r.application_count,
            })
            .collect())
    }

    /// get_all_papers_admin
    ///
    /// Moderation listing with a per-paper report count (reports filtered on
    /// report_type + target_id) and the abstract truncated for table display.
    async fn get_all_papers_admin(&self) -> Result<Vec<AdminPaperView>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AdminPaperRow>(
            r#"
            SELECT p.id, p.title, p.abstract, p.authors, p.category, p.status,
                   p.is_active, p.created_at,
                   u.id AS owner_id, u.username AS owner_username, u.email AS owner_email,
                   (SELECT COUNT(*) FROM reports r
                     WHERE r.report_type = 'research_paper' AND r.target_id = p.id)
                       AS report_count
            FROM research_papers p
            JOIN users u ON u.id = p.owner_id
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| AdminPaperView {
                id: r.id,
                title: r.title,
                abstract_text: truncate_abstract(&r.abstract_text),
                authors: r.authors,
                category: r.category,
                status: r.status,
                is_active: r.is_active,
                owner: OwnerSummary {
                    id: r.owner_id,
                    username: r.owner_username,
                    email: r.owner_email,
                },
                created_at: r.created_at,
                report_count: r.report_count,
            })
            .collect())
    }

    /// delete_project_admin
    ///
    /// Hard delete without ownership check. The DELETE joins the owner row so
    /// the display name and owner username survive for the audit log even
    /// though the project row is gone by the time the handler sees the result.
    async fn delete_project_admin(&self, id: Uuid) -> Result<Option<DeletedEntity>, sqlx::Error> {
        let row: Option<(String, String)> = sqlx::query_as(
            r#"
            DELETE FROM projects p USING users u
            WHERE p.id = $1 AND u.id = p.owner_id
            RETURNING p.name, u.username
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(name, owner_username)| DeletedEntity {
            name,
            owner_username,
        }))
    }

    async fn delete_hackathon_admin(&self, id: Uuid) -> Result<Option<DeletedEntity>, sqlx::Error> {
        let row: Option<(String, String)> = sqlx::query_as(
            r#"
            DELETE FROM hackathon_posts h USING users u
            WHERE h.id = $1 AND u.id = h.owner_id
            RETURNING h.title, u.username
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(name, owner_username)| DeletedEntity {
            name,
            owner_username,
        }))
    }

    async fn delete_paper_admin(&self, id: Uuid) -> Result<Option<DeletedEntity>, sqlx::Error> {
        let row: Option<(String, String)> = sqlx::query_as(
            r#"
            DELETE FROM research_papers p USING users u
            WHERE p.id = $1 AND u.id = p.owner_id
            RETURNING p.title, u.username
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(name, owner_username)| DeletedEntity {
            name,
            owner_username,
        }))
    }

    async fn get_all_users(&self) -> Result<Vec<AdminUserView>, sqlx::Error> {
        sqlx::query_as::<_, AdminUserView>(
            r#"
            SELECT u.id, u.username, u.email, u.full_name, u.is_active, u.is_admin,
                   u.created_at,
                   (SELECT COUNT(*) FROM projects p WHERE p.owner_id = u.id) AS project_count,
                   (SELECT COUNT(*) FROM hackathon_posts h WHERE h.owner_id = u.id)
                       AS hackathon_count
            FROM users u
            ORDER BY u.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn toggle_user_active(&self, id: Uuid) -> Result<Option<ToggledUser>, sqlx::Error> {
        let row: Option<(String, bool)> = sqlx::query_as(
            "UPDATE users SET is_active = NOT is_active WHERE id = $1
             RETURNING username, is_active",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(username, is_active)| ToggledUser {
            username,
            is_active,
        }))
    }

    /// get_stats
    ///
    /// Compiles all dashboard counters inside one read transaction so the
    /// numbers form a consistent snapshot.
    async fn get_stats(&self) -> Result<PlatformStats, sqlx::Error> {
        async fn count(
            sql: &str,
            tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        ) -> Result<i64, sqlx::Error> {
            sqlx::query_scalar::<_, i64>(sql).fetch_one(&mut **tx).await
        }

        let mut tx = self.pool.begin().await?;

        let total_users = count("SELECT COUNT(*) FROM users", &mut tx).await?;
        let active_users =
            count("SELECT COUNT(*) FROM users WHERE is_active = true", &mut tx).await?;
        let total_projects = count("SELECT COUNT(*) FROM projects", &mut tx).await?;
        let active_projects = count(
            "SELECT COUNT(*) FROM projects WHERE is_active = true",
            &mut tx,
        )
        .await?;
        let total_hackathons = count("SELECT COUNT(*) FROM hackathon_posts", &mut tx).await?;
        let active_hackathons = count(
            "SELECT COUNT(*) FROM hackathon_posts WHERE is_active = true",
            &mut tx,
        )
        .await?;
        let total_papers = count("SELECT COUNT(*) FROM research_papers", &mut tx).await?;
        let active_papers = count(
            "SELECT COUNT(*) FROM research_papers WHERE is_active = true",
            &mut tx,
        )
        .await?;
        let total_reports = count("SELECT COUNT(*) FROM reports", &mut tx).await?;
        let pending_reports = count(
            "SELECT COUNT(*) FROM reports WHERE status = 'pending'",
            &mut tx,
        )
        .await?;
        let project_reports = count(
            "SELECT COUNT(*) FROM reports WHERE report_type = 'project'",
            &mut tx,
        )
        .await?;
        let hackathon_reports = count(
            "SELECT COUNT(*) FROM reports WHERE report_type = 'hackathon'",
            &mut tx,
        )
        .await?;
        let paper_reports = count(
            "SELECT COUNT(*) FROM reports WHERE report_type = 'research_paper'",
            &mut tx,
        )
        .await?;

        tx.commit().await?;

        Ok(PlatformStats {
            users: UserCounts {
                total: total_users,
                active: active_users,
            },
            projects: ContentCounts {
                total: total_projects,
                active: active_projects,
                reports: project_reports,
            },
            hackathons: ContentCounts {
                total: total_hackathons,
                active: active_hackathons,
                reports: hackathon_reports,
            },
            research_papers: ContentCounts {
                total: total_papers,
                active: active_papers,
                reports: paper_reports,
            },
            reports: ReportCounts {
                total: total_reports,
                pending: pending_reports,
            },
        })
    }

    /// get_all_reports
    ///
    /// Every report newest-first, each resolved against its target table. The
    /// per-report target lookup is an explicit dispatch (see
    /// `resolve_report_target`); a hard-deleted target yields an empty block.
    async fn get_all_reports(&self) -> Result<Vec<ReportView>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT r.id, r.report_type, r.target_id, r.reason, r.status, r.created_at,
                   u.id AS reporter_id, u.username AS reporter_username
            FROM reports r
            JOIN users u ON u.id = r.reporter_id
            ORDER BY r.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut views = Vec::with_capacity(rows.len());
        for r in rows {
            let target_info = self.resolve_report_target(&r.report_type, r.target_id).await?;
            views.push(ReportView {
                id: r.id,
                report_type: r.report_type,
                target_id: r.target_id,
                target_info,
                reason: r.reason,
                status: r.status,
                reporter: ReporterSummary {
                    id: r.reporter_id,
                    username: r.reporter_username,
                },
                created_at: r.created_at,
            });
        }

        Ok(views)
    }

    async fn get_report(&self, id: Uuid) -> Result<Option<Report>, sqlx::Error> {
        sqlx::query_as::<_, Report>(
            "SELECT id, reporter_id, report_type, target_id, reason, status, created_at
             FROM reports WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn set_report_status(
        &self,
        id: Uuid,
        status: ReportStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE reports SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// get_papers
    ///
    /// Active-paper listing with optional exact status/category filters, built
    /// with QueryBuilder for safe parameterization.
    async fn get_papers(
        &self,
        status: Option<String>,
        category: Option<String>,
    ) -> Result<Vec<PaperView>, sqlx::Error> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(PAPER_SELECT);

        if let Some(s) = status {
            builder.push(" AND p.status = ");
            builder.push_bind(s);
        }

        if let Some(c) = category {
            builder.push(" AND p.category = ");
            builder.push_bind(c);
        }

        builder.push(" ORDER BY p.created_at DESC");

        let rows = builder
            .build_query_as::<PaperRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| r.into_view(false)).collect())
    }

    async fn get_paper(&self, id: Uuid) -> Result<Option<PaperView>, sqlx::Error> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(PAPER_SELECT);
        builder.push(" AND p.id = ");
        builder.push_bind(id);

        let row = builder
            .build_query_as::<PaperRow>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.into_view(true)))
    }

    async fn get_active_paper(&self, id: Uuid) -> Result<Option<ResearchPaper>, sqlx::Error> {
        sqlx::query_as::<_, ResearchPaper>(
            "SELECT * FROM research_papers WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_paper_any(&self, id: Uuid) -> Result<Option<ResearchPaper>, sqlx::Error> {
        sqlx::query_as::<_, ResearchPaper>("SELECT * FROM research_papers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// create_paper
    ///
    /// Inserts a new paper in the 'abstract' lifecycle state. Required fields
    /// were validated (and trimmed) by the handler.
    async fn create_paper(
        &self,
        req: CreatePaperRequest,
        owner_id: Uuid,
    ) -> Result<Uuid, sqlx::Error> {
        let new_id = Uuid::new_v4();
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO research_papers
                (id, title, abstract, authors, category, keywords, status,
                 is_active, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'abstract', true, $7, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(new_id)
        .bind(req.title)
        .bind(req.abstract_text)
        .bind(req.authors)
        .bind(req.category.unwrap_or_default())
        .bind(req.keywords.unwrap_or_default())
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
    }

    /// update_paper
    ///
    /// Uses COALESCE so only supplied fields are mutated; updated_at is
    /// refreshed unconditionally.
    async fn update_paper(&self, id: Uuid, changes: PaperChanges) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE research_papers
            SET title = COALESCE($2, title),
                abstract = COALESCE($3, abstract),
                authors = COALESCE($4, authors),
                category = COALESCE($5, category),
                keywords = COALESCE($6, keywords),
                status = COALESCE($7, status),
                paper_url = COALESCE($8, paper_url),
                doi = COALESCE($9, doi),
                publication_date = COALESCE($10, publication_date),
                updated_at = NOW()
            WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.abstract_text)
        .bind(changes.authors)
        .bind(changes.category)
        .bind(changes.keywords)
        .bind(changes.status)
        .bind(changes.paper_url)
        .bind(changes.doi)
        .bind(changes.publication_date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete_paper(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE research_papers SET is_active = false, updated_at = NOW()
             WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// publish_paper
    ///
    /// The forward lifecycle transition: records the paper URL (and optionally
    /// a DOI), stamps publication_date, and moves status to 'published'.
    async fn publish_paper(
        &self,
        id: Uuid,
        paper_url: String,
        doi: Option<String>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE research_papers
            SET status = 'published',
                paper_url = $2,
                doi = COALESCE($3, doi),
                publication_date = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(id)
        .bind(paper_url)
        .bind(doi)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_my_papers(&self, owner_id: Uuid) -> Result<Vec<MyPaperView>, sqlx::Error> {
        sqlx::query_as::<_, MyPaperView>(
            r#"
            SELECT id, title, abstract, authors, category, keywords, status,
                   paper_url, doi, publication_date, created_at, updated_at
            FROM research_papers
            WHERE owner_id = $1 AND is_active = true
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn has_report(
        &self,
        reporter_id: Uuid,
        report_type: ReportType,
        target_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reports
              WHERE reporter_id = $1 AND report_type = $2 AND target_id = $3)",
        )
        .bind(reporter_id)
        .bind(report_type.as_str())
        .bind(target_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn create_report(
        &self,
        reporter_id: Uuid,
        report_type: ReportType,
        target_id: Uuid,
        reason: String,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO reports (id, reporter_id, report_type, target_id, reason, status, created_at)
            VALUES ($1, $2, $3, $4, $5, 'pending', NOW())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(reporter_id)
        .bind(report_type.as_str())
        .bind(target_id)
        .bind(reason)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
