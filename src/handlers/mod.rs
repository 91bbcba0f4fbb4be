/// Handler Module Index
///
/// Handlers are grouped by surface, mirroring the route modules: the
/// role-gated moderation endpoints and the authenticated research-paper
/// endpoints.

/// Admin oversight: listings, hard deletes, user toggling, stats, reports.
pub mod admin;

/// Research papers: owner-scoped CRUD, publish transition, report filing.
pub mod research;
