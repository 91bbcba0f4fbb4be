/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules.
/// Access control is applied explicitly at the module level (via Axum route
/// layers), preventing accidental exposure of protected endpoints.

/// Routes protected by the `AuthUser` extractor middleware (any signed-in user).
pub mod research;

/// Routes restricted exclusively to users with the admin flag, enforced by the
/// `AdminUser` extractor middleware wrapped around the whole nest.
pub mod admin;
