//! PostgreSQL repository implementations.

mod group;
mod permission;
mod resource;
mod session;
mod user;

pub use group::PgGroupRepository;
pub use permission::PgAclRepository;
pub use resource::PgResourceRepository;
pub use session::PgSessionRepository;
pub use user::PgUserRepository;

use docspace_core::error::{AppError, ErrorKind};

/// Map a `sqlx` failure to an [`AppError`].
///
/// Unique violations become `Conflict` with `conflict_message`; everything
/// else is `Internal` with `context`.
pub(crate) fn map_db_error(
    context: &'static str,
    conflict_message: &'static str,
) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let unique = matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation());
        if unique {
            AppError::with_source(ErrorKind::Conflict, conflict_message, e)
        } else {
            AppError::with_source(ErrorKind::Internal, context, e)
        }
    }
}

/// Map a `sqlx` failure that cannot be a constraint violation.
pub(crate) fn internal(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Internal, context, e)
}
