/// Database layer for TaskDesk
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Embedded schema migrations and database bootstrap
///
/// Row-level queries live in [`crate::repositories`].

pub mod migrations;
pub mod pool;
