/// Middleware for the API server
///
/// - `auth`: Bearer token check for the protected `/api` routes
/// - `security`: Security response headers

pub mod auth;
pub mod security;
