//! # TaskDesk Shared Library
//!
//! Domain model, persistence, authorization and business services used by
//! the TaskDesk API server.
//!
//! ## Module Organization
//!
//! - `models`: Data structures mapped from database rows
//! - `repositories`: Repository traits with PostgreSQL and in-memory backends
//! - `auth`: Passwords, JWTs, request authentication and authorization rules
//! - `services`: Business operations enforcing ownership and role rules
//! - `storage`: On-disk attachment storage
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod repositories;
pub mod services;
pub mod storage;

/// Current version of the TaskDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
