//! # TaskDesk API Server Library
//!
//! HTTP layer of TaskDesk: configuration, routing, the JWT layer and the
//! mapping of domain errors to responses. Business rules live in
//! `taskdesk-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: JWT authentication and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
