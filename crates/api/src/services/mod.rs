//! API-level services.

pub mod auth;
