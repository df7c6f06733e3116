//! Use-case services over repositories.
//!
//! # Responsibility
//! - Apply request-level defaults (page limits) before repository calls.
//! - Keep callers decoupled from SQLite details.

pub mod member_service;
