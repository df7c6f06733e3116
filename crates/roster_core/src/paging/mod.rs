//! Offset/limit pagination with a conditional count query.
//!
//! # Responsibility
//! - Validate page requests before any SQL runs.
//! - Run a content query, then run the count query only when the total
//!   cannot be derived from the page itself.
//!
//! # Invariants
//! - `limit > 0` and `offset >= 0` for every constructed [`PageRequest`].
//! - A returned [`Page`] is never mutated.
//! - Query failures propagate unchanged; nothing is retried.

mod executor;
mod page;

pub use executor::{apply_pagination, execute_page};
pub use page::{Page, PageRequest};
