//! Content + count query execution.

use super::page::{Page, PageRequest};
use crate::query::{QueryResult, SelectQuery};
use log::{debug, error};
use rusqlite::{Connection, Row};
use std::time::Instant;

/// Runs one page of `build_content`, counting with `build_count` only when
/// the page does not already reveal the total.
///
/// The count builder is a separate callback so it can skip joins and
/// ordering that only shape displayed rows. Both builders should apply the
/// same filters.
///
/// # Side effects
/// - Emits a `page_query` debug event with `count_query=executed|skipped`.
pub fn execute_page<T, C, K, M>(
    conn: &Connection,
    request: PageRequest,
    build_content: C,
    build_count: K,
    map_row: M,
) -> QueryResult<Page<T>>
where
    C: FnOnce() -> SelectQuery,
    K: FnOnce() -> SelectQuery,
    M: FnMut(&Row<'_>) -> QueryResult<T>,
{
    let started_at = Instant::now();
    let content_query = build_content()
        .offset(request.offset())
        .limit(request.limit());

    let content = content_query.fetch(conn, map_row).map_err(|err| {
        error!(
            "event=page_query module=paging status=error stage=content offset={} limit={} error={err}",
            request.offset(),
            request.limit()
        );
        err
    })?;

    let (total_count, count_state) = match total_from_page(request, content.len()) {
        Some(total) => (total, "skipped"),
        None => {
            let total = build_count().fetch_count(conn).map_err(|err| {
                error!(
                    "event=page_query module=paging status=error stage=count offset={} limit={} error={err}",
                    request.offset(),
                    request.limit()
                );
                err
            })?;
            (total, "executed")
        }
    };

    debug!(
        "event=page_query module=paging status=ok offset={} limit={} rows={} total={} count_query={} duration_ms={}",
        request.offset(),
        request.limit(),
        content.len(),
        total_count,
        count_state,
        started_at.elapsed().as_millis()
    );

    Ok(Page::new(content, total_count, request))
}

/// Like [`execute_page`], deriving the count query from the content query.
pub fn apply_pagination<T, C, M>(
    conn: &Connection,
    request: PageRequest,
    build_content: C,
    map_row: M,
) -> QueryResult<Page<T>>
where
    C: FnOnce() -> SelectQuery,
    M: FnMut(&Row<'_>) -> QueryResult<T>,
{
    let content_query = build_content();
    let count_query = content_query.to_count_query();
    execute_page(conn, request, || content_query, || count_query, map_row)
}

/// Total implied by a short page, or `None` when a count query is needed.
///
/// A short first page, or a short non-empty later page, is the last page.
/// An empty later page may lie past the end, so its offset says nothing.
fn total_from_page(request: PageRequest, content_len: usize) -> Option<u64> {
    let content_len = content_len as u64;
    if content_len >= request.limit() {
        return None;
    }
    if request.offset() == 0 || content_len > 0 {
        return Some(request.offset() + content_len);
    }
    None
}
