//! Page request and page result value types.

use crate::query::{QueryError, QueryResult};
use serde::Serialize;

/// Validated offset/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    offset: u64,
    limit: u64,
}

impl PageRequest {
    /// Validates caller-supplied offset and limit.
    ///
    /// # Errors
    /// - `QueryError::InvalidPageRequest` when `offset < 0` or `limit <= 0`.
    pub fn new(offset: i64, limit: i64) -> QueryResult<Self> {
        match (u64::try_from(offset), u64::try_from(limit)) {
            (Ok(valid_offset), Ok(valid_limit)) if valid_limit > 0 => Ok(Self {
                offset: valid_offset,
                limit: valid_limit,
            }),
            _ => Err(QueryError::InvalidPageRequest { offset, limit }),
        }
    }

    /// Zero-based page number of fixed size, e.g. `of_page(1, 2)` is offset 2.
    ///
    /// # Errors
    /// - `QueryError::InvalidPageRequest` when the size is zero or the offset
    ///   or size does not fit in `i64`.
    pub fn of_page(page_number: u64, page_size: u64) -> QueryResult<Self> {
        let offset = page_number
            .checked_mul(page_size)
            .and_then(|value| i64::try_from(value).ok());
        match (offset, i64::try_from(page_size)) {
            (Some(offset), Ok(limit)) => Self::new(offset, limit),
            (offset, limit) => Err(QueryError::InvalidPageRequest {
                offset: offset.unwrap_or(i64::MAX),
                limit: limit.unwrap_or(i64::MAX),
            }),
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

/// One page of rows plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    content: Vec<T>,
    total_count: u64,
    offset: u64,
    limit: u64,
}

impl<T> Page<T> {
    pub(crate) fn new(content: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        Self {
            content,
            total_count,
            offset: request.offset,
            limit: request.limit,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Zero-based page index this page was requested at.
    pub fn page_number(&self) -> u64 {
        self.offset / self.limit
    }

    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(self.limit)
    }

    pub fn has_next(&self) -> bool {
        self.offset + (self.content.len() as u64) < self.total_count
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    /// Converts each row while keeping paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_count: self.total_count,
            offset: self.offset,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, PageRequest};
    use crate::query::QueryError;

    #[test]
    fn page_request_rejects_negative_offset_and_non_positive_limit() {
        for (offset, limit) in [(-1, 10), (0, 0), (5, -3)] {
            let err = PageRequest::new(offset, limit).unwrap_err();
            assert!(matches!(
                err,
                QueryError::InvalidPageRequest { offset: o, limit: l } if o == offset && l == limit
            ));
        }
        let request = PageRequest::new(0, 1).unwrap();
        assert_eq!((request.offset(), request.limit()), (0, 1));
    }

    #[test]
    fn of_page_multiplies_page_number_by_size() {
        let request = PageRequest::of_page(3, 20).unwrap();
        assert_eq!(request.offset(), 60);
        assert_eq!(request.limit(), 20);
        assert!(PageRequest::of_page(1, 0).is_err());
    }

    #[test]
    fn of_page_rejects_offsets_beyond_i64() {
        for (page_number, page_size) in [(u64::MAX / 2, 2), (u64::MAX, 2), (0, u64::MAX)] {
            assert!(matches!(
                PageRequest::of_page(page_number, page_size),
                Err(QueryError::InvalidPageRequest { .. })
            ));
        }
        let edge = PageRequest::of_page(i64::MAX as u64, 1).unwrap();
        assert_eq!(edge.offset(), i64::MAX as u64);
    }

    #[test]
    fn page_navigation_helpers() {
        let request = PageRequest::new(2, 2).unwrap();
        let page = Page::new(vec!["c", "d"], 5, request);
        assert_eq!(page.page_number(), 1);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());

        let last = Page::new(vec!["e"], 5, PageRequest::new(4, 2).unwrap());
        assert!(last.is_last());

        let mapped = last.map(str::len);
        assert_eq!(mapped.content(), &[1]);
        assert_eq!(mapped.total_count(), 5);
        assert_eq!(mapped.into_content(), vec![1]);
    }
}
