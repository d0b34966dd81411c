//! Page-request validation and pagination envelope primitives.
//!
//! Listing endpoints accept 1-indexed `page`/`perPage` inputs, translate them
//! into a row offset, and return the page of items together with a
//! [`PageInfo`] envelope carrying totals and next/previous availability.
//! Keeping the arithmetic here gives the HTTP adapters a single, tested
//! source of truth for offsets and ceiling division.

use serde::{Deserialize, Serialize};

/// Default page number when the caller omits `page`.
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size when the caller omits `perPage`.
pub const DEFAULT_PER_PAGE: u32 = 10;
/// Upper bound for `perPage`; larger requests are rejected, not clamped.
pub const MAX_PER_PAGE: u32 = 100;

/// Validation failures raised when constructing a [`PageRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// `page` was zero; pages are 1-indexed.
    #[error("page must be a positive integer")]
    PageOutOfRange,
    /// `perPage` fell outside the allowed bounds.
    #[error("perPage must be between 1 and {max}")]
    PerPageOutOfRange {
        /// Largest accepted page size.
        max: u32,
    },
}

/// Validated pagination input: a 1-indexed page number and a bounded page
/// size.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= per_page <= MAX_PER_PAGE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Validate and construct a request from explicit values.
    pub const fn new(page: u32, per_page: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange);
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(PageRequestError::PerPageOutOfRange { max: MAX_PER_PAGE });
        }
        Ok(Self { page, per_page })
    }

    /// Construct a request from optional inputs, substituting defaults for
    /// omitted values. Supplied values are still validated.
    pub const fn from_optional(
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Self, PageRequestError> {
        let page = match page {
            Some(value) => value,
            None => DEFAULT_PAGE,
        };
        let per_page = match per_page {
            Some(value) => value,
            None => DEFAULT_PER_PAGE,
        };
        Self::new(page, per_page)
    }

    /// 1-indexed page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Row offset of the first item on this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 1-indexed page number that was served.
    pub page: u32,
    /// Page size that was served.
    pub per_page: u32,
    /// Total number of matching items across all pages.
    pub total: u64,
    /// Total number of pages (ceiling division; zero when no items match).
    pub total_pages: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

impl PageInfo {
    /// Derive the envelope for a request given the total match count.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(request.per_page));
        Self {
            page: request.page,
            per_page: request.per_page,
            total,
            total_pages,
            has_next: u64::from(request.page) < total_pages,
            has_prev: request.page > 1,
        }
    }
}

/// One page of items plus its envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page, already ordered by the query.
    pub items: Vec<T>,
    /// Pagination metadata for the whole result set.
    pub info: PageInfo,
}

impl<T> Page<T> {
    /// Assemble a page from loaded items and the total match count.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            info: PageInfo::new(request, total),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 5, 5)]
    #[case(3, 10, 20)]
    #[case(7, 25, 150)]
    fn offset_is_zero_indexed(#[case] page: u32, #[case] per_page: u32, #[case] expected: u64) {
        let request = PageRequest::new(page, per_page).expect("valid request");
        assert_eq!(request.offset(), expected);
    }

    #[rstest]
    fn zero_page_is_rejected() {
        assert_eq!(
            PageRequest::new(0, 10),
            Err(PageRequestError::PageOutOfRange)
        );
    }

    #[rstest]
    #[case(0)]
    #[case(101)]
    fn per_page_bounds_are_enforced(#[case] per_page: u32) {
        assert_eq!(
            PageRequest::new(1, per_page),
            Err(PageRequestError::PerPageOutOfRange { max: MAX_PER_PAGE })
        );
    }

    #[rstest]
    fn omitted_values_take_defaults() {
        let request = PageRequest::from_optional(None, None).expect("defaults are valid");
        assert_eq!(request.page(), DEFAULT_PAGE);
        assert_eq!(request.per_page(), DEFAULT_PER_PAGE);
    }

    #[rstest]
    #[case(25, 10, 3)]
    #[case(30, 10, 3)]
    #[case(31, 10, 4)]
    #[case(0, 10, 0)]
    fn total_pages_uses_ceiling_division(
        #[case] total: u64,
        #[case] per_page: u32,
        #[case] expected: u64,
    ) {
        let request = PageRequest::new(1, per_page).expect("valid request");
        assert_eq!(PageInfo::new(request, total).total_pages, expected);
    }

    #[rstest]
    fn middle_page_has_both_neighbours() {
        let request = PageRequest::new(2, 10).expect("valid request");
        let info = PageInfo::new(request, 35);
        assert!(info.has_next);
        assert!(info.has_prev);
    }

    #[rstest]
    fn final_page_has_no_next() {
        let request = PageRequest::new(4, 10).expect("valid request");
        let info = PageInfo::new(request, 35);
        assert!(!info.has_next);
        assert!(info.has_prev);
    }

    #[rstest]
    fn empty_result_set_has_no_pages() {
        let info = PageInfo::new(PageRequest::default(), 0);
        assert_eq!(info.total_pages, 0);
        assert!(!info.has_next);
        assert!(!info.has_prev);
    }

    #[rstest]
    fn envelope_serialises_camel_case() {
        let page = Page::new(vec![1, 2, 3], PageRequest::default(), 3);
        let value = serde_json::to_value(&page).expect("serialisable page");
        let info = value.get("info").expect("info present");
        assert_eq!(info.get("perPage").and_then(serde_json::Value::as_u64), Some(10));
        assert_eq!(info.get("totalPages").and_then(serde_json::Value::as_u64), Some(1));
        assert!(info.get("per_page").is_none());
    }
}
