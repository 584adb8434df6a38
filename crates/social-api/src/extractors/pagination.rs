//! Pagination extractor
//!
//! Extracts offset-based pagination parameters from query strings.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use social_core::Page;

use crate::response::ApiError;

/// Default page size
const DEFAULT_COUNT: i64 = 50;

/// Raw pagination query parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub count: Option<i64>,
}

/// Validated pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination(pub Page);

impl Default for Pagination {
    fn default() -> Self {
        Self(Page::new(0, DEFAULT_COUNT))
    }
}

impl Pagination {
    #[inline]
    pub fn page(self) -> Page {
        self.0
    }
}

impl TryFrom<PaginationParams> for Pagination {
    type Error = ApiError;

    fn try_from(params: PaginationParams) -> Result<Self, Self::Error> {
        let offset = params.offset.unwrap_or(0);
        if offset < 0 {
            return Err(ApiError::invalid_query("'offset' must not be negative"));
        }

        let count = params.count.unwrap_or(DEFAULT_COUNT);
        if count < 1 {
            return Err(ApiError::invalid_query("'count' must be at least 1"));
        }

        // Oversized pages are clamped rather than rejected
        Ok(Pagination(Page::new(offset, count)))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Pagination::try_from(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pagination() {
        let page = Pagination::default().page();
        assert_eq!(page.offset, 0);
        assert_eq!(page.count, DEFAULT_COUNT);
    }

    #[test]
    fn test_count_clamping() {
        let params = PaginationParams {
            offset: Some(10),
            count: Some(1_000),
        };
        let page = Pagination::try_from(params).unwrap().page();
        assert_eq!(page.offset, 10);
        assert_eq!(page.count, Page::MAX_COUNT);
    }

    #[test]
    fn test_rejects_negative_values() {
        let params = PaginationParams {
            offset: Some(-1),
            count: None,
        };
        assert!(Pagination::try_from(params).is_err());

        let params = PaginationParams {
            offset: None,
            count: Some(0),
        };
        assert!(Pagination::try_from(params).is_err());
    }
}
