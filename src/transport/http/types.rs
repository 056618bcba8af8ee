use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::{IntoParams, ToSchema};

use crate::app::file_storage::FileStorage;
use crate::domain::model::Road;
use crate::infra::config;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub storage: Arc<FileStorage>,
}

/// Error body, `{"detail": "..."}`.
#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Paginated road listing.
#[derive(Serialize, Debug, ToSchema)]
pub struct RoadsListResponse {
    pub roads: Vec<Road>,
    pub total_count: i64,
    pub skip: i64,
    pub limit: i64,
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct Pagination {
    /// Rows to skip (default 0).
    #[serde(default)]
    pub skip: i64,
    /// Page size, clamped to 100 (default 100).
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    config::MAX_PAGE_SIZE
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct SearchParams {
    /// Partial road name; matching is case-insensitive.
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_apply_when_absent() {
        let page: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, 100);
    }

    #[test]
    fn search_query_is_optional() {
        let params: SearchParams = serde_json::from_str(r#"{"skip": 5}"#).unwrap();
        assert!(params.query.is_none());
        assert_eq!(params.skip, 5);
    }
}
