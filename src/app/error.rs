//! Service-layer error taxonomy.
//!
//! Geometry rejections are client errors detected before any mutation is
//! attempted; missing rows are their own kind; everything the driver raises
//! is a server error. The HTTP status mapping lives in one place
//! (`transport::http::handlers::common`).

use crate::domain::geometry::GeometryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
