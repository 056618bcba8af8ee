//! Shared handler plumbing: one place where service errors become HTTP.

use axum::http::StatusCode;
use axum::Json;

use crate::app::error::ServiceError;
use crate::app::file_storage::FileError;
use crate::transport::http::types::ErrorBody;

pub type Rejection = (StatusCode, Json<ErrorBody>);

pub fn reject(status: StatusCode, detail: impl Into<String>) -> Rejection {
    (
        status,
        Json(ErrorBody {
            detail: detail.into(),
        }),
    )
}

/// Geometry rejections are the client's fault; missing rows are 404;
/// anything the driver raised is a 500.
pub fn map_service_error(error: ServiceError) -> Rejection {
    match error {
        ServiceError::Geometry(e) => reject(StatusCode::BAD_REQUEST, e.to_string()),
        ServiceError::NotFound(_) => reject(StatusCode::NOT_FOUND, error.to_string()),
        ServiceError::Database(e) => {
            reject(StatusCode::INTERNAL_SERVER_ERROR, format!("database error: {e}"))
        }
    }
}

pub fn map_file_error(error: FileError) -> Rejection {
    match error {
        FileError::TooLarge { .. } => reject(StatusCode::PAYLOAD_TOO_LARGE, error.to_string()),
        FileError::DisallowedType { .. } => reject(StatusCode::BAD_REQUEST, error.to_string()),
        FileError::Io(e) => reject(StatusCode::INTERNAL_SERVER_ERROR, format!("storage error: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::{GeometryError, GeometryKind};

    #[test]
    fn geometry_errors_are_client_errors() {
        let (status, body) = map_service_error(ServiceError::Geometry(GeometryError::WrongKind {
            expected: GeometryKind::Line,
        }));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.detail, "Geometry must be a LINESTRING");
    }

    #[test]
    fn missing_rows_are_404() {
        let (status, body) = map_service_error(ServiceError::NotFound("Road"));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.detail, "Road not found");
    }

    #[test]
    fn oversize_uploads_are_413() {
        let (status, _) = map_file_error(FileError::TooLarge { size: 9, limit: 4 });
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
