use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;

use crate::app::road_service;
use crate::domain::mime;
use crate::domain::model::{Document, DocumentCreate};
use crate::transport::http::handlers::common::{map_file_error, map_service_error, reject};
use crate::transport::http::types::{AppState, ErrorBody, MessageResponse};

#[utoipa::path(
    post,
    path = "/roads/{road_id}/add-document",
    params(("road_id" = i32, Path, description = "Road id")),
    request_body = DocumentCreate,
    responses(
        (status = 200, description = "Document reference registered", body = Document),
        (status = 404, description = "Road not found", body = ErrorBody)
    )
)]
pub async fn add_document_handler(
    State(state): State<AppState>,
    Path(road_id): Path<i32>,
    Json(document_in): Json<DocumentCreate>,
) -> impl IntoResponse {
    match road_service::create_document(&state.pool, road_id, document_in).await {
        Ok(document) => Json(document).into_response(),
        Err(e) => map_service_error(e).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/roads/{road_id}/upload-document",
    params(("road_id" = i32, Path, description = "Road id")),
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored and document registered", body = Document),
        (status = 400, description = "Missing file, malformed field, or disallowed type", body = ErrorBody),
        (status = 404, description = "Road not found", body = ErrorBody),
        (status = 413, description = "File too large", body = ErrorBody)
    )
)]
pub async fn upload_document_handler(
    State(state): State<AppState>,
    Path(road_id): Path<i32>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut filename: Option<String> = None;
    let mut contents: Option<Vec<u8>> = None;
    let mut description: Option<String> = None;
    let mut creation_date: Option<NaiveDate> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return reject(StatusCode::BAD_REQUEST, format!("Invalid multipart body: {e}"))
                    .into_response()
            }
        };
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                filename = field.file_name().map(str::to_string);
                contents = match field.bytes().await {
                    Ok(bytes) => Some(bytes.to_vec()),
                    Err(e) => {
                        return reject(
                            StatusCode::BAD_REQUEST,
                            format!("Could not read file field: {e}"),
                        )
                        .into_response()
                    }
                };
            }
            Some("description") => {
                description = match field.text().await {
                    Ok(text) => Some(text),
                    Err(e) => {
                        return reject(
                            StatusCode::BAD_REQUEST,
                            format!("Could not read description field: {e}"),
                        )
                        .into_response()
                    }
                };
            }
            Some("creation_date") => {
                let text = match field.text().await {
                    Ok(text) => text,
                    Err(e) => {
                        return reject(
                            StatusCode::BAD_REQUEST,
                            format!("Could not read creation_date field: {e}"),
                        )
                        .into_response()
                    }
                };
                creation_date = match text.parse::<NaiveDate>() {
                    Ok(date) => Some(date),
                    Err(_) => {
                        return reject(
                            StatusCode::BAD_REQUEST,
                            format!("Invalid creation_date: {text}"),
                        )
                        .into_response()
                    }
                };
            }
            _ => {}
        }
    }

    let (Some(filename), Some(contents)) = (filename, contents) else {
        return reject(StatusCode::BAD_REQUEST, "Multipart field 'file' is required")
            .into_response();
    };

    // Road existence first so uploads for missing roads never hit the disk.
    if let Err(e) = road_service::get(&state.pool, road_id).await {
        return map_service_error(e).into_response();
    }

    let stored = match state.storage.save(road_id, &filename, &contents).await {
        Ok(stored) => stored,
        Err(e) => return map_file_error(e).into_response(),
    };

    let document_in = DocumentCreate {
        filename: stored.filename.clone(),
        file_url: stored.filepath.clone(),
        description,
        creation_date,
    };
    match road_service::create_document(&state.pool, road_id, document_in).await {
        Ok(document) => Json(document).into_response(),
        Err(e) => {
            // The row failed after the file landed; do not leave an orphan.
            state.storage.remove(&stored.filepath).await;
            map_service_error(e).into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/roads/{road_id}/documents",
    params(("road_id" = i32, Path, description = "Road id")),
    responses(
        (status = 200, description = "Documents attached to the road", body = [Document])
    )
)]
pub async fn list_documents_handler(
    State(state): State<AppState>,
    Path(road_id): Path<i32>,
) -> impl IntoResponse {
    match road_service::documents_for_road(&state.pool, road_id).await {
        Ok(documents) => Json(documents).into_response(),
        Err(e) => map_service_error(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/documents/{document_id}/download",
    params(("document_id" = i32, Path, description = "Document id")),
    responses(
        (status = 200, description = "File contents"),
        (status = 404, description = "Document or stored file not found", body = ErrorBody)
    )
)]
pub async fn download_document_handler(
    State(state): State<AppState>,
    Path(document_id): Path<i32>,
) -> impl IntoResponse {
    let document = match road_service::get_document(&state.pool, document_id).await {
        Ok(document) => document,
        Err(e) => return map_service_error(e).into_response(),
    };

    if !state.storage.contains(&document.file_url) {
        return reject(
            StatusCode::NOT_FOUND,
            "Document has no locally stored file",
        )
        .into_response();
    }
    let contents = match tokio::fs::read(&document.file_url).await {
        Ok(contents) => contents,
        Err(_) => return reject(StatusCode::NOT_FOUND, "Stored file not found").into_response(),
    };

    let content_type = mime::resolve(&contents, &document.filename).mime;
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.filename),
            ),
        ],
        contents,
    )
        .into_response()
}

#[utoipa::path(
    delete,
    path = "/documents/{document_id}",
    params(("document_id" = i32, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document deleted", body = MessageResponse),
        (status = 404, description = "Document not found", body = ErrorBody)
    )
)]
pub async fn delete_document_handler(
    State(state): State<AppState>,
    Path(document_id): Path<i32>,
) -> impl IntoResponse {
    match road_service::delete_document(&state.pool, document_id).await {
        Ok(document) => {
            // Best effort: URL-referenced documents have nothing on disk.
            if state.storage.contains(&document.file_url) {
                state.storage.remove(&document.file_url).await;
            }
            Json(MessageResponse {
                message: "Document deleted successfully".to_string(),
            })
            .into_response()
        }
        Err(e) => map_service_error(e).into_response(),
    }
}
