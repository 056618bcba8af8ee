use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::app::crosswalk_service;
use crate::domain::model::{Crosswalk, CrosswalkCreate, CrosswalkUpdate};
use crate::transport::http::handlers::common::map_service_error;
use crate::transport::http::types::{AppState, ErrorBody, MessageResponse, Pagination};

#[utoipa::path(
    get,
    path = "/api/v1/crosswalks",
    params(Pagination),
    responses(
        (status = 200, description = "Crosswalks ordered by id", body = [Crosswalk])
    )
)]
pub async fn list_crosswalks_handler(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> impl IntoResponse {
    match crosswalk_service::list(&state.pool, page.skip, page.limit).await {
        Ok(crosswalks) => Json(crosswalks).into_response(),
        Err(e) => map_service_error(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/crosswalks/{crosswalk_id}",
    params(("crosswalk_id" = i32, Path, description = "Crosswalk id")),
    responses(
        (status = 200, description = "Crosswalk found", body = Crosswalk),
        (status = 404, description = "Crosswalk not found", body = ErrorBody)
    )
)]
pub async fn get_crosswalk_handler(
    State(state): State<AppState>,
    Path(crosswalk_id): Path<i32>,
) -> impl IntoResponse {
    match crosswalk_service::get(&state.pool, crosswalk_id).await {
        Ok(crosswalk) => Json(crosswalk).into_response(),
        Err(e) => map_service_error(e).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/crosswalks",
    request_body = CrosswalkCreate,
    responses(
        (status = 200, description = "Crosswalk created", body = Crosswalk),
        (status = 400, description = "Geometry rejected", body = ErrorBody)
    )
)]
pub async fn create_crosswalk_handler(
    State(state): State<AppState>,
    Json(crosswalk_in): Json<CrosswalkCreate>,
) -> impl IntoResponse {
    match crosswalk_service::create(&state.pool, crosswalk_in).await {
        Ok(crosswalk) => Json(crosswalk).into_response(),
        Err(e) => map_service_error(e).into_response(),
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/crosswalks/{crosswalk_id}",
    params(("crosswalk_id" = i32, Path, description = "Crosswalk id")),
    request_body = CrosswalkUpdate,
    responses(
        (status = 200, description = "Crosswalk updated; absent fields untouched", body = Crosswalk),
        (status = 400, description = "Geometry rejected", body = ErrorBody),
        (status = 404, description = "Crosswalk not found", body = ErrorBody)
    )
)]
pub async fn update_crosswalk_handler(
    State(state): State<AppState>,
    Path(crosswalk_id): Path<i32>,
    Json(update): Json<CrosswalkUpdate>,
) -> impl IntoResponse {
    match crosswalk_service::update(&state.pool, crosswalk_id, update).await {
        Ok(crosswalk) => Json(crosswalk).into_response(),
        Err(e) => map_service_error(e).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/crosswalks/{crosswalk_id}",
    params(("crosswalk_id" = i32, Path, description = "Crosswalk id")),
    responses(
        (status = 200, description = "Crosswalk deleted", body = MessageResponse),
        (status = 404, description = "Crosswalk not found", body = ErrorBody)
    )
)]
pub async fn delete_crosswalk_handler(
    State(state): State<AppState>,
    Path(crosswalk_id): Path<i32>,
) -> impl IntoResponse {
    match crosswalk_service::delete(&state.pool, crosswalk_id).await {
        Ok(()) => Json(MessageResponse {
            message: "Crosswalk deleted successfully".to_string(),
        })
        .into_response(),
        Err(e) => map_service_error(e).into_response(),
    }
}
