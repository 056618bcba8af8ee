use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::app::road_service;
use crate::domain::model::{Road, RoadCreate, RoadUpdate, RoadWithDocuments};
use crate::transport::http::handlers::common::map_service_error;
use crate::transport::http::types::{
    AppState, ErrorBody, Pagination, RoadsListResponse, SearchParams,
};

#[utoipa::path(
    get,
    path = "/roads",
    params(Pagination),
    responses(
        (status = 200, description = "Paginated road listing", body = RoadsListResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_roads_handler(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> impl IntoResponse {
    let roads = match road_service::list(&state.pool, page.skip, page.limit).await {
        Ok(roads) => roads,
        Err(e) => return map_service_error(e).into_response(),
    };
    let total_count = match road_service::count(&state.pool).await {
        Ok(total) => total,
        Err(e) => return map_service_error(e).into_response(),
    };
    Json(RoadsListResponse {
        roads,
        total_count,
        skip: page.skip,
        limit: page.limit,
    })
    .into_response()
}

#[utoipa::path(
    get,
    path = "/roads/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Roads whose name contains the query", body = [Road])
    )
)]
pub async fn search_roads_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    match road_service::search(&state.pool, params.query.as_deref(), params.skip, params.limit)
        .await
    {
        Ok(roads) => Json(roads).into_response(),
        Err(e) => map_service_error(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/roads/all/basic",
    responses(
        (status = 200, description = "Every road, unpaginated (map rendering)", body = [Road])
    )
)]
pub async fn list_all_roads_handler(State(state): State<AppState>) -> impl IntoResponse {
    match road_service::list_all(&state.pool).await {
        Ok(roads) => Json(roads).into_response(),
        Err(e) => map_service_error(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/roads/{road_id}",
    params(("road_id" = i32, Path, description = "Road id")),
    responses(
        (status = 200, description = "Road found", body = Road),
        (status = 404, description = "Road not found", body = ErrorBody)
    )
)]
pub async fn get_road_handler(
    State(state): State<AppState>,
    Path(road_id): Path<i32>,
) -> impl IntoResponse {
    match road_service::get(&state.pool, road_id).await {
        Ok(road) => Json(road).into_response(),
        Err(e) => map_service_error(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/roads/{road_id}/with-documents",
    params(("road_id" = i32, Path, description = "Road id")),
    responses(
        (status = 200, description = "Road with its documents", body = RoadWithDocuments),
        (status = 404, description = "Road not found", body = ErrorBody)
    )
)]
pub async fn get_road_with_documents_handler(
    State(state): State<AppState>,
    Path(road_id): Path<i32>,
) -> impl IntoResponse {
    match road_service::get_with_documents(&state.pool, road_id).await {
        Ok(road) => Json(road).into_response(),
        Err(e) => map_service_error(e).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/roads",
    request_body = RoadCreate,
    responses(
        (status = 200, description = "Road created; geom echoes the submitted literal", body = Road),
        (status = 400, description = "Geometry rejected", body = ErrorBody)
    )
)]
pub async fn create_road_handler(
    State(state): State<AppState>,
    Json(road_in): Json<RoadCreate>,
) -> impl IntoResponse {
    match road_service::create(&state.pool, road_in).await {
        Ok(road) => Json(road).into_response(),
        Err(e) => map_service_error(e).into_response(),
    }
}

#[utoipa::path(
    patch,
    path = "/roads/{road_id}",
    params(("road_id" = i32, Path, description = "Road id")),
    request_body = RoadUpdate,
    responses(
        (status = 200, description = "Road updated; absent fields untouched", body = Road),
        (status = 400, description = "Geometry rejected", body = ErrorBody),
        (status = 404, description = "Road not found", body = ErrorBody)
    )
)]
pub async fn update_road_handler(
    State(state): State<AppState>,
    Path(road_id): Path<i32>,
    Json(update): Json<RoadUpdate>,
) -> impl IntoResponse {
    match road_service::update(&state.pool, road_id, update).await {
        Ok(road) => Json(road).into_response(),
        Err(e) => map_service_error(e).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/roads/{road_id}",
    params(("road_id" = i32, Path, description = "Road id")),
    responses(
        (status = 200, description = "Road deleted along with its documents", body = Road),
        (status = 404, description = "Road not found", body = ErrorBody)
    )
)]
pub async fn delete_road_handler(
    State(state): State<AppState>,
    Path(road_id): Path<i32>,
) -> impl IntoResponse {
    match road_service::delete(&state.pool, road_id).await {
        Ok(road) => Json(road).into_response(),
        Err(e) => map_service_error(e).into_response(),
    }
}
