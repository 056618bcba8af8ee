use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use utoipa::OpenApi;

use crate::domain::model::{
    Crosswalk, CrosswalkCreate, CrosswalkUpdate, Document, DocumentCreate, Road, RoadCreate,
    RoadUpdate, RoadWithDocuments,
};
use crate::infra::config;
use crate::transport::http::handlers::{crosswalks, documents, health, roads};
use crate::transport::http::types::{ErrorBody, MessageResponse, RoadsListResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::root_handler,
        health::healthcheck_handler,
        roads::list_roads_handler,
        roads::search_roads_handler,
        roads::list_all_roads_handler,
        roads::get_road_handler,
        roads::get_road_with_documents_handler,
        roads::create_road_handler,
        roads::update_road_handler,
        roads::delete_road_handler,
        documents::add_document_handler,
        documents::upload_document_handler,
        documents::list_documents_handler,
        documents::download_document_handler,
        documents::delete_document_handler,
        crosswalks::list_crosswalks_handler,
        crosswalks::get_crosswalk_handler,
        crosswalks::create_crosswalk_handler,
        crosswalks::update_crosswalk_handler,
        crosswalks::delete_crosswalk_handler
    ),
    components(schemas(
        Road,
        RoadCreate,
        RoadUpdate,
        RoadWithDocuments,
        RoadsListResponse,
        Document,
        DocumentCreate,
        Crosswalk,
        CrosswalkCreate,
        CrosswalkUpdate,
        ErrorBody,
        MessageResponse
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/roads",
            get(roads::list_roads_handler).post(roads::create_road_handler),
        )
        .route("/roads/search", get(roads::search_roads_handler))
        .route("/roads/all/basic", get(roads::list_all_roads_handler))
        .route(
            "/roads/:road_id",
            get(roads::get_road_handler)
                .patch(roads::update_road_handler)
                .delete(roads::delete_road_handler),
        )
        .route("/roads/:road_id/basic", get(roads::get_road_handler))
        .route(
            "/roads/:road_id/with-documents",
            get(roads::get_road_with_documents_handler),
        )
        .route(
            "/roads/:road_id/add-document",
            post(documents::add_document_handler),
        )
        .route(
            "/roads/:road_id/upload-document",
            post(documents::upload_document_handler),
        )
        .route(
            "/roads/:road_id/documents",
            get(documents::list_documents_handler),
        )
        .route(
            "/documents/:document_id",
            delete(documents::delete_document_handler),
        )
        .route(
            "/documents/:document_id/download",
            get(documents::download_document_handler),
        )
        .route(
            "/api/v1/crosswalks",
            get(crosswalks::list_crosswalks_handler).post(crosswalks::create_crosswalk_handler),
        )
        .route(
            "/api/v1/crosswalks/:crosswalk_id",
            get(crosswalks::get_crosswalk_handler)
                .patch(crosswalks::update_crosswalk_handler)
                .delete(crosswalks::delete_crosswalk_handler),
        )
        // Multipart uploads must fit the configured cap plus form overhead.
        .layer(DefaultBodyLimit::max(config::max_file_size() + 64 * 1024))
        .with_state(app_state)
}
