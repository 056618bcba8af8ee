//! Road and document persistence.
//!
//! Roads are read back as `geom::bytea`, i.e. the PostGIS EWKB envelope, and
//! normalized through the geometry codec before leaving this module. Create
//! and update return the WKT literal that was just validated, so submitted
//! text round-trips byte-exact.

use sqlx::postgres::{PgRow, Postgres};
use sqlx::{PgPool, QueryBuilder, Row};

use crate::app::db::clamp_page;
use crate::app::error::{ServiceError, ServiceResult};
use crate::domain::geometry::{self, GeometryKind, RawGeometry};
use crate::domain::model::{Document, DocumentCreate, Road, RoadCreate, RoadUpdate, RoadWithDocuments};

const ROAD_COLUMNS: &str = "id, name, geom::bytea AS geom";

fn road_from_row(row: &PgRow) -> Result<Road, sqlx::Error> {
    let raw = row
        .try_get::<Option<Vec<u8>>, _>("geom")?
        .map(RawGeometry::Ewkb);
    Ok(Road {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        geom: geometry::to_text(raw),
    })
}

pub async fn count(pool: &PgPool) -> ServiceResult<i64> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(id) FROM roads")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

pub async fn list(pool: &PgPool, skip: i64, limit: i64) -> ServiceResult<Vec<Road>> {
    let (skip, limit) = clamp_page(skip, limit);
    let rows = sqlx::query(&format!(
        "SELECT {ROAD_COLUMNS} FROM roads ORDER BY id OFFSET $1 LIMIT $2"
    ))
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    rows.iter().map(road_from_row).collect::<Result<_, _>>().map_err(Into::into)
}

/// Unpaginated listing for map rendering.
pub async fn list_all(pool: &PgPool) -> ServiceResult<Vec<Road>> {
    let rows = sqlx::query(&format!("SELECT {ROAD_COLUMNS} FROM roads ORDER BY id"))
        .fetch_all(pool)
        .await?;
    rows.iter().map(road_from_row).collect::<Result<_, _>>().map_err(Into::into)
}

pub async fn get(pool: &PgPool, road_id: i32) -> ServiceResult<Road> {
    let row = sqlx::query(&format!("SELECT {ROAD_COLUMNS} FROM roads WHERE id = $1"))
        .bind(road_id)
        .fetch_optional(pool)
        .await?
        .ok_or(ServiceError::NotFound("Road"))?;
    Ok(road_from_row(&row)?)
}

pub async fn get_with_documents(pool: &PgPool, road_id: i32) -> ServiceResult<RoadWithDocuments> {
    let road = get(pool, road_id).await?;
    let documents = documents_for_road(pool, road_id).await?;
    Ok(RoadWithDocuments::new(road, documents))
}

pub async fn create(pool: &PgPool, road_in: RoadCreate) -> ServiceResult<Road> {
    geometry::validate(&road_in.geom, GeometryKind::Line)?;

    let id: i32 = sqlx::query_scalar(
        "INSERT INTO roads (name, geom) VALUES ($1, ST_GeomFromText($2, 4326)) RETURNING id",
    )
    .bind(&road_in.name)
    .bind(&road_in.geom)
    .fetch_one(pool)
    .await?;

    Ok(Road {
        id,
        name: road_in.name,
        geom: road_in.geom,
    })
}

fn build_road_update<'a>(road_id: i32, update: &'a RoadUpdate) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE roads SET ");
    let mut fields = builder.separated(", ");
    if let Some(name) = &update.name {
        fields.push("name = ");
        fields.push_bind_unseparated(name);
    }
    if let Some(geom) = &update.geom {
        fields.push("geom = ST_GeomFromText(");
        fields.push_bind_unseparated(geom);
        fields.push_unseparated(", 4326)");
    }
    builder.push(" WHERE id = ");
    builder.push_bind(road_id);
    builder.push(&format!(" RETURNING {ROAD_COLUMNS}"));
    builder
}

pub async fn update(pool: &PgPool, road_id: i32, update: RoadUpdate) -> ServiceResult<Road> {
    if update.is_empty() {
        return get(pool, road_id).await;
    }
    if let Some(geom) = &update.geom {
        geometry::validate(geom, GeometryKind::Line)?;
    }

    let mut builder = build_road_update(road_id, &update);
    let row = builder
        .build()
        .fetch_optional(pool)
        .await?
        .ok_or(ServiceError::NotFound("Road"))?;
    let mut road = road_from_row(&row)?;
    if let Some(geom) = update.geom {
        road.geom = geom;
    }
    Ok(road)
}

/// Deletes a road; its documents go with it via the cascade FK.
pub async fn delete(pool: &PgPool, road_id: i32) -> ServiceResult<Road> {
    let row = sqlx::query(&format!(
        "DELETE FROM roads WHERE id = $1 RETURNING {ROAD_COLUMNS}"
    ))
    .bind(road_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ServiceError::NotFound("Road"))?;
    Ok(road_from_row(&row)?)
}

pub async fn search(
    pool: &PgPool,
    query: Option<&str>,
    skip: i64,
    limit: i64,
) -> ServiceResult<Vec<Road>> {
    let Some(query) = query else {
        return list(pool, skip, limit).await;
    };
    let (skip, limit) = clamp_page(skip, limit);
    let rows = sqlx::query(&format!(
        "SELECT {ROAD_COLUMNS} FROM roads WHERE name ILIKE $1 ORDER BY id OFFSET $2 LIMIT $3"
    ))
    .bind(format!("%{query}%"))
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    rows.iter().map(road_from_row).collect::<Result<_, _>>().map_err(Into::into)
}

// --- documents ---

pub async fn create_document(
    pool: &PgPool,
    road_id: i32,
    document_in: DocumentCreate,
) -> ServiceResult<Document> {
    // Existence check up front so a missing road is a 404, not an FK error.
    let exists: Option<i32> = sqlx::query_scalar("SELECT id FROM roads WHERE id = $1")
        .bind(road_id)
        .fetch_optional(pool)
        .await?;
    if exists.is_none() {
        return Err(ServiceError::NotFound("Road"));
    }

    let document = sqlx::query_as::<_, Document>(
        "INSERT INTO documents (road_id, filename, file_url, description, creation_date)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, road_id, filename, file_url, description, creation_date, upload_date",
    )
    .bind(road_id)
    .bind(&document_in.filename)
    .bind(&document_in.file_url)
    .bind(&document_in.description)
    .bind(document_in.creation_date)
    .fetch_one(pool)
    .await?;
    Ok(document)
}

pub async fn documents_for_road(pool: &PgPool, road_id: i32) -> ServiceResult<Vec<Document>> {
    let documents = sqlx::query_as::<_, Document>(
        "SELECT id, road_id, filename, file_url, description, creation_date, upload_date
         FROM documents WHERE road_id = $1 ORDER BY id",
    )
    .bind(road_id)
    .fetch_all(pool)
    .await?;
    Ok(documents)
}

pub async fn get_document(pool: &PgPool, document_id: i32) -> ServiceResult<Document> {
    sqlx::query_as::<_, Document>(
        "SELECT id, road_id, filename, file_url, description, creation_date, upload_date
         FROM documents WHERE id = $1",
    )
    .bind(document_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ServiceError::NotFound("Document"))
}

/// Deletes a single document; parent road and sibling documents are untouched.
/// Returns the deleted row so the caller can clean up local storage.
pub async fn delete_document(pool: &PgPool, document_id: i32) -> ServiceResult<Document> {
    sqlx::query_as::<_, Document>(
        "DELETE FROM documents WHERE id = $1
         RETURNING id, road_id, filename, file_url, description, creation_date, upload_date",
    )
    .bind(document_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ServiceError::NotFound("Document"))
}
