//! Crosswalk persistence.
//!
//! Crosswalk geometry is selected as `ST_AsText(geom)`, so the codec sees the
//! text representation here (roads exercise the binary envelope path).

use sqlx::postgres::{PgRow, Postgres};
use sqlx::{PgPool, QueryBuilder, Row};

use crate::app::db::clamp_page;
use crate::app::error::{ServiceError, ServiceResult};
use crate::domain::geometry::{self, GeometryKind, RawGeometry};
use crate::domain::model::{Crosswalk, CrosswalkCreate, CrosswalkUpdate};

const CROSSWALK_COLUMNS: &str = "id, name, description, width, has_traffic_light, \
     near_educational_institution, has_t7, created_at, updated_at, ST_AsText(geom) AS geom";

fn crosswalk_from_row(row: &PgRow) -> Result<Crosswalk, sqlx::Error> {
    let raw = row
        .try_get::<Option<String>, _>("geom")?
        .map(RawGeometry::Text);
    Ok(Crosswalk {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        width: row.try_get("width")?,
        has_traffic_light: row.try_get("has_traffic_light")?,
        near_educational_institution: row.try_get("near_educational_institution")?,
        has_t7: row.try_get("has_t7")?,
        geom: geometry::to_text(raw),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn list(pool: &PgPool, skip: i64, limit: i64) -> ServiceResult<Vec<Crosswalk>> {
    let (skip, limit) = clamp_page(skip, limit);
    let rows = sqlx::query(&format!(
        "SELECT {CROSSWALK_COLUMNS} FROM crosswalks ORDER BY id LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;
    rows.iter()
        .map(crosswalk_from_row)
        .collect::<Result<_, _>>()
        .map_err(Into::into)
}

pub async fn get(pool: &PgPool, crosswalk_id: i32) -> ServiceResult<Crosswalk> {
    let row = sqlx::query(&format!(
        "SELECT {CROSSWALK_COLUMNS} FROM crosswalks WHERE id = $1"
    ))
    .bind(crosswalk_id)
    .fetch_optional(pool)
    .await?
    .ok_or(ServiceError::NotFound("Crosswalk"))?;
    Ok(crosswalk_from_row(&row)?)
}

pub async fn create(pool: &PgPool, crosswalk_in: CrosswalkCreate) -> ServiceResult<Crosswalk> {
    geometry::validate(&crosswalk_in.geom, GeometryKind::Point)?;

    let row = sqlx::query(&format!(
        "INSERT INTO crosswalks (name, description, width, has_traffic_light, \
         near_educational_institution, has_t7, geom)
         VALUES ($1, $2, $3, $4, $5, $6, ST_GeomFromText($7, 4326))
         RETURNING {CROSSWALK_COLUMNS}"
    ))
    .bind(&crosswalk_in.name)
    .bind(&crosswalk_in.description)
    .bind(crosswalk_in.width)
    .bind(crosswalk_in.has_traffic_light)
    .bind(crosswalk_in.near_educational_institution)
    .bind(crosswalk_in.has_t7)
    .bind(&crosswalk_in.geom)
    .fetch_one(pool)
    .await?;
    Ok(crosswalk_from_row(&row)?)
}

fn build_crosswalk_update<'a>(
    crosswalk_id: i32,
    update: &'a CrosswalkUpdate,
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE crosswalks SET ");
    let mut fields = builder.separated(", ");
    if let Some(name) = &update.name {
        fields.push("name = ");
        fields.push_bind_unseparated(name);
    }
    if let Some(description) = &update.description {
        fields.push("description = ");
        fields.push_bind_unseparated(description);
    }
    if let Some(width) = update.width {
        fields.push("width = ");
        fields.push_bind_unseparated(width);
    }
    if let Some(flag) = update.has_traffic_light {
        fields.push("has_traffic_light = ");
        fields.push_bind_unseparated(flag);
    }
    if let Some(flag) = update.near_educational_institution {
        fields.push("near_educational_institution = ");
        fields.push_bind_unseparated(flag);
    }
    if let Some(flag) = update.has_t7 {
        fields.push("has_t7 = ");
        fields.push_bind_unseparated(flag);
    }
    if let Some(geom) = &update.geom {
        fields.push("geom = ST_GeomFromText(");
        fields.push_bind_unseparated(geom);
        fields.push_unseparated(", 4326)");
    }
    fields.push("updated_at = now()");
    builder.push(" WHERE id = ");
    builder.push_bind(crosswalk_id);
    builder.push(&format!(" RETURNING {CROSSWALK_COLUMNS}"));
    builder
}

pub async fn update(
    pool: &PgPool,
    crosswalk_id: i32,
    update: CrosswalkUpdate,
) -> ServiceResult<Crosswalk> {
    if update.is_empty() {
        return get(pool, crosswalk_id).await;
    }
    if let Some(geom) = &update.geom {
        geometry::validate(geom, GeometryKind::Point)?;
    }

    let mut builder = build_crosswalk_update(crosswalk_id, &update);
    let row = builder
        .build()
        .fetch_optional(pool)
        .await?
        .ok_or(ServiceError::NotFound("Crosswalk"))?;
    Ok(crosswalk_from_row(&row)?)
}

pub async fn delete(pool: &PgPool, crosswalk_id: i32) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM crosswalks WHERE id = $1")
        .bind(crosswalk_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ServiceError::NotFound("Crosswalk"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_clause(sql: &str) -> &str {
        let start = sql.find("SET ").expect("SET clause") + 4;
        let end = sql.find(" WHERE").expect("WHERE clause");
        &sql[start..end]
    }

    #[test]
    fn width_only_update_touches_width_and_timestamp_only() {
        let update = CrosswalkUpdate {
            width: Some(3.5),
            ..CrosswalkUpdate::default()
        };
        let builder = build_crosswalk_update(1, &update);
        assert_eq!(set_clause(builder.sql()), "width = $1, updated_at = now()");
    }

    #[test]
    fn geometry_update_goes_through_geomfromtext() {
        let update = CrosswalkUpdate {
            geom: Some("POINT(30.52 50.45)".into()),
            ..CrosswalkUpdate::default()
        };
        let builder = build_crosswalk_update(1, &update);
        assert_eq!(
            set_clause(builder.sql()),
            "geom = ST_GeomFromText($1, 4326), updated_at = now()"
        );
    }

    #[test]
    fn every_field_lands_in_the_statement_when_present() {
        let update = CrosswalkUpdate {
            name: Some("Schoolyard".into()),
            description: Some("Raised".into()),
            width: Some(4.0),
            has_traffic_light: Some(true),
            near_educational_institution: Some(true),
            has_t7: Some(false),
            geom: Some("POINT(1 2)".into()),
        };
        let builder = build_crosswalk_update(1, &update);
        let sql = set_clause(builder.sql()).to_string();
        for column in [
            "name = $1",
            "description = $2",
            "width = $3",
            "has_traffic_light = $4",
            "near_educational_institution = $5",
            "has_t7 = $6",
            "geom = ST_GeomFromText($7, 4326)",
            "updated_at = now()",
        ] {
            assert!(sql.contains(column), "missing `{column}` in: {sql}");
        }
    }
}
