//! Pool construction and idempotent schema bootstrap.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::infra::config;

/// Connects to Postgres and ensures the schema exists.
pub async fn connect() -> anyhow::Result<PgPool> {
    dotenv::dotenv().ok();
    let database_url = config::database_url();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    ensure_schema(&pool).await?;
    Ok(pool)
}

/// Creates the tables on first run. `ON DELETE CASCADE` on `documents` is
/// what enforces the road-owns-documents lifecycle; the service layer never
/// deletes documents when a road goes away.
pub async fn ensure_schema(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query("CREATE EXTENSION IF NOT EXISTS postgis")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS roads (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            geom geometry(LineString, 4326) NOT NULL
        )",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_roads_name ON roads (name)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS documents (
            id SERIAL PRIMARY KEY,
            road_id INTEGER NOT NULL REFERENCES roads(id) ON DELETE CASCADE,
            filename VARCHAR(255) NOT NULL,
            file_url TEXT NOT NULL,
            description TEXT,
            creation_date DATE,
            upload_date TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_road_id ON documents (road_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS crosswalks (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255),
            description TEXT,
            width DOUBLE PRECISION,
            has_traffic_light BOOLEAN NOT NULL DEFAULT FALSE,
            near_educational_institution BOOLEAN NOT NULL DEFAULT FALSE,
            has_t7 BOOLEAN NOT NULL DEFAULT FALSE,
            geom geometry(Point, 4326) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Clamps client-supplied pagination to sane bounds: `skip >= 0`,
/// `1 <= limit <= MAX_PAGE_SIZE`.
pub fn clamp_page(skip: i64, limit: i64) -> (i64, i64) {
    (skip.max(0), limit.clamp(1, config::MAX_PAGE_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_rejects_negative_skip() {
        assert_eq!(clamp_page(-5, 10), (0, 10));
    }

    #[test]
    fn clamp_caps_limit_at_max_page_size() {
        assert_eq!(clamp_page(0, 10_000), (0, 100));
    }

    #[test]
    fn clamp_raises_zero_limit_to_one() {
        assert_eq!(clamp_page(3, 0), (3, 1));
    }

    #[test]
    fn clamp_passes_sane_values_through() {
        assert_eq!(clamp_page(20, 50), (20, 50));
    }
}
