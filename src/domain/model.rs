//! Entities and request payloads. Geometry always crosses this boundary as a
//! WKT string (see [`crate::domain::geometry`]); the storage representation
//! never leaks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct Road {
    pub id: i32,
    pub name: String,
    /// WKT `LINESTRING`, EPSG:4326.
    pub geom: String,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct RoadWithDocuments {
    pub id: i32,
    pub name: String,
    pub geom: String,
    pub documents: Vec<Document>,
}

impl RoadWithDocuments {
    pub fn new(road: Road, documents: Vec<Document>) -> Self {
        Self {
            id: road.id,
            name: road.name,
            geom: road.geom,
            documents,
        }
    }
}

#[derive(Serialize, Debug, Clone, ToSchema, sqlx::FromRow)]
pub struct Document {
    pub id: i32,
    pub road_id: i32,
    pub filename: String,
    /// Either a URL supplied by the client or the path of a locally stored
    /// upload.
    pub file_url: String,
    pub description: Option<String>,
    pub creation_date: Option<NaiveDate>,
    pub upload_date: Option<DateTime<Utc>>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct Crosswalk {
    pub id: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub width: Option<f64>,
    pub has_traffic_light: bool,
    pub near_educational_institution: bool,
    pub has_t7: bool,
    /// WKT `POINT`, EPSG:4326.
    pub geom: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct RoadCreate {
    pub name: String,
    /// WKT `LINESTRING` literal.
    pub geom: String,
}

/// Partial update: only fields present in the payload are applied. A null
/// `geom` means "no change" since geometry is non-nullable at the entity
/// level.
#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct RoadUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub geom: Option<String>,
}

impl RoadUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.geom.is_none()
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct CrosswalkCreate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub has_traffic_light: bool,
    #[serde(default)]
    pub near_educational_institution: bool,
    #[serde(default)]
    pub has_t7: bool,
    /// WKT `POINT` literal.
    pub geom: String,
}

/// Partial update over the fixed crosswalk field set.
#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct CrosswalkUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub has_traffic_light: Option<bool>,
    #[serde(default)]
    pub near_educational_institution: Option<bool>,
    #[serde(default)]
    pub has_t7: Option<bool>,
    #[serde(default)]
    pub geom: Option<String>,
}

impl CrosswalkUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.width.is_none()
            && self.has_traffic_light.is_none()
            && self.near_educational_institution.is_none()
            && self.has_t7.is_none()
            && self.geom.is_none()
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct DocumentCreate {
    pub filename: String,
    /// External URL or a path produced by the upload endpoint.
    pub file_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub creation_date: Option<NaiveDate>,
}
