pub mod app;
pub mod domain;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::file_storage::FileStorage;
pub use domain::geometry::{validate, GeometryError, GeometryKind, RawGeometry};
pub use domain::model::{Crosswalk, Document, Road, RoadWithDocuments};
