pub mod geometry;
pub mod mime;
pub mod model;
