//! Geometry normalization and validation.
//!
//! The write path validates candidate WKT literals against the shape an
//! entity requires before anything touches the database. The read path
//! (see [`codec`]) normalizes whatever representation the storage driver
//! hands back into a WKT string, so callers never see driver internals.

pub mod codec;

pub use codec::{to_text, RawGeometry};

use std::fmt;
use thiserror::Error;

/// The geometric shape an entity column requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    /// `LINESTRING` with at least two vertices (roads).
    Line,
    /// `POINT` (crosswalks).
    Point,
}

impl GeometryKind {
    /// Leading WKT keyword for this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            GeometryKind::Line => "LINESTRING",
            GeometryKind::Point => "POINT",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Rejection reasons for submitted geometry. Both map to a client error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("Geometry must be a {expected}")]
    WrongKind { expected: GeometryKind },
    #[error("LINESTRING must have at least 2 points")]
    DegenerateGeometry,
}

/// Checks that `wkt` is a literal of the expected kind.
///
/// The vertex-count check for lines is textual: an `EMPTY` marker or fewer
/// than one comma-separated coordinate group fails. It does not parse
/// coordinates, so a malformed string with enough commas will pass here and
/// be rejected by PostGIS at insert time instead.
pub fn validate(wkt: &str, expected: GeometryKind) -> Result<(), GeometryError> {
    let wkt = wkt.trim_start();
    if !wkt.starts_with(expected.keyword()) {
        return Err(GeometryError::WrongKind { expected });
    }
    if expected == GeometryKind::Line && (wkt.contains("EMPTY") || !wkt.contains(',')) {
        return Err(GeometryError::DegenerateGeometry);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_linestring_with_two_points() {
        assert_eq!(validate("LINESTRING(0 0, 1 1)", GeometryKind::Line), Ok(()));
    }

    #[test]
    fn accepts_linestring_with_many_points() {
        assert_eq!(
            validate("LINESTRING(30.52 50.45, 30.53 50.46, 30.54 50.47)", GeometryKind::Line),
            Ok(())
        );
    }

    #[test]
    fn rejects_point_where_line_expected() {
        assert_eq!(
            validate("POINT(0 0)", GeometryKind::Line),
            Err(GeometryError::WrongKind {
                expected: GeometryKind::Line
            })
        );
    }

    #[test]
    fn rejects_line_where_point_expected() {
        assert_eq!(
            validate("LINESTRING(0 0, 1 1)", GeometryKind::Point),
            Err(GeometryError::WrongKind {
                expected: GeometryKind::Point
            })
        );
    }

    #[test]
    fn rejects_empty_linestring() {
        assert_eq!(
            validate("LINESTRING EMPTY", GeometryKind::Line),
            Err(GeometryError::DegenerateGeometry)
        );
    }

    #[test]
    fn rejects_single_point_linestring() {
        assert_eq!(
            validate("LINESTRING(0 0)", GeometryKind::Line),
            Err(GeometryError::DegenerateGeometry)
        );
    }

    #[test]
    fn point_needs_no_vertex_check() {
        assert_eq!(validate("POINT(30.52 50.45)", GeometryKind::Point), Ok(()));
    }

    #[test]
    fn leading_whitespace_is_ignored() {
        assert_eq!(validate("  LINESTRING(0 0, 1 1)", GeometryKind::Line), Ok(()));
    }

    #[test]
    fn garbage_is_wrong_kind() {
        assert_eq!(
            validate("CIRCLE(0 0, 5)", GeometryKind::Line),
            Err(GeometryError::WrongKind {
                expected: GeometryKind::Line
            })
        );
    }

    #[test]
    fn error_messages_name_the_expected_kind() {
        let err = validate("POINT(0 0)", GeometryKind::Line).unwrap_err();
        assert_eq!(err.to_string(), "Geometry must be a LINESTRING");
    }
}
