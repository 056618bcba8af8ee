//! Read-path geometry codec.
//!
//! Storage reads surface geometry in one of a few representations depending
//! on how the column was selected: already-text (`ST_AsText`), the PostGIS
//! EWKB envelope (`geom::bytea`), or plain undecoded bytes. The
//! representation is decided once, at the driver boundary, by wrapping the
//! value in [`RawGeometry`]; [`to_text`] then produces the WKT string that
//! crosses the service boundary.
//!
//! Decode failures never propagate: a corrupt-but-present geometry must not
//! break a listing response, so the affected field degrades to a diagnostic
//! string instead.

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use geo_types::{Coord, Geometry, LineString, Point, Polygon};
use std::io::Cursor;
use thiserror::Error;
use wkt::ToWkt;

/// EWKB header flag marking an embedded SRID.
const EWKB_SRID_FLAG: u32 = 0x2000_0000;
/// EWKB header flags for Z/M dimensions (not supported by this service).
const EWKB_DIM_FLAGS: u32 = 0x8000_0000 | 0x4000_0000;

/// A geometry value as it arrived from the storage driver.
#[derive(Debug, Clone, PartialEq)]
pub enum RawGeometry {
    /// The driver already produced text (e.g. `ST_AsText` in the query).
    Text(String),
    /// PostGIS binary envelope: WKB, possibly carrying an SRID header.
    Ewkb(Vec<u8>),
    /// Bytes of unknown provenance; decoded on a best-effort basis.
    Bytes(Vec<u8>),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("truncated geometry payload")]
    Truncated(#[from] std::io::Error),
    #[error("invalid byte-order marker {0:#04x}")]
    BadByteOrder(u8),
    #[error("unsupported geometry type code {0}")]
    UnsupportedType(u32),
    #[error("Z/M dimensions are not supported")]
    UnsupportedDimension,
    #[error("declared vertex count exceeds payload size")]
    BogusVertexCount,
}

/// Normalizes a storage-layer geometry value to WKT text.
///
/// Absent geometry becomes the empty string; callers treat `""` as "no
/// geometry", never as an error. Text passes through unchanged. Binary
/// representations are decoded and re-serialized to canonical WKT; on
/// decode failure the returned string carries the diagnostic instead.
pub fn to_text(raw: Option<RawGeometry>) -> String {
    match raw {
        None => String::new(),
        Some(RawGeometry::Text(s)) => s,
        Some(RawGeometry::Ewkb(bytes)) => match decode_wkb(&bytes) {
            Ok(geometry) => geometry.wkt_string(),
            Err(e) => format!("Error converting geometry: {e}"),
        },
        Some(RawGeometry::Bytes(bytes)) => match decode_wkb(&bytes) {
            Ok(geometry) => geometry.wkt_string(),
            // The bytes may simply be WKT that was fetched untyped.
            Err(e) => match std::str::from_utf8(&bytes) {
                Ok(s) => s.to_string(),
                Err(_) => format!("Error converting geometry: {e}"),
            },
        },
    }
}

/// Decodes a WKB or EWKB payload into a geometry structure.
///
/// The SRID carried by the EWKB envelope is read and discarded: every
/// geometry in this service is EPSG:4326 and no reprojection happens here.
pub fn decode_wkb(bytes: &[u8]) -> Result<Geometry<f64>, DecodeError> {
    let mut cursor = Cursor::new(bytes);
    match cursor.read_u8()? {
        0 => decode_body::<BigEndian>(&mut cursor),
        1 => decode_body::<LittleEndian>(&mut cursor),
        other => Err(DecodeError::BadByteOrder(other)),
    }
}

fn decode_body<B: ByteOrder>(cursor: &mut Cursor<&[u8]>) -> Result<Geometry<f64>, DecodeError> {
    let mut type_code = cursor.read_u32::<B>()?;
    if type_code & EWKB_DIM_FLAGS != 0 {
        return Err(DecodeError::UnsupportedDimension);
    }
    if type_code & EWKB_SRID_FLAG != 0 {
        type_code &= !EWKB_SRID_FLAG;
        let _srid = cursor.read_u32::<B>()?;
    }
    match type_code {
        1 => {
            let coord = read_coord::<B>(cursor)?;
            Ok(Geometry::Point(Point::from(coord)))
        }
        2 => Ok(Geometry::LineString(read_line::<B>(cursor)?)),
        3 => {
            let ring_count = cursor.read_u32::<B>()?;
            let mut rings = Vec::new();
            for _ in 0..ring_count {
                rings.push(read_line::<B>(cursor)?);
            }
            let exterior = if rings.is_empty() {
                LineString::new(Vec::new())
            } else {
                rings.remove(0)
            };
            Ok(Geometry::Polygon(Polygon::new(exterior, rings)))
        }
        other => Err(DecodeError::UnsupportedType(other)),
    }
}

fn read_line<B: ByteOrder>(cursor: &mut Cursor<&[u8]>) -> Result<LineString<f64>, DecodeError> {
    let count = cursor.read_u32::<B>()? as u64;
    let remaining = (cursor.get_ref().len() as u64).saturating_sub(cursor.position());
    // Two f64s per vertex; refuse counts the payload cannot possibly hold.
    if count * 16 > remaining {
        return Err(DecodeError::BogusVertexCount);
    }
    let mut coords = Vec::with_capacity(count as usize);
    for _ in 0..count {
        coords.push(read_coord::<B>(cursor)?);
    }
    Ok(LineString::new(coords))
}

fn read_coord<B: ByteOrder>(cursor: &mut Cursor<&[u8]>) -> Result<Coord<f64>, DecodeError> {
    let x = cursor.read_f64::<B>()?;
    let y = cursor.read_f64::<B>()?;
    Ok(Coord { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wkt::TryFromWkt;

    fn le_point(x: f64, y: f64) -> Vec<u8> {
        let mut b = vec![0x01, 0x01, 0x00, 0x00, 0x00];
        b.extend_from_slice(&x.to_le_bytes());
        b.extend_from_slice(&y.to_le_bytes());
        b
    }

    fn le_ewkb_point(x: f64, y: f64, srid: u32) -> Vec<u8> {
        let mut b = vec![0x01];
        b.extend_from_slice(&(1u32 | EWKB_SRID_FLAG).to_le_bytes());
        b.extend_from_slice(&srid.to_le_bytes());
        b.extend_from_slice(&x.to_le_bytes());
        b.extend_from_slice(&y.to_le_bytes());
        b
    }

    fn be_linestring(points: &[(f64, f64)]) -> Vec<u8> {
        let mut b = vec![0x00];
        b.extend_from_slice(&2u32.to_be_bytes());
        b.extend_from_slice(&(points.len() as u32).to_be_bytes());
        for (x, y) in points {
            b.extend_from_slice(&x.to_be_bytes());
            b.extend_from_slice(&y.to_be_bytes());
        }
        b
    }

    fn parse(wkt_text: &str) -> Geometry<f64> {
        Geometry::try_from_wkt_str(wkt_text).expect("decoded text must be parseable WKT")
    }

    #[test]
    fn null_becomes_empty_string() {
        assert_eq!(to_text(None), "");
    }

    #[test]
    fn text_is_exact_passthrough() {
        let wkt_text = "LINESTRING(0 0, 1 1)";
        assert_eq!(to_text(Some(RawGeometry::Text(wkt_text.into()))), wkt_text);
    }

    #[test]
    fn decodes_little_endian_wkb_point() {
        let out = to_text(Some(RawGeometry::Ewkb(le_point(1.0, 2.0))));
        assert_eq!(parse(&out), Geometry::Point(Point::new(1.0, 2.0)));
    }

    #[test]
    fn decodes_ewkb_point_with_srid_header() {
        let out = to_text(Some(RawGeometry::Ewkb(le_ewkb_point(30.52, 50.45, 4326))));
        assert_eq!(parse(&out), Geometry::Point(Point::new(30.52, 50.45)));
    }

    #[test]
    fn decodes_big_endian_linestring() {
        let out = to_text(Some(RawGeometry::Ewkb(be_linestring(&[
            (0.0, 0.0),
            (1.0, 1.0),
        ]))));
        let expected: LineString<f64> = vec![(0.0, 0.0), (1.0, 1.0)].into();
        assert_eq!(parse(&out), Geometry::LineString(expected));
    }

    #[test]
    fn binary_decode_is_deterministic() {
        let bytes = le_ewkb_point(7.25, -3.5, 4326);
        let first = to_text(Some(RawGeometry::Ewkb(bytes.clone())));
        let second = to_text(Some(RawGeometry::Ewkb(bytes)));
        assert_eq!(first, second);
    }

    #[test]
    fn corrupt_envelope_degrades_to_diagnostic() {
        let out = to_text(Some(RawGeometry::Ewkb(vec![0x09, 0xFF, 0xFF])));
        assert!(out.starts_with("Error converting geometry:"), "got: {out}");
    }

    #[test]
    fn truncated_payload_degrades_to_diagnostic() {
        let mut bytes = le_point(1.0, 2.0);
        bytes.truncate(9);
        let out = to_text(Some(RawGeometry::Ewkb(bytes)));
        assert!(out.starts_with("Error converting geometry:"), "got: {out}");
    }

    #[test]
    fn bogus_vertex_count_is_rejected_without_allocation() {
        let mut b = vec![0x01];
        b.extend_from_slice(&2u32.to_le_bytes());
        b.extend_from_slice(&u32::MAX.to_le_bytes());
        let out = to_text(Some(RawGeometry::Ewkb(b)));
        assert!(out.starts_with("Error converting geometry:"), "got: {out}");
    }

    #[test]
    fn undecodable_utf8_bytes_pass_through_as_text() {
        let out = to_text(Some(RawGeometry::Bytes(b"POINT(1 2)".to_vec())));
        assert_eq!(out, "POINT(1 2)");
    }

    #[test]
    fn non_utf8_garbage_bytes_degrade_to_diagnostic() {
        let out = to_text(Some(RawGeometry::Bytes(vec![0xC0, 0xFF, 0xEE])));
        assert!(out.starts_with("Error converting geometry:"), "got: {out}");
    }

    #[test]
    fn raw_wkb_bytes_decode_like_the_envelope() {
        let out = to_text(Some(RawGeometry::Bytes(le_point(5.0, 6.0))));
        assert_eq!(parse(&out), Geometry::Point(Point::new(5.0, 6.0)));
    }

    #[test]
    fn never_renders_the_word_null_for_absent_geometry() {
        let out = to_text(None);
        assert_ne!(out, "null");
        assert_ne!(out, "None");
        assert!(out.is_empty());
    }
}
