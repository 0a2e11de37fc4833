//! GeoJSON footprint geometries attached to catalog products.

use serde::{Deserialize, Serialize};

/// A GeoJSON geometry object.
///
/// Newer catalog versions attach the product footprint (usually a `Polygon`)
/// to every record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single position.
    Point { coordinates: Position },

    /// A set of positions.
    MultiPoint { coordinates: Vec<Position> },

    /// A line through two or more positions.
    LineString { coordinates: Vec<Position> },

    /// A set of lines.
    MultiLineString { coordinates: Vec<Vec<Position>> },

    /// Linear rings; the first is the exterior, the rest are holes.
    Polygon { coordinates: Vec<Vec<Position>> },

    /// A set of polygons.
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },

    /// A heterogeneous set of geometries.
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    /// Create a polygon from its exterior ring.
    pub fn polygon(exterior: Vec<Position>) -> Self {
        Geometry::Polygon {
            coordinates: vec![exterior],
        }
    }

    /// Create an axis-aligned rectangle as a closed polygon.
    pub fn rectangle(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        Self::polygon(vec![
            Position::new(min_lon, min_lat),
            Position::new(max_lon, min_lat),
            Position::new(max_lon, max_lat),
            Position::new(min_lon, max_lat),
            Position::new(min_lon, min_lat),
        ])
    }

    /// The smallest envelope containing every position, or `None` if the
    /// geometry has no positions.
    pub fn bounds(&self) -> Option<Envelope> {
        let mut positions = Vec::new();
        self.collect_positions(&mut positions);

        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let mut envelope = Envelope {
            min_lon: first.lon,
            max_lon: first.lon,
            min_lat: first.lat,
            max_lat: first.lat,
        };
        for Position { lon, lat, .. } in iter {
            envelope.min_lon = envelope.min_lon.min(lon);
            envelope.max_lon = envelope.max_lon.max(lon);
            envelope.min_lat = envelope.min_lat.min(lat);
            envelope.max_lat = envelope.max_lat.max(lat);
        }
        Some(envelope)
    }

    fn collect_positions(&self, out: &mut Vec<Position>) {
        match self {
            Geometry::Point { coordinates } => out.push(*coordinates),
            Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
                out.extend_from_slice(coordinates)
            }
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                out.extend(coordinates.iter().flatten().copied())
            }
            Geometry::MultiPolygon { coordinates } => {
                out.extend(coordinates.iter().flatten().flatten().copied())
            }
            Geometry::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.collect_positions(out);
                }
            }
        }
    }
}

/// A GeoJSON position: `[longitude, latitude]` with an optional elevation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
    pub elevation: Option<f64>,
}

impl Position {
    /// A two-dimensional position.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon,
            lat,
            elevation: None,
        }
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values[..] {
            [lon, lat] => Ok(Self::new(lon, lat)),
            [lon, lat, elevation] => Ok(Self {
                lon,
                lat,
                elevation: Some(elevation),
            }),
            _ => Err(format!(
                "a position has 2 or 3 numbers, got {}",
                values.len()
            )),
        }
    }
}

impl From<Position> for Vec<f64> {
    fn from(position: Position) -> Self {
        let mut values = vec![position.lon, position.lat];
        values.extend(position.elevation);
        values
    }
}

/// An axis-aligned longitude/latitude envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Envelope {
    /// Whether two envelopes share at least one point (edges included).
    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min_lon <= other.max_lon
            && other.min_lon <= self.max_lon
            && self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_deserialize() {
        let json = r#"{"type": "Polygon", "coordinates": [[[-180.0, 65.0], [-170.0, 65.0], [-170.0, 75.0], [-180.0, 75.0], [-180.0, 65.0]]]}"#;
        let geometry: Geometry = serde_json::from_str(json).expect("Failed to deserialize");
        match &geometry {
            Geometry::Polygon { coordinates } => {
                assert_eq!(coordinates.len(), 1);
                assert_eq!(coordinates[0].len(), 5);
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_point_deserialize() {
        let json = r#"{"type": "Point", "coordinates": [4.4, 51.2]}"#;
        let geometry: Geometry = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(
            geometry,
            Geometry::Point {
                coordinates: Position::new(4.4, 51.2)
            }
        );
    }

    #[test]
    fn test_unknown_geometry_type_is_rejected() {
        let json = r#"{"type": "Circle", "coordinates": [0.0, 0.0]}"#;
        assert!(serde_json::from_str::<Geometry>(json).is_err());
    }

    #[test]
    fn test_bounds_of_rectangle() {
        let envelope = Geometry::rectangle(-180.0, -170.0, 65.0, 75.0)
            .bounds()
            .unwrap();
        assert_eq!(envelope.min_lon, -180.0);
        assert_eq!(envelope.max_lon, -170.0);
        assert_eq!(envelope.min_lat, 65.0);
        assert_eq!(envelope.max_lat, 75.0);
    }

    #[test]
    fn test_bounds_of_empty_geometry() {
        let geometry = Geometry::MultiPoint {
            coordinates: vec![],
        };
        assert!(geometry.bounds().is_none());
    }

    #[test]
    fn test_envelope_intersects() {
        let a = Geometry::rectangle(0.0, 10.0, 0.0, 10.0).bounds().unwrap();
        let b = Geometry::rectangle(10.0, 20.0, 5.0, 15.0).bounds().unwrap();
        let c = Geometry::rectangle(11.0, 20.0, 5.0, 15.0).bounds().unwrap();
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_positions_with_elevation() {
        let json = r#"{"type": "LineString", "coordinates": [[4.0, 50.0, 12.5], [5.0, 51.0]]}"#;
        let geometry: Geometry = serde_json::from_str(json).expect("Failed to deserialize");
        match &geometry {
            Geometry::LineString { coordinates } => {
                assert_eq!(coordinates[0].elevation, Some(12.5));
                assert_eq!(coordinates[1].elevation, None);
            }
            other => panic!("expected line string, got {other:?}"),
        }

        let value = serde_json::to_value(&geometry).unwrap();
        assert_eq!(value["coordinates"][0], serde_json::json!([4.0, 50.0, 12.5]));
        assert_eq!(value["coordinates"][1], serde_json::json!([5.0, 51.0]));
    }

    #[test]
    fn test_position_length_is_checked() {
        let one = r#"{"type": "Point", "coordinates": [4.0]}"#;
        let four = r#"{"type": "Point", "coordinates": [4.0, 50.0, 1.0, 2.0]}"#;
        assert!(serde_json::from_str::<Geometry>(one).is_err());
        assert!(serde_json::from_str::<Geometry>(four).is_err());
    }

    #[test]
    fn test_bounds_of_geometry_collection() {
        let json = r#"{
            "type": "GeometryCollection",
            "geometries": [
                {"type": "Point", "coordinates": [-5.0, 40.0]},
                {"type": "GeometryCollection", "geometries": [
                    {"type": "LineString", "coordinates": [[2.0, 49.0, 100.0], [8.0, 52.0, 90.0]]}
                ]}
            ]
        }"#;
        let geometry: Geometry = serde_json::from_str(json).expect("Failed to deserialize");
        let envelope = geometry.bounds().unwrap();
        assert_eq!(envelope.min_lon, -5.0);
        assert_eq!(envelope.max_lon, 8.0);
        assert_eq!(envelope.min_lat, 40.0);
        assert_eq!(envelope.max_lat, 52.0);

        let empty: Geometry =
            serde_json::from_str(r#"{"type": "GeometryCollection", "geometries": []}"#).unwrap();
        assert!(empty.bounds().is_none());
    }
}
