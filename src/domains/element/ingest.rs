//! Conversion of collector output (native model units) into export rows.

use super::types::{ElementExportRow, Location, Point3, Segment3};
use serde::{Deserialize, Serialize};

/// 1 ft = 0.3048 m, exact
pub const FEET_TO_METERS: f64 = 0.3048;

/// Coordinate triple in feet, as read from the host model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawXyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RawXyz {
    fn to_meters(self) -> Point3 {
        Point3::new(
            self.x * FEET_TO_METERS,
            self.y * FEET_TO_METERS,
            self.z * FEET_TO_METERS,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RawLocation {
    Point { point: RawXyz },
    /// Endpoints are only meaningful when `bound` is true
    Curve {
        bound: bool,
        start: Option<RawXyz>,
        end: Option<RawXyz>,
    },
    None,
}

/// One element as handed over by the host collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawElement {
    pub id: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    pub location: RawLocation,
}

impl RawElement {
    /// Build the export row, converting every linear coordinate once.
    pub fn into_row(self) -> ElementExportRow {
        let location = match self.location {
            RawLocation::Point { point } => Location::Point(point.to_meters()),
            RawLocation::Curve {
                bound: true,
                start: Some(start),
                end: Some(end),
            } => Location::Curve(Segment3 {
                start: start.to_meters(),
                end: end.to_meters(),
            }),
            RawLocation::Curve { .. } => Location::CurveUnbound,
            RawLocation::None => Location::None,
        };

        ElementExportRow {
            id: self.id,
            category: self.category.unwrap_or_default(),
            family: self.family.unwrap_or_default(),
            type_name: self.type_name.unwrap_or_default(),
            level: self.level.unwrap_or_default(),
            location,
        }
    }
}

/// Convert a whole collector batch, preserving order
pub fn ingest<I>(elements: I) -> Vec<ElementExportRow>
where
    I: IntoIterator<Item = RawElement>,
{
    elements.into_iter().map(RawElement::into_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::element::types::LocationKind;

    fn raw(id: &str, location: RawLocation) -> RawElement {
        RawElement {
            id: id.to_string(),
            category: Some("Walls".to_string()),
            family: None,
            type_name: Some("Generic - 200mm".to_string()),
            level: None,
            location,
        }
    }

    #[test]
    fn test_feet_to_meters_constant() {
        assert_eq!(FEET_TO_METERS, 0.3048);
    }

    #[test]
    fn test_point_is_converted() {
        let row = raw("1", RawLocation::Point { point: RawXyz { x: 10.0, y: -1.0, z: 0.0 } }).into_row();
        match row.location {
            Location::Point(p) => {
                assert!((p.x - 3.048).abs() < 1e-12);
                assert!((p.y + 0.3048).abs() < 1e-12);
                assert_eq!(p.z, 0.0);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(row.family, "");
        assert_eq!(row.level, "");
    }

    #[test]
    fn test_bound_curve_keeps_endpoints() {
        let row = raw(
            "2",
            RawLocation::Curve {
                bound: true,
                start: Some(RawXyz { x: 0.0, y: 0.0, z: 0.0 }),
                end: Some(RawXyz { x: 100.0, y: 0.0, z: 0.0 }),
            },
        )
        .into_row();
        assert_eq!(row.location_kind(), LocationKind::Curve);
        assert!((row.coordinates()[6].unwrap() - 30.48).abs() < 1e-9);
    }

    #[test]
    fn test_unbound_curve_drops_endpoints() {
        let row = raw(
            "3",
            RawLocation::Curve {
                bound: false,
                start: Some(RawXyz { x: 1.0, y: 1.0, z: 1.0 }),
                end: Some(RawXyz { x: 2.0, y: 2.0, z: 2.0 }),
            },
        )
        .into_row();
        assert_eq!(row.location_kind(), LocationKind::CurveUnbound);
        assert!(row.coordinates().iter().all(Option::is_none));
    }

    #[test]
    fn test_ingest_from_json() {
        let json = r#"[
            {"id": "100", "category": "Doors", "location": {"kind": "point", "point": {"x": 1.0, "y": 2.0, "z": 3.0}}},
            {"id": "101", "location": {"kind": "none"}}
        ]"#;
        let elements: Vec<RawElement> = serde_json::from_str(json).unwrap();
        let rows = ingest(elements);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "Doors");
        assert!(rows[1].is_uncategorized());
        assert_eq!(rows[1].location_kind(), LocationKind::None);
    }
}
