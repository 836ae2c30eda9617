use crate::errors::{ExportError, ExportResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an element is placed in the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    Point,
    Curve,
    #[serde(rename = "Curve-Unbound")]
    CurveUnbound,
    None,
}

impl LocationKind {
    /// Literal written to the `LocationType` column
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationKind::Point => "Point",
            LocationKind::Curve => "Curve",
            LocationKind::CurveUnbound => "Curve-Unbound",
            LocationKind::None => "None",
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Point" => Ok(Self::Point),
            "Curve" => Ok(Self::Curve),
            "Curve-Unbound" => Ok(Self::CurveUnbound),
            "None" => Ok(Self::None),
            _ => Err(format!("Unknown location type: {}", s)),
        }
    }
}

/// Point in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Bounded curve endpoints in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment3 {
    pub start: Point3,
    pub end: Point3,
}

/// Placement of an element; carries coordinates only where they exist
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Location {
    Point(Point3),
    Curve(Segment3),
    CurveUnbound,
    None,
}

impl Location {
    pub fn kind(&self) -> LocationKind {
        match self {
            Location::Point(_) => LocationKind::Point,
            Location::Curve(_) => LocationKind::Curve,
            Location::CurveUnbound => LocationKind::CurveUnbound,
            Location::None => LocationKind::None,
        }
    }
}

/// Column names shared by the delimited-text and spreadsheet writers
pub const EXPORT_HEADERS: [&str; 15] = [
    "Id",
    "Category",
    "Family",
    "Type",
    "Level",
    "LocationType",
    "X",
    "Y",
    "Z",
    "StartX",
    "StartY",
    "StartZ",
    "EndX",
    "EndY",
    "EndZ",
];

/// One exported element. Coordinates are already in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ElementRecord", into = "ElementRecord")]
pub struct ElementExportRow {
    pub id: String,
    pub category: String,
    pub family: String,
    pub type_name: String,
    pub level: String,
    pub location: Location,
}

impl ElementExportRow {
    pub fn new(id: impl Into<String>, category: impl Into<String>, location: Location) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            family: String::new(),
            type_name: String::new(),
            level: String::new(),
            location,
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn location_kind(&self) -> LocationKind {
        self.location.kind()
    }

    /// Empty category means "uncategorized"
    pub fn is_uncategorized(&self) -> bool {
        self.category.is_empty()
    }

    /// The text columns in header order (Id..LocationType)
    pub fn text_fields(&self) -> [&str; 6] {
        [
            &self.id,
            &self.category,
            &self.family,
            &self.type_name,
            &self.level,
            self.location_kind().as_str(),
        ]
    }

    /// The nine coordinate columns in header order (X..EndZ)
    pub fn coordinates(&self) -> [Option<f64>; 9] {
        match self.location {
            Location::Point(p) => [
                Some(p.x),
                Some(p.y),
                Some(p.z),
                None,
                None,
                None,
                None,
                None,
                None,
            ],
            Location::Curve(s) => [
                None,
                None,
                None,
                Some(s.start.x),
                Some(s.start.y),
                Some(s.start.z),
                Some(s.end.x),
                Some(s.end.y),
                Some(s.end.z),
            ],
            Location::CurveUnbound | Location::None => [None; 9],
        }
    }

    /// Reject coordinates no writer can represent (NaN, infinities)
    pub fn validate(&self) -> ExportResult<()> {
        for (value, header) in self.coordinates().iter().zip(&EXPORT_HEADERS[6..]) {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(ExportError::SerializationFailure(format!(
                        "element {} has non-finite {} coordinate ({})",
                        self.id, header, v
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Flat document shape of a row, as written by the JSON writer and accepted
/// at the FFI boundary. Field names match the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ElementRecord {
    pub id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub family: String,
    #[serde(default)]
    pub r#type: String,
    #[serde(default)]
    pub level: String,
    pub location_type: LocationKind,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub z: Option<f64>,
    #[serde(default)]
    pub start_x: Option<f64>,
    #[serde(default)]
    pub start_y: Option<f64>,
    #[serde(default)]
    pub start_z: Option<f64>,
    #[serde(default)]
    pub end_x: Option<f64>,
    #[serde(default)]
    pub end_y: Option<f64>,
    #[serde(default)]
    pub end_z: Option<f64>,
}

impl From<ElementExportRow> for ElementRecord {
    fn from(row: ElementExportRow) -> Self {
        let [x, y, z, start_x, start_y, start_z, end_x, end_y, end_z] = row.coordinates();
        let location_type = row.location_kind();
        Self {
            id: row.id,
            category: row.category,
            family: row.family,
            r#type: row.type_name,
            level: row.level,
            location_type,
            x,
            y,
            z,
            start_x,
            start_y,
            start_z,
            end_x,
            end_y,
            end_z,
        }
    }
}

impl TryFrom<ElementRecord> for ElementExportRow {
    type Error = String;

    fn try_from(record: ElementRecord) -> Result<Self, Self::Error> {
        let point = match (record.x, record.y, record.z) {
            (Some(x), Some(y), Some(z)) => Some(Point3::new(x, y, z)),
            (None, None, None) => None,
            _ => return Err(format!("element {} has a partial point", record.id)),
        };
        let segment = match (
            record.start_x,
            record.start_y,
            record.start_z,
            record.end_x,
            record.end_y,
            record.end_z,
        ) {
            (Some(sx), Some(sy), Some(sz), Some(ex), Some(ey), Some(ez)) => Some(Segment3 {
                start: Point3::new(sx, sy, sz),
                end: Point3::new(ex, ey, ez),
            }),
            (None, None, None, None, None, None) => None,
            _ => return Err(format!("element {} has a partial segment", record.id)),
        };

        let location = match (record.location_type, point, segment) {
            (LocationKind::Point, Some(p), None) => Location::Point(p),
            (LocationKind::Curve, None, Some(s)) => Location::Curve(s),
            (LocationKind::CurveUnbound, None, None) => Location::CurveUnbound,
            (LocationKind::None, None, None) => Location::None,
            (kind, _, _) => {
                return Err(format!(
                    "element {} has coordinates that do not match location type {}",
                    record.id, kind
                ))
            }
        };

        Ok(Self {
            id: record.id,
            category: record.category,
            family: record.family,
            type_name: record.r#type,
            level: record.level,
            location,
        })
    }
}

/// Display/filter unit produced by the category summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfo {
    pub name: String,
    pub element_count: usize,
    pub is_selected: bool,
}

impl fmt::Display for CategoryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.element_count)
    }
}

/// Counts shown before export. Curve counts include unbound curves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStats {
    pub total_elements: usize,
    pub point_locations: usize,
    pub curve_locations: usize,
    pub no_locations: usize,
    pub category_count: usize,
}
