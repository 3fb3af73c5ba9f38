use serde::{Deserialize, Serialize};

/// A resolved position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Returns `None` for non-finite or out-of-range values.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }
}

/// GeoJSON Point. Coordinates are `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl From<Coordinates> for GeoPoint {
    fn from(c: Coordinates) -> Self {
        Self {
            kind: "Point".into(),
            coordinates: [c.lng, c.lat],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityProperties {
    pub severity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: GeoPoint,
    pub properties: SeverityProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

/// A hospital or ambulance service shown on the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReliefCenter {
    pub id: u32,
    pub name: String,
    pub position: Coordinates,
    #[serde(rename = "type")]
    pub kind: String,
}
