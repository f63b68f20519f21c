//! Work location entity

use serde::{Deserialize, Serialize};

/// Label shown when a location reference cannot be resolved
pub const UNKNOWN_LOCATION: &str = "N/A";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub zip_code: Option<String>,

    #[serde(default)]
    pub is_primary: bool,
}

/// Resolve a location reference against a parent's locations.
///
/// A missing reference or a dangling id both resolve to `N/A`.
pub fn resolve_location_label(locations: &[Location], id: Option<i64>) -> String {
    id.and_then(|id| locations.iter().find(|l| l.id == id))
        .map(|l| l.name.clone())
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
}
