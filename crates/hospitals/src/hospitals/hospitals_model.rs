use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::regions::BoundingBox;

/// A hospital as returned to callers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Hospital {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub tags: BTreeMap<String, String>,
    pub osm_type: String,
    pub osm_id: i64,
}

/// Successful response for one wilaya; this is also what gets cached.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HospitalsResponse {
    pub wilaya: String,
    pub bounding_box: BoundingBox,
    pub count: usize,
    pub hospitals: Vec<Hospital>,
    pub queried_at: DateTime<Utc>,
}
