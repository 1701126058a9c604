//! Overpass API specifics: endpoints, query text, response parsing.
//!
//! API documentation: https://wiki.openstreetmap.org/wiki/Overpass_API

use std::collections::BTreeMap;

use hospitals_upstream::{Endpoint, RetryPolicy};
use serde::Deserialize;

use super::hospitals_model::Hospital;
use crate::errors::{Error, Result};
use crate::regions::BoundingBox;

/// Public Overpass instances, tried in this order.
pub const DEFAULT_OVERPASS_ENDPOINTS: [&str; 3] = [
    "https://overpass-api.de/api/interpreter",
    "https://lz4.overpass-api.de/api/interpreter",
    "https://overpass.openstreetmap.ru/api/interpreter",
];

/// Result limit used when the caller gives none (or an unusable one).
pub const DEFAULT_LIMIT: u32 = 200;

/// Upper bound on the result limit.
pub const MAX_LIMIT: u32 = 1000;

/// Server-side timeout requested inside the query, in seconds.
const QUERY_TIMEOUT_SECS: u32 = 60;

/// Where and how to reach Overpass.
#[derive(Clone, Debug)]
pub struct OverpassConfig {
    pub endpoints: Vec<Endpoint>,
    pub policy: RetryPolicy,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_OVERPASS_ENDPOINTS
                .iter()
                .map(|address| Endpoint::new(address))
                .collect(),
            policy: RetryPolicy::default(),
        }
    }
}

/// Parse the `limit` query parameter.
///
/// Only the leading integer is read, so `"12abc"` and `"3.7"` give 12 and 3.
/// Missing, non-numeric, zero or negative values fall back to
/// [`DEFAULT_LIMIT`]; anything above [`MAX_LIMIT`] is clamped.
pub fn parse_limit(raw: Option<&str>) -> u32 {
    let parsed = raw
        .and_then(leading_integer)
        .filter(|value| *value > 0)
        .map(|value| value.min(MAX_LIMIT as i64) as u32);
    parsed.unwrap_or(DEFAULT_LIMIT)
}

/// Optional sign followed by at least one digit, after leading whitespace.
fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.trim_start_matches(|c: char| c == '+' || c == '-');
    let sign_len = trimmed.len() - unsigned.len();
    if sign_len > 1 {
        return None;
    }
    let digits_len = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits_len == 0 {
        return None;
    }
    // Saturate absurdly long digit runs instead of rejecting them.
    let magnitude = unsigned[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if trimmed.starts_with('-') { -magnitude } else { magnitude })
}

/// Keep an already numeric limit inside `1..=MAX_LIMIT`.
pub fn clamp_limit(limit: u32) -> u32 {
    if limit == 0 {
        DEFAULT_LIMIT
    } else {
        limit.min(MAX_LIMIT)
    }
}

/// Build the Overpass QL query for hospitals inside `bbox`.
pub fn build_query(bbox: &BoundingBox, limit: u32) -> String {
    let area = format!("({},{},{},{})", bbox.south, bbox.west, bbox.north, bbox.east);
    format!(
        "[out:json][timeout:{timeout}];\n\
         (\n  \
           node[\"amenity\"=\"hospital\"]{area};\n  \
           way[\"amenity\"=\"hospital\"]{area};\n  \
           relation[\"amenity\"=\"hospital\"]{area};\n\
         );\n\
         out center {limit};\n",
        timeout = QUERY_TIMEOUT_SECS,
        area = area,
        limit = limit,
    )
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    element_type: String,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<Center>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct Center {
    lat: f64,
    lon: f64,
}

impl OverpassElement {
    fn into_hospital(self) -> Hospital {
        let name = self
            .tags
            .get("name")
            .or_else(|| self.tags.get("name:en"))
            .cloned();
        let lat = self.lat.or(self.center.as_ref().map(|c| c.lat));
        let lon = self.lon.or(self.center.as_ref().map(|c| c.lon));

        Hospital {
            name,
            lat,
            lon,
            tags: self.tags,
            osm_type: self.element_type,
            osm_id: self.id,
        }
    }
}

/// Parse an Overpass JSON body into at most `limit` hospitals.
pub fn parse_hospitals(body: &str, limit: u32) -> Result<Vec<Hospital>> {
    let response: OverpassResponse =
        serde_json::from_str(body).map_err(|e| Error::InvalidUpstreamPayload(e.to_string()))?;

    Ok(response
        .elements
        .into_iter()
        .take(limit as usize)
        .map(OverpassElement::into_hospital)
        .collect())
}
