//! Wilaya (province) lookup.
//!
//! Maps the 58 wilaya codes to fixed bounding boxes. Codes are accepted
//! with or without the leading zero (`"1"` and `"01"` are the same wilaya).

mod wilayas;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use wilayas::WILAYAS;

/// Geographic bounding box in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    fn from_array([south, west, north, east]: [f64; 4]) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }
}

/// A resolved wilaya.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wilaya {
    /// Two-digit code, e.g. `"16"`.
    pub code: &'static str,
    pub bounding_box: BoundingBox,
}

/// Left-pad a requested code to two digits.
fn normalize_code(raw: &str) -> String {
    format!("{:0>2}", raw.trim())
}

/// Resolve a wilaya code.
///
/// ```
/// use hospitals::lookup_wilaya;
///
/// assert_eq!(lookup_wilaya("9").unwrap().code, "09");
/// assert!(lookup_wilaya("59").is_err());
/// ```
pub fn lookup_wilaya(raw: &str) -> Result<Wilaya, ValidationError> {
    let code = normalize_code(raw);
    WILAYAS
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|&(code, bbox)| Wilaya {
            code,
            bounding_box: BoundingBox::from_array(bbox),
        })
        .ok_or(ValidationError::UnknownWilaya(raw.to_string()))
}
