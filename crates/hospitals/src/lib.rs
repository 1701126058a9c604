//! Hospital lookup for Algerian wilayas.
//!
//! Resolves a wilaya code to its bounding box, builds an Overpass QL query,
//! hands it to the upstream orchestrator and normalizes the returned
//! elements. Successful responses are memoized per `(wilaya, limit)`.

pub mod errors;
pub mod hospitals;
pub mod regions;

pub use errors::{Error, Result, ValidationError};
pub use hospitals::{
    cache_key, clamp_limit, parse_limit, Hospital, HospitalService, HospitalServiceTrait,
    HospitalsResponse, OverpassConfig, DEFAULT_LIMIT, DEFAULT_OVERPASS_ENDPOINTS, MAX_LIMIT,
};
pub use regions::{lookup_wilaya, BoundingBox, Wilaya};
