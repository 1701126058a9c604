pub mod hospitals_model;
pub mod hospitals_service;
pub mod hospitals_traits;
pub mod overpass;

pub use hospitals_model::{Hospital, HospitalsResponse};
pub use hospitals_service::{cache_key, HospitalService};
pub use hospitals_traits::HospitalServiceTrait;
pub use overpass::{
    clamp_limit, parse_limit, OverpassConfig, DEFAULT_LIMIT, DEFAULT_OVERPASS_ENDPOINTS, MAX_LIMIT,
};
