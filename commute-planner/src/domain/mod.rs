//! Normalized domain types for the commute planner.
//!
//! Every value here originates from a provider adapter's normalization
//! step. Backends disagree on field names, orderings, and encodings
//! (lat/lon vs lat/lng, numbers vs numeric strings); none of that
//! survives past the adapter boundary.

mod coordinates;
mod route;

pub use coordinates::{Coordinates, InvalidCoordinates};
pub use route::RouteInfo;
