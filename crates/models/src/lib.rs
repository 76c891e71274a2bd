pub mod errors;
pub mod db;
pub mod vehicle;
pub mod document;

pub use errors::{FieldError, ModelError, ValidationError};
pub use vehicle::{validate_listing, Vehicle, MAX_YEAR, MIN_YEAR};
