//! Listing orchestration: image persistence, validation, storage and response shaping.

pub mod domain;
pub mod service;

pub use domain::{serialize_listing, CreatedListing, ListingFields, ListingForm, ListingView};
pub use service::ListingService;
