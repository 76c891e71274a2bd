//! Service layer for the vehicle listing API.
//! - `storage` wraps the document store behind a typed adapter.
//! - `uploads` owns the content directory for listing images.
//! - `listing` orchestrates both for create and list requests.

pub mod errors;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
pub mod storage;
pub mod uploads;
pub mod listing;

pub use errors::ServiceError;
pub use listing::ListingService;
