//! Listing record for vehicles offered for sale.
//!
//! `validate_listing` is the only path from raw field values to a `Vehicle`
//! that the service layer persists.

use serde::{Deserialize, Serialize};

use crate::errors::{FieldError, ValidationError};

/// Earliest accepted model year (inclusive).
pub const MIN_YEAR: i64 = 1900;
/// Latest accepted model year (inclusive).
pub const MAX_YEAR: i64 = 2100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    /// Public paths of uploaded images, in upload order.
    #[serde(default)]
    pub image_urls: Vec<String>,
}

pub fn validate_required_text(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, "must not be empty"));
    }
    Ok(())
}

pub fn validate_year(year: i64) -> Result<i32, FieldError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(FieldError::new(
            "year",
            format!("must be between {MIN_YEAR} and {MAX_YEAR}"),
        ));
    }
    // range check above keeps this lossless
    Ok(year as i32)
}

pub fn validate_price(price: f64) -> Result<f64, FieldError> {
    if !price.is_finite() {
        return Err(FieldError::new("price", "must be a finite number"));
    }
    if price < 0.0 {
        return Err(FieldError::new("price", "must be greater than or equal to 0"));
    }
    Ok(price)
}

/// Check every field and build the record, or report all failures at once.
pub fn validate_listing(
    make: &str,
    model: &str,
    year: i64,
    price: f64,
    description: Option<&str>,
    image_urls: Vec<String>,
) -> Result<Vehicle, ValidationError> {
    let mut failures = Vec::new();

    if let Err(e) = validate_required_text("make", make) {
        failures.push(e);
    }
    if let Err(e) = validate_required_text("model", model) {
        failures.push(e);
    }
    let year = validate_year(year).map_err(|e| failures.push(e)).ok();
    let price = validate_price(price).map_err(|e| failures.push(e)).ok();

    match (year, price) {
        (Some(year), Some(price)) if failures.is_empty() => Ok(Vehicle {
            make: make.to_string(),
            model: model.to_string(),
            year,
            price,
            description: description.map(str::to_string),
            image_urls,
        }),
        _ => Err(ValidationError { fields: failures }),
    }
}
