use chrono::{DateTime, Utc};
use models::{FieldError, ValidationError, Vehicle};
use serde::{Deserialize, Serialize};

use crate::storage::StoredDocument;

/// Text fields of a create request exactly as received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFields {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
}

impl ListingFields {
    /// Record one form field; returns false for names this form does not know.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "make" => &mut self.make,
            "model" => &mut self.model,
            "year" => &mut self.year,
            "price" => &mut self.price,
            "description" => &mut self.description,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Presence and type checks; range checks happen in `models::validate_listing`.
    pub fn parse(self) -> Result<ListingForm, ValidationError> {
        let mut failures = Vec::new();

        let make = required(&mut failures, "make", self.make);
        let model = required(&mut failures, "model", self.model);
        let year = required(&mut failures, "year", self.year).and_then(|raw| {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| failures.push(FieldError::new("year", "must be an integer")))
                .ok()
        });
        let price = required(&mut failures, "price", self.price).and_then(|raw| {
            raw.trim()
                .parse::<f64>()
                .map_err(|_| failures.push(FieldError::new("price", "must be a number")))
                .ok()
        });

        match (make, model, year, price) {
            (Some(make), Some(model), Some(year), Some(price)) if failures.is_empty() => Ok(ListingForm {
                make,
                model,
                year,
                price,
                description: optional_text(self.description),
            }),
            _ => Err(ValidationError { fields: failures }),
        }
    }
}

/// Browsers always send optional inputs; a blank one means the value was not given.
fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(failures: &mut Vec<FieldError>, field: &'static str, value: Option<String>) -> Option<String> {
    if value.is_none() {
        failures.push(FieldError::new(field, "field required"));
    }
    value
}

/// Typed create request, before range validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingForm {
    pub make: String,
    pub model: String,
    pub year: i64,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Create response: generated id merged with the stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedListing {
    pub id: String,
    #[serde(flatten)]
    pub vehicle: Vehicle,
}

/// One entry of the catalog as sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingView {
    pub id: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i64>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image_urls: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

pub fn serialize_listing(stored: &StoredDocument) -> ListingView {
    let doc = &stored.document;
    ListingView {
        id: stored.id.map(|id| id.to_string()),
        make: doc.make.clone(),
        model: doc.model.clone(),
        year: doc.year,
        price: doc.price,
        description: doc.description.clone(),
        image_urls: doc.image_urls.clone().unwrap_or_default(),
        created_at: doc.created_at,
    }
}
