//! Vehicle entity: a catalog entry owned by a user, tagged with one segment
//! and one brand.

use bigdecimal::BigDecimal;
use serde::Serialize;

use super::price::Price;
use super::validation::validate_name;
use super::CatalogValidationError;

/// Validated write payload for creating or replacing a vehicle.
///
/// The owning user is deliberately absent: handlers inject it from the
/// authenticated identity, never from the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleDraft {
    vehicle_name: String,
    release_year: i32,
    price: Price,
    segment: i32,
    brand: i32,
}

impl VehicleDraft {
    /// Validate and construct a draft from raw payload values.
    ///
    /// The segment and brand references are only checked for presence here;
    /// resolution against existing rows happens in the persistence layer.
    pub fn new(
        vehicle_name: &str,
        release_year: i32,
        price: BigDecimal,
        segment: i32,
        brand: i32,
    ) -> Result<Self, CatalogValidationError> {
        Ok(Self {
            vehicle_name: validate_name(vehicle_name, "vehicle_name")?,
            release_year,
            price: Price::new(price)?,
            segment,
            brand,
        })
    }

    pub fn vehicle_name(&self) -> &str {
        self.vehicle_name.as_str()
    }

    pub fn release_year(&self) -> i32 {
        self.release_year
    }

    pub fn price(&self) -> &Price {
        &self.price
    }

    pub fn segment(&self) -> i32 {
        self.segment
    }

    pub fn brand(&self) -> i32 {
        self.brand
    }
}

/// Persisted vehicle row with denormalized segment and brand names.
///
/// `segment_name` and `brand_name` are read-only display fields that save
/// clients a lookup; the numeric references stay authoritative. The owner is
/// tracked for cascade semantics but never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleRecord {
    pub id: i32,
    pub vehicle_name: String,
    pub release_year: i32,
    pub price: Price,
    pub segment: i32,
    pub brand: i32,
    pub segment_name: String,
    pub brand_name: String,
    #[serde(skip)]
    pub owner: i32,
}
