//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{auth_tokens, brands, segments, users, vehicles};

/// Row struct for reading account rows, without the credential hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new account rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

/// Insertable struct for creating new token rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = auth_tokens)]
pub(crate) struct NewAuthTokenRow<'a> {
    pub key: &'a str,
    pub user_id: i32,
}

/// Row struct for reading from the segments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = segments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SegmentRow {
    pub id: i32,
    pub segment_name: String,
}

/// Insertable struct for creating new segment rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = segments)]
pub(crate) struct NewSegmentRow<'a> {
    pub segment_name: &'a str,
}

/// Changeset struct for updating existing segment rows.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = segments)]
pub(crate) struct SegmentChangeset<'a> {
    pub segment_name: &'a str,
}

/// Row struct for reading from the brands table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = brands)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BrandRow {
    pub id: i32,
    pub brand_name: String,
}

/// Insertable struct for creating new brand rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = brands)]
pub(crate) struct NewBrandRow<'a> {
    pub brand_name: &'a str,
}

/// Changeset struct for updating existing brand rows.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = brands)]
pub(crate) struct BrandChangeset<'a> {
    pub brand_name: &'a str,
}

/// Row struct for reading from the vehicles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vehicles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VehicleRow {
    pub id: i32,
    pub vehicle_name: String,
    pub release_year: i32,
    pub price: BigDecimal,
    pub user_id: i32,
    pub segment_id: i32,
    pub brand_id: i32,
}

/// Insertable struct for creating new vehicle rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vehicles)]
pub(crate) struct NewVehicleRow<'a> {
    pub vehicle_name: &'a str,
    pub release_year: i32,
    pub price: &'a BigDecimal,
    pub user_id: i32,
    pub segment_id: i32,
    pub brand_id: i32,
}

/// Changeset struct for updating existing vehicle rows.
///
/// The `user_id` column is deliberately absent: ownership never changes on
/// update.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = vehicles)]
pub(crate) struct VehicleChangeset<'a> {
    pub vehicle_name: &'a str,
    pub release_year: i32,
    pub price: &'a BigDecimal,
    pub segment_id: i32,
    pub brand_id: i32,
}
