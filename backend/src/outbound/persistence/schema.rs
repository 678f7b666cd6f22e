//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int4,
        #[max_length = 150]
        username -> Varchar,
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Opaque bearer tokens, one per user.
    auth_tokens (key) {
        #[max_length = 40]
        key -> Varchar,
        user_id -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Vehicle segments (shared reference data).
    segments (id) {
        id -> Int4,
        #[max_length = 100]
        segment_name -> Varchar,
    }
}

diesel::table! {
    /// Vehicle brands (shared reference data).
    brands (id) {
        id -> Int4,
        #[max_length = 100]
        brand_name -> Varchar,
    }
}

diesel::table! {
    /// Catalog vehicles referencing a user, a segment, and a brand.
    vehicles (id) {
        id -> Int4,
        #[max_length = 100]
        vehicle_name -> Varchar,
        release_year -> Int4,
        price -> Numeric,
        user_id -> Int4,
        segment_id -> Int4,
        brand_id -> Int4,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(vehicles -> brands (brand_id));
diesel::joinable!(vehicles -> segments (segment_id));
diesel::joinable!(vehicles -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(auth_tokens, brands, segments, users, vehicles,);
