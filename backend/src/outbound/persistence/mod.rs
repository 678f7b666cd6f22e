//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via Diesel with async support through `diesel-async` and `bb8`
//! connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel rows and domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and schema definitions
//!   (`schema.rs`) are implementation details, never exposed to the domain.
//! - **Strongly typed errors**: database failures map onto the per-port
//!   persistence error types.

mod diesel_brand_repository;
mod diesel_segment_repository;
mod diesel_token_authenticator;
mod diesel_user_repository;
mod diesel_vehicle_repository;
mod models;
mod password;
mod pool;
pub(crate) mod schema;

pub use diesel_brand_repository::DieselBrandRepository;
pub use diesel_segment_repository::DieselSegmentRepository;
pub use diesel_token_authenticator::DieselTokenAuthenticator;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_vehicle_repository::DieselVehicleRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
