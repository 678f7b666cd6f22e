//! Port abstractions decoupling the domain from infrastructure.
//!
//! Inbound adapters (HTTP handlers) depend on these traits instead of
//! concrete persistence types, so handler tests can substitute in-memory
//! implementations without wiring a database.

mod brand_repository;
mod segment_repository;
mod token_authenticator;
mod user_repository;
mod vehicle_repository;

pub use self::brand_repository::{BrandPersistenceError, BrandRepository};
pub use self::segment_repository::{SegmentPersistenceError, SegmentRepository};
pub use self::token_authenticator::{TokenAuthenticationError, TokenAuthenticator};
pub use self::user_repository::{UserPersistenceError, UserRepository};
pub use self::vehicle_repository::{VehiclePersistenceError, VehicleRepository};
