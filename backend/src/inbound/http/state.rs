//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BrandRepository, SegmentRepository, TokenAuthenticator, UserRepository, VehicleRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenAuthenticator>,
    pub segments: Arc<dyn SegmentRepository>,
    pub brands: Arc<dyn BrandRepository>,
    pub vehicles: Arc<dyn VehicleRepository>,
}
