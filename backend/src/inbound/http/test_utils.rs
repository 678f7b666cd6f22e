//! In-memory port implementations and request helpers for handler tests.
//!
//! The store mirrors the persistence contract (duplicate-username
//! rejection, reference resolution, get-or-create tokens, and cascade
//! deletes) so handler tests exercise the full HTTP surface without a
//! database.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use crate::domain::ports::{
    BrandPersistenceError, BrandRepository, SegmentPersistenceError, SegmentRepository,
    TokenAuthenticationError, TokenAuthenticator, UserPersistenceError, UserRepository,
    VehiclePersistenceError, VehicleRepository,
};
use crate::domain::{
    AuthToken, Brand, BrandDraft, LoginCredentials, Price, Registration, Segment, SegmentDraft,
    User, Username, VehicleDraft, VehicleRecord,
};
use crate::inbound::http::health::HealthState;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Clone)]
struct StoredUser {
    id: i32,
    username: String,
    password: String,
}

#[derive(Debug, Clone)]
struct StoredToken {
    key: String,
    user_id: i32,
}

#[derive(Debug, Clone)]
struct StoredVehicle {
    id: i32,
    vehicle_name: String,
    release_year: i32,
    price: Price,
    owner: i32,
    segment: i32,
    brand: i32,
}

#[derive(Debug, Default)]
struct InMemoryInner {
    users: Vec<StoredUser>,
    tokens: Vec<StoredToken>,
    segments: Vec<(i32, String)>,
    brands: Vec<(i32, String)>,
    vehicles: Vec<StoredVehicle>,
    next_id: i32,
}

impl InMemoryInner {
    fn allocate_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn vehicle_record(&self, vehicle: &StoredVehicle) -> VehicleRecord {
        let segment_name = self
            .segments
            .iter()
            .find(|(id, _)| *id == vehicle.segment)
            .map(|(_, name)| name.clone())
            .unwrap_or_default();
        let brand_name = self
            .brands
            .iter()
            .find(|(id, _)| *id == vehicle.brand)
            .map(|(_, name)| name.clone())
            .unwrap_or_default();
        VehicleRecord {
            id: vehicle.id,
            vehicle_name: vehicle.vehicle_name.clone(),
            release_year: vehicle.release_year,
            price: vehicle.price.clone(),
            segment: vehicle.segment,
            brand: vehicle.brand,
            segment_name,
            brand_name,
            owner: vehicle.owner,
        }
    }
}

/// Deterministic in-memory implementation of every persistence port.
#[derive(Debug, Default)]
pub(crate) struct InMemoryStore {
    inner: Mutex<InMemoryInner>,
}

impl InMemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryInner> {
        self.inner.lock().expect("store lock poisoned")
    }

    /// Count of vehicles currently referencing the given segment.
    pub(crate) fn vehicles_referencing_segment(&self, segment: i32) -> usize {
        self.lock()
            .vehicles
            .iter()
            .filter(|vehicle| vehicle.segment == segment)
            .count()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, registration: &Registration) -> Result<User, UserPersistenceError> {
        let mut inner = self.lock();
        let username = registration.username().as_ref().to_owned();
        if inner.users.iter().any(|user| user.username == username) {
            return Err(UserPersistenceError::DuplicateUsername);
        }
        let id = inner.allocate_id();
        inner.users.push(StoredUser {
            id,
            username: username.clone(),
            password: registration.password().to_owned(),
        });
        let username = Username::new(username)
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        Ok(User::new(id, username))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, UserPersistenceError> {
        let inner = self.lock();
        inner
            .users
            .iter()
            .find(|user| user.id == id)
            .map(|user| {
                Username::new(&user.username)
                    .map(|username| User::new(user.id, username))
                    .map_err(|err| UserPersistenceError::query(err.to_string()))
            })
            .transpose()
    }

    async fn delete(&self, id: i32) -> Result<bool, UserPersistenceError> {
        let mut inner = self.lock();
        let before = inner.users.len();
        inner.users.retain(|user| user.id != id);
        if inner.users.len() == before {
            return Ok(false);
        }
        inner.tokens.retain(|token| token.user_id != id);
        inner.vehicles.retain(|vehicle| vehicle.owner != id);
        Ok(true)
    }
}

#[async_trait]
impl TokenAuthenticator for InMemoryStore {
    async fn issue(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthToken, TokenAuthenticationError> {
        let mut inner = self.lock();
        let user_id = inner
            .users
            .iter()
            .find(|user| {
                user.username == credentials.username() && user.password == credentials.password()
            })
            .map(|user| user.id)
            .ok_or(TokenAuthenticationError::InvalidCredentials)?;

        if let Some(token) = inner.tokens.iter().find(|token| token.user_id == user_id) {
            return Ok(AuthToken::new(token.key.clone()));
        }
        let serial = inner.allocate_id();
        let key = format!("{serial:040x}");
        inner.tokens.push(StoredToken {
            key: key.clone(),
            user_id,
        });
        Ok(AuthToken::new(key))
    }

    async fn resolve(&self, key: &str) -> Result<Option<i32>, TokenAuthenticationError> {
        let inner = self.lock();
        Ok(inner
            .tokens
            .iter()
            .find(|token| token.key == key)
            .map(|token| token.user_id))
    }
}

#[async_trait]
impl SegmentRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Segment>, SegmentPersistenceError> {
        let inner = self.lock();
        let mut rows = inner.segments.clone();
        rows.sort_by_key(|(id, _)| *id);
        Ok(rows
            .into_iter()
            .map(|(id, name)| Segment::new(id, name))
            .collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Segment>, SegmentPersistenceError> {
        let inner = self.lock();
        Ok(inner
            .segments
            .iter()
            .find(|(segment_id, _)| *segment_id == id)
            .map(|(segment_id, name)| Segment::new(*segment_id, name.clone())))
    }

    async fn insert(&self, draft: &SegmentDraft) -> Result<Segment, SegmentPersistenceError> {
        let mut inner = self.lock();
        let id = inner.allocate_id();
        inner.segments.push((id, draft.segment_name().to_owned()));
        Ok(Segment::new(id, draft.segment_name()))
    }

    async fn update(
        &self,
        id: i32,
        draft: &SegmentDraft,
    ) -> Result<Option<Segment>, SegmentPersistenceError> {
        let mut inner = self.lock();
        match inner
            .segments
            .iter_mut()
            .find(|(segment_id, _)| *segment_id == id)
        {
            Some((_, name)) => {
                *name = draft.segment_name().to_owned();
                Ok(Some(Segment::new(id, draft.segment_name())))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, SegmentPersistenceError> {
        let mut inner = self.lock();
        let before = inner.segments.len();
        inner.segments.retain(|(segment_id, _)| *segment_id != id);
        if inner.segments.len() == before {
            return Ok(false);
        }
        inner.vehicles.retain(|vehicle| vehicle.segment != id);
        Ok(true)
    }
}

#[async_trait]
impl BrandRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Brand>, BrandPersistenceError> {
        let inner = self.lock();
        let mut rows = inner.brands.clone();
        rows.sort_by_key(|(id, _)| *id);
        Ok(rows
            .into_iter()
            .map(|(id, name)| Brand::new(id, name))
            .collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Brand>, BrandPersistenceError> {
        let inner = self.lock();
        Ok(inner
            .brands
            .iter()
            .find(|(brand_id, _)| *brand_id == id)
            .map(|(brand_id, name)| Brand::new(*brand_id, name.clone())))
    }

    async fn insert(&self, draft: &BrandDraft) -> Result<Brand, BrandPersistenceError> {
        let mut inner = self.lock();
        let id = inner.allocate_id();
        inner.brands.push((id, draft.brand_name().to_owned()));
        Ok(Brand::new(id, draft.brand_name()))
    }

    async fn update(
        &self,
        id: i32,
        draft: &BrandDraft,
    ) -> Result<Option<Brand>, BrandPersistenceError> {
        let mut inner = self.lock();
        match inner
            .brands
            .iter_mut()
            .find(|(brand_id, _)| *brand_id == id)
        {
            Some((_, name)) => {
                *name = draft.brand_name().to_owned();
                Ok(Some(Brand::new(id, draft.brand_name())))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, BrandPersistenceError> {
        let mut inner = self.lock();
        let before = inner.brands.len();
        inner.brands.retain(|(brand_id, _)| *brand_id != id);
        if inner.brands.len() == before {
            return Ok(false);
        }
        inner.vehicles.retain(|vehicle| vehicle.brand != id);
        Ok(true)
    }
}

#[async_trait]
impl VehicleRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<VehicleRecord>, VehiclePersistenceError> {
        let inner = self.lock();
        let mut vehicles = inner.vehicles.clone();
        vehicles.sort_by_key(|vehicle| vehicle.id);
        Ok(vehicles
            .iter()
            .map(|vehicle| inner.vehicle_record(vehicle))
            .collect())
    }

    async fn find(&self, id: i32) -> Result<Option<VehicleRecord>, VehiclePersistenceError> {
        let inner = self.lock();
        Ok(inner
            .vehicles
            .iter()
            .find(|vehicle| vehicle.id == id)
            .map(|vehicle| inner.vehicle_record(vehicle)))
    }

    async fn insert(
        &self,
        owner: i32,
        draft: &VehicleDraft,
    ) -> Result<VehicleRecord, VehiclePersistenceError> {
        let mut inner = self.lock();
        if !inner.segments.iter().any(|(id, _)| *id == draft.segment()) {
            return Err(VehiclePersistenceError::SegmentNotFound);
        }
        if !inner.brands.iter().any(|(id, _)| *id == draft.brand()) {
            return Err(VehiclePersistenceError::BrandNotFound);
        }
        let id = inner.allocate_id();
        let vehicle = StoredVehicle {
            id,
            vehicle_name: draft.vehicle_name().to_owned(),
            release_year: draft.release_year(),
            price: draft.price().clone(),
            owner,
            segment: draft.segment(),
            brand: draft.brand(),
        };
        let record = inner.vehicle_record(&vehicle);
        inner.vehicles.push(vehicle);
        Ok(record)
    }

    async fn update(
        &self,
        id: i32,
        draft: &VehicleDraft,
    ) -> Result<Option<VehicleRecord>, VehiclePersistenceError> {
        let mut inner = self.lock();
        if !inner.segments.iter().any(|(sid, _)| *sid == draft.segment()) {
            return Err(VehiclePersistenceError::SegmentNotFound);
        }
        if !inner.brands.iter().any(|(bid, _)| *bid == draft.brand()) {
            return Err(VehiclePersistenceError::BrandNotFound);
        }
        let Some(index) = inner.vehicles.iter().position(|vehicle| vehicle.id == id) else {
            return Ok(None);
        };
        let owner = inner.vehicles[index].owner;
        let vehicle = StoredVehicle {
            id,
            vehicle_name: draft.vehicle_name().to_owned(),
            release_year: draft.release_year(),
            price: draft.price().clone(),
            owner,
            segment: draft.segment(),
            brand: draft.brand(),
        };
        let record = inner.vehicle_record(&vehicle);
        inner.vehicles[index] = vehicle;
        Ok(Some(record))
    }

    async fn delete(&self, id: i32) -> Result<bool, VehiclePersistenceError> {
        let mut inner = self.lock();
        let before = inner.vehicles.len();
        inner.vehicles.retain(|vehicle| vehicle.id != id);
        Ok(inner.vehicles.len() != before)
    }
}

/// Handler state backed by a fresh in-memory store.
pub(crate) fn test_state() -> (Arc<InMemoryStore>, web::Data<HttpState>) {
    let store = Arc::new(InMemoryStore::default());
    let state = HttpState {
        users: store.clone(),
        tokens: store.clone(),
        segments: store.clone(),
        brands: store.clone(),
        vehicles: store.clone(),
    };
    (store, web::Data::new(state))
}

/// Full application wired against the in-memory store.
pub(crate) fn test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let (_, state) = test_state();
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    crate::server::app(state, health)
}

/// Register an account and return its bearer token.
pub(crate) async fn obtain_token_for<S, B>(app: &S, username: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: Debug,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/create/")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "registration failed");

    let request = actix_test::TestRequest::post()
        .uri("/api/auth/")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "token login failed");
    let body: Value = actix_test::read_body_json(response).await;
    body.get("token")
        .and_then(Value::as_str)
        .expect("token field")
        .to_owned()
}

/// Create a segment through the API and return its id.
pub(crate) async fn create_segment<S, B>(app: &S, token: &str, name: &str) -> i32
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: Debug,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/segments/")
        .insert_header(("Authorization", format!("Token {token}")))
        .set_json(json!({ "segment_name": name }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "segment creation failed");
    let body: Value = actix_test::read_body_json(response).await;
    i32::try_from(body.get("id").and_then(Value::as_i64).expect("segment id"))
        .expect("segment id fits i32")
}

/// Create a brand through the API and return its id.
pub(crate) async fn create_brand<S, B>(app: &S, token: &str, name: &str) -> i32
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: Debug,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/brands/")
        .insert_header(("Authorization", format!("Token {token}")))
        .set_json(json!({ "brand_name": name }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "brand creation failed");
    let body: Value = actix_test::read_body_json(response).await;
    i32::try_from(body.get("id").and_then(Value::as_i64).expect("brand id"))
        .expect("brand id fits i32")
}

/// Create a vehicle through the API and return its id.
pub(crate) async fn create_vehicle<S, B>(
    app: &S,
    token: &str,
    name: &str,
    segment: i32,
    brand: i32,
) -> i32
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: Debug,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/vehicles/")
        .insert_header(("Authorization", format!("Token {token}")))
        .set_json(json!({
            "vehicle_name": name,
            "release_year": 2019,
            "price": 500.00,
            "segment": segment,
            "brand": brand,
        }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "vehicle creation failed");
    let body: Value = actix_test::read_body_json(response).await;
    i32::try_from(body.get("id").and_then(Value::as_i64).expect("vehicle id"))
        .expect("vehicle id fits i32")
}

#[cfg(test)]
mod tests {
    //! Contract coverage for the in-memory store itself.
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;

    fn vehicle_draft(segment: i32, brand: i32) -> VehicleDraft {
        VehicleDraft::new(
            "MODEL S",
            2019,
            BigDecimal::from_str("500.12").expect("test decimal"),
            segment,
            brand,
        )
        .expect("valid draft")
    }

    #[tokio::test]
    async fn deleting_a_user_cascades_to_owned_vehicles() {
        let store = InMemoryStore::default();
        let registration =
            Registration::try_from_parts("dummy", "dummy_pw").expect("valid registration");
        let user = store.create(&registration).await.expect("user created");
        let segment = SegmentRepository::insert(
            &store,
            &SegmentDraft::new("Sedan").expect("valid draft"),
        )
        .await
        .expect("segment created");
        let brand = BrandRepository::insert(
            &store,
            &BrandDraft::new("Tesla").expect("valid draft"),
        )
        .await
        .expect("brand created");
        let _ = VehicleRepository::insert(
            &store,
            user.id(),
            &vehicle_draft(segment.id(), brand.id()),
        )
        .await
        .expect("vehicle created");

        let deleted = UserRepository::delete(&store, user.id())
            .await
            .expect("user delete succeeds");
        assert!(deleted);
        assert_eq!(store.vehicles_referencing_segment(segment.id()), 0);
        assert!(
            VehicleRepository::list(&store)
                .await
                .expect("vehicle list")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn segment_cascade_counts_are_observable() {
        let store = InMemoryStore::default();
        let registration =
            Registration::try_from_parts("dummy", "dummy_pw").expect("valid registration");
        let user = store.create(&registration).await.expect("user created");
        let segment = SegmentRepository::insert(
            &store,
            &SegmentDraft::new("Sedan").expect("valid draft"),
        )
        .await
        .expect("segment created");
        let brand = BrandRepository::insert(
            &store,
            &BrandDraft::new("Tesla").expect("valid draft"),
        )
        .await
        .expect("brand created");
        for _ in 0..3 {
            let _ = VehicleRepository::insert(
                &store,
                user.id(),
                &vehicle_draft(segment.id(), brand.id()),
            )
            .await
            .expect("vehicle created");
        }
        assert_eq!(store.vehicles_referencing_segment(segment.id()), 3);

        let deleted = SegmentRepository::delete(&store, segment.id())
            .await
            .expect("segment delete succeeds");
        assert!(deleted);
        assert_eq!(store.vehicles_referencing_segment(segment.id()), 0);
    }
}
