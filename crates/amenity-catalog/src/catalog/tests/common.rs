use std::sync::Arc;

use axum::http::{header, Method, Request};
use axum::response::Response;
use serde_json::Value;

use crate::auth::{Authenticator, StaticTokenAuthenticator};
use crate::catalog::domain::{
    Amenity, AmenityCategory, AmenityId, AvailabilityFilter, CategoryId, LocalizedText, UserId,
};
use crate::catalog::memory::InMemoryAmenityStore;
use crate::catalog::repository::{AmenityRepository, NewAmenity, RepositoryError};
use crate::catalog::verification::{VerificationRecord, VerifiedEntity};
use crate::catalog::{amenity_router, AmenityCatalogService};

pub(super) const DEFAULT_CATEGORY: CategoryId = CategoryId(1);
pub(super) const OUTDOOR: CategoryId = CategoryId(2);
pub(super) const INDOOR: CategoryId = CategoryId(3);

pub(super) const RESIDENT_TOKEN: &str = "resident-token";
pub(super) const NEIGHBOR_TOKEN: &str = "neighbor-token";

pub(super) fn resident() -> UserId {
    UserId("resident-1".to_string())
}

pub(super) fn neighbor() -> UserId {
    UserId("resident-2".to_string())
}

pub(super) fn text(en: &str) -> LocalizedText {
    LocalizedText::from_pairs([("en", en)])
}

pub(super) fn category(id: CategoryId, title: &str, order: i32) -> AmenityCategory {
    AmenityCategory {
        id,
        title: text(title),
        order,
    }
}

/// Builds an amenity with the flags spelled out as (active, house, house_space).
pub(super) fn amenity(
    id: u64,
    category: CategoryId,
    title: &str,
    flags: (bool, bool, bool),
) -> Amenity {
    let (is_active, is_available_for_house, is_available_for_house_space) = flags;
    Amenity {
        id: AmenityId(id),
        category,
        title: text(title),
        abbreviation: text(&title[..2].to_ascii_uppercase()),
        is_active,
        is_available_for_house,
        is_available_for_house_space,
    }
}

/// Outdoor (order 10): two listed amenities plus the resident's pending one.
/// Indoor (order 20): one listed amenity plus one inactive amenity.
/// Other (default, order 100): only the neighbor's pending submission.
pub(super) fn seeded_store() -> InMemoryAmenityStore {
    let store = InMemoryAmenityStore::default();
    for category in [
        category(DEFAULT_CATEGORY, "Other", 100),
        category(OUTDOOR, "Outdoor", 10),
        category(INDOOR, "Indoor", 20),
    ] {
        store.insert_category(category).expect("category stored");
    }

    for amenity in [
        amenity(1, OUTDOOR, "Pool", (true, true, false)),
        amenity(2, OUTDOOR, "Garden", (true, true, true)),
        amenity(3, OUTDOOR, "Hammock", (false, false, false)),
        amenity(4, INDOOR, "Gym", (true, false, true)),
        amenity(5, INDOOR, "Sauna", (false, true, true)),
        amenity(6, DEFAULT_CATEGORY, "Bike rack", (false, false, false)),
    ] {
        store.insert_amenity(amenity).expect("amenity stored");
    }

    store
        .record_verification(resident(), VerifiedEntity::Amenity(AmenityId(3)))
        .expect("ledger write");
    store
        .record_verification(neighbor(), VerifiedEntity::Amenity(AmenityId(6)))
        .expect("ledger write");
    store
}

pub(super) fn build_service() -> (
    AmenityCatalogService<InMemoryAmenityStore>,
    Arc<InMemoryAmenityStore>,
) {
    let store = Arc::new(seeded_store());
    let service = AmenityCatalogService::new(store.clone(), DEFAULT_CATEGORY);
    (service, store)
}

pub(super) fn authenticator() -> Arc<dyn Authenticator> {
    Arc::new(StaticTokenAuthenticator::new([
        (RESIDENT_TOKEN.to_string(), resident()),
        (NEIGHBOR_TOKEN.to_string(), neighbor()),
    ]))
}

pub(super) fn router_with_service<R>(service: AmenityCatalogService<R>) -> axum::Router
where
    R: AmenityRepository + 'static,
{
    amenity_router(Arc::new(service), authenticator())
}

pub(super) fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<axum::body::Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            axum::body::Body::from(serde_json::to_vec(&body).expect("serializable body"))
        }
        None => axum::body::Body::empty(),
    };
    builder.body(body).expect("valid request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn group_titles(groups: &Value) -> Vec<String> {
    groups
        .as_array()
        .expect("array of groups")
        .iter()
        .map(|group| group["category"]["en"].as_str().unwrap_or_default().to_string())
        .collect()
}

pub(super) fn amenity_titles(group: &Value) -> Vec<String> {
    group["amenities"]
        .as_array()
        .expect("array of amenities")
        .iter()
        .map(|amenity| amenity["title"]["en"].as_str().unwrap_or_default().to_string())
        .collect()
}

pub(super) struct UnavailableRepository;

impl AmenityRepository for UnavailableRepository {
    fn categories(&self) -> Result<Vec<AmenityCategory>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn listed_amenities(
        &self,
        _filter: AvailabilityFilter,
    ) -> Result<Vec<Amenity>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn amenities_by_id(&self, _ids: &[AmenityId]) -> Result<Vec<Amenity>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn verifications_for(
        &self,
        _user: &UserId,
    ) -> Result<Vec<VerificationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn submit(
        &self,
        _submissions: Vec<NewAmenity>,
        _submitter: &UserId,
    ) -> Result<Vec<Amenity>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
