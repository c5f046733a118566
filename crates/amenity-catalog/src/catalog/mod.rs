//! Amenity catalog: per-user visibility, category hierarchy, and verified
//! submissions.

pub mod domain;
pub mod hierarchy;
pub mod memory;
pub mod repository;
pub mod router;
pub mod seed;
pub mod service;
pub mod validation;
pub mod verification;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use domain::{
    Amenity, AmenityCategory, AmenityDraft, AmenityId, AmenityView, AvailabilityFilter,
    CategoryGroup, CategoryId, LocalizedText, UserId,
};
pub use memory::InMemoryAmenityStore;
pub use repository::{AmenityRepository, NewAmenity, RepositoryError};
pub use router::amenity_router;
pub use seed::{CatalogSeed, SeedError};
pub use service::{AmenityCatalogService, CatalogServiceError};
pub use validation::{FieldError, ValidationError};
pub use verification::{VerificationId, VerificationRecord, VerifiedEntity};
pub use visibility::{visible_amenities, CategorizedAmenity};
