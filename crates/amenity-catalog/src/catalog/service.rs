use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use super::domain::{Amenity, AvailabilityFilter, CategoryGroup, CategoryId, UserId};
use super::hierarchy;
use super::repository::{AmenityRepository, NewAmenity, RepositoryError};
use super::validation::{self, ValidationError};
use super::visibility;

/// Service composing the catalog repository, validation, and hierarchy assembly.
pub struct AmenityCatalogService<R> {
    repository: Arc<R>,
    default_category: CategoryId,
}

impl<R> AmenityCatalogService<R>
where
    R: AmenityRepository + 'static,
{
    /// `default_category` receives every user-submitted amenity.
    pub fn new(repository: Arc<R>, default_category: CategoryId) -> Self {
        Self {
            repository,
            default_category,
        }
    }

    pub fn default_category(&self) -> CategoryId {
        self.default_category
    }

    /// Amenities visible to `user`, grouped by category.
    pub fn list(
        &self,
        user: &UserId,
        filter: AvailabilityFilter,
    ) -> Result<Vec<CategoryGroup>, CatalogServiceError> {
        let visible = visibility::visible_amenities(self.repository.as_ref(), user, filter)?;
        debug!(%user, filter = filter.label(), visible = visible.len(), "listing amenities");
        Ok(hierarchy::assemble(visible))
    }

    /// Validate and store one user submission.
    pub fn create(&self, user: &UserId, payload: &Value) -> Result<Amenity, CatalogServiceError> {
        let draft = validation::validate_draft(payload)?;
        let submission = NewAmenity::submission(draft, self.default_category);
        let mut created = self.repository.submit(vec![submission], user)?;
        let amenity = created
            .pop()
            .ok_or_else(|| RepositoryError::Unavailable("store returned no amenity".to_string()))?;

        info!(%user, amenity_id = amenity.id.0, "amenity submitted for verification");
        Ok(amenity)
    }

    /// Validate every item, then store all of them in one atomic write.
    pub fn batch_create(
        &self,
        user: &UserId,
        payload: &Value,
    ) -> Result<Vec<Amenity>, CatalogServiceError> {
        let drafts = validation::validate_batch(payload)?;
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let submissions = drafts
            .into_iter()
            .map(|draft| NewAmenity::submission(draft, self.default_category))
            .collect();
        let created = self.repository.submit(submissions, user)?;

        info!(%user, count = created.len(), "amenity batch submitted for verification");
        Ok(created)
    }
}

/// Error raised by the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
