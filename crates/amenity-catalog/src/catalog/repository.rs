use super::domain::{
    Amenity, AmenityCategory, AmenityDraft, AmenityId, AvailabilityFilter, CategoryId,
    LocalizedText, UserId,
};
use super::verification::VerificationRecord;

/// Amenity row awaiting an identifier from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAmenity {
    pub category: CategoryId,
    pub title: LocalizedText,
    pub abbreviation: LocalizedText,
    pub is_active: bool,
    pub is_available_for_house: bool,
    pub is_available_for_house_space: bool,
}

impl NewAmenity {
    /// User submissions start inactive and unavailable everywhere.
    pub fn submission(draft: AmenityDraft, category: CategoryId) -> Self {
        Self {
            category,
            title: draft.title,
            abbreviation: draft.abbreviation,
            is_active: false,
            is_available_for_house: false,
            is_available_for_house_space: false,
        }
    }

    pub fn with_id(self, id: AmenityId) -> Amenity {
        Amenity {
            id,
            category: self.category,
            title: self.title,
            abbreviation: self.abbreviation,
            is_active: self.is_active,
            is_available_for_house: self.is_available_for_house,
            is_available_for_house_space: self.is_available_for_house_space,
        }
    }
}

/// Storage abstraction over the amenity catalog and the verification ledger.
pub trait AmenityRepository: Send + Sync {
    fn categories(&self) -> Result<Vec<AmenityCategory>, RepositoryError>;

    /// Active amenities passing `filter`.
    fn listed_amenities(&self, filter: AvailabilityFilter)
        -> Result<Vec<Amenity>, RepositoryError>;

    /// Amenities with the given ids, regardless of flags. Unknown ids are skipped.
    fn amenities_by_id(&self, ids: &[AmenityId]) -> Result<Vec<Amenity>, RepositoryError>;

    /// Ledger entries owned by `user`.
    fn verifications_for(&self, user: &UserId)
        -> Result<Vec<VerificationRecord>, RepositoryError>;

    /// Persist every amenity plus one verification record per amenity for
    /// `submitter` in a single atomic write. On error nothing is stored.
    /// Returned amenities keep the input order.
    fn submit(
        &self,
        submissions: Vec<NewAmenity>,
        submitter: &UserId,
    ) -> Result<Vec<Amenity>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("amenity category {0:?} does not exist")]
    UnknownCategory(CategoryId),
    #[error("amenity {amenity:?} references missing category {category:?}")]
    DanglingCategory {
        amenity: AmenityId,
        category: CategoryId,
    },
    #[error("amenity {0:?} already exists")]
    DuplicateAmenity(AmenityId),
    #[error("amenity {0:?} already has a verification record")]
    AlreadyVerified(AmenityId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
