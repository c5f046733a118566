use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use super::domain::{Amenity, AmenityCategory, AmenityId, CategoryId, LocalizedText, UserId};
use super::memory::InMemoryAmenityStore;
use super::repository::RepositoryError;
use super::verification::VerifiedEntity;

/// Snapshot of catalog rows used to bootstrap the in-process store.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSeed {
    #[serde(default)]
    pub categories: Vec<AmenityCategory>,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    #[serde(default)]
    pub verifications: Vec<SeedVerification>,
}

/// Pending submission carried over from an earlier deployment.
#[derive(Debug, Deserialize)]
pub struct SeedVerification {
    pub user: UserId,
    pub amenity: AmenityId,
}

#[derive(Debug)]
pub enum SeedError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Repository(RepositoryError),
    UnknownAmenity(AmenityId),
    DuplicateAmenity(AmenityId),
    DuplicateVerification(AmenityId),
    MissingDefaultCategory(CategoryId),
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedError::Io(err) => write!(f, "failed to read catalog seed: {}", err),
            SeedError::Json(err) => write!(f, "invalid catalog seed data: {}", err),
            SeedError::Repository(err) => write!(f, "could not load catalog seed: {}", err),
            SeedError::UnknownAmenity(id) => {
                write!(f, "seed verification references unknown amenity {}", id.0)
            }
            SeedError::DuplicateAmenity(id) => {
                write!(f, "seed lists amenity {} more than once", id.0)
            }
            SeedError::DuplicateVerification(id) => {
                write!(f, "seed lists more than one verification for amenity {}", id.0)
            }
            SeedError::MissingDefaultCategory(id) => write!(
                f,
                "default amenity category {} is not present in the catalog",
                id.0
            ),
        }
    }
}

impl std::error::Error for SeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SeedError::Io(err) => Some(err),
            SeedError::Json(err) => Some(err),
            SeedError::Repository(err) => Some(err),
            SeedError::UnknownAmenity(_)
            | SeedError::DuplicateAmenity(_)
            | SeedError::DuplicateVerification(_)
            | SeedError::MissingDefaultCategory(_) => None,
        }
    }
}

impl From<std::io::Error> for SeedError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<RepositoryError> for SeedError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(err)
    }
}

impl CatalogSeed {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SeedError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SeedError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Build a store from the seed, making sure `default_category` exists.
    ///
    /// An empty seed gets a placeholder "Other" category under the default id
    /// so user submissions always have somewhere to land.
    pub fn into_store(
        self,
        default_category: CategoryId,
    ) -> Result<InMemoryAmenityStore, SeedError> {
        let store = InMemoryAmenityStore::default();

        if self.categories.is_empty() {
            store.insert_category(AmenityCategory {
                id: default_category,
                title: LocalizedText::from_pairs([("en", "Other")]),
                order: i32::MAX,
            })?;
        }
        for category in self.categories {
            store.insert_category(category)?;
        }
        if !store.has_category(default_category)? {
            return Err(SeedError::MissingDefaultCategory(default_category));
        }

        for amenity in self.amenities {
            store.insert_amenity(amenity).map_err(|err| match err {
                RepositoryError::DuplicateAmenity(id) => SeedError::DuplicateAmenity(id),
                other => SeedError::Repository(other),
            })?;
        }
        for verification in self.verifications {
            if store.amenity(verification.amenity)?.is_none() {
                return Err(SeedError::UnknownAmenity(verification.amenity));
            }
            store
                .record_verification(
                    verification.user,
                    VerifiedEntity::Amenity(verification.amenity),
                )
                .map_err(|err| match err {
                    RepositoryError::AlreadyVerified(id) => SeedError::DuplicateVerification(id),
                    other => SeedError::Repository(other),
                })?;
        }

        Ok(store)
    }
}
