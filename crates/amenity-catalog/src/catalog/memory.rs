use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use super::domain::{Amenity, AmenityCategory, AmenityId, AvailabilityFilter, CategoryId, UserId};
use super::repository::{AmenityRepository, NewAmenity, RepositoryError};
use super::verification::{VerificationId, VerificationRecord, VerifiedEntity};

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<CategoryId, AmenityCategory>,
    amenities: BTreeMap<AmenityId, Amenity>,
    verifications: Vec<VerificationRecord>,
    last_amenity_id: u64,
    last_verification_id: u64,
}

impl Tables {
    fn next_amenity_id(&mut self) -> AmenityId {
        self.last_amenity_id += 1;
        AmenityId(self.last_amenity_id)
    }

    fn push_verification(&mut self, user: UserId, entity: VerifiedEntity) -> VerificationRecord {
        self.last_verification_id += 1;
        let record = VerificationRecord {
            id: VerificationId(self.last_verification_id),
            user,
            entity,
            created_at: Utc::now(),
        };
        self.verifications.push(record.clone());
        record
    }
}

/// Process-local catalog store. All tables sit behind one lock, so a
/// submission batch is applied as a unit.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAmenityStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryAmenityStore {
    fn tables(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("catalog lock poisoned".to_string()))
    }

    pub fn insert_category(&self, category: AmenityCategory) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        tables.categories.insert(category.id, category);
        Ok(())
    }

    /// Administrative insert that keeps the caller-chosen id and flags.
    pub fn insert_amenity(&self, amenity: Amenity) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.categories.contains_key(&amenity.category) {
            return Err(RepositoryError::UnknownCategory(amenity.category));
        }
        if tables.amenities.contains_key(&amenity.id) {
            return Err(RepositoryError::DuplicateAmenity(amenity.id));
        }
        tables.last_amenity_id = tables.last_amenity_id.max(amenity.id.0);
        tables.amenities.insert(amenity.id, amenity);
        Ok(())
    }

    /// Each entity carries at most one ledger row.
    pub fn record_verification(
        &self,
        user: UserId,
        entity: VerifiedEntity,
    ) -> Result<VerificationRecord, RepositoryError> {
        let mut tables = self.tables()?;
        if tables.verifications.iter().any(|record| record.entity == entity) {
            let VerifiedEntity::Amenity(id) = entity;
            return Err(RepositoryError::AlreadyVerified(id));
        }
        Ok(tables.push_verification(user, entity))
    }

    pub fn has_category(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        Ok(self.tables()?.categories.contains_key(&id))
    }

    pub fn amenity(&self, id: AmenityId) -> Result<Option<Amenity>, RepositoryError> {
        Ok(self.tables()?.amenities.get(&id).cloned())
    }

    pub fn amenity_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.tables()?.amenities.len())
    }

    pub fn verifications(&self) -> Result<Vec<VerificationRecord>, RepositoryError> {
        Ok(self.tables()?.verifications.clone())
    }
}

impl AmenityRepository for InMemoryAmenityStore {
    fn categories(&self) -> Result<Vec<AmenityCategory>, RepositoryError> {
        Ok(self.tables()?.categories.values().cloned().collect())
    }

    fn listed_amenities(
        &self,
        filter: AvailabilityFilter,
    ) -> Result<Vec<Amenity>, RepositoryError> {
        Ok(self
            .tables()?
            .amenities
            .values()
            .filter(|amenity| amenity.is_listed_for(filter))
            .cloned()
            .collect())
    }

    fn amenities_by_id(&self, ids: &[AmenityId]) -> Result<Vec<Amenity>, RepositoryError> {
        let tables = self.tables()?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.amenities.get(id).cloned())
            .collect())
    }

    fn verifications_for(
        &self,
        user: &UserId,
    ) -> Result<Vec<VerificationRecord>, RepositoryError> {
        Ok(self
            .tables()?
            .verifications
            .iter()
            .filter(|record| record.is_owned_by(user))
            .cloned()
            .collect())
    }

    fn submit(
        &self,
        submissions: Vec<NewAmenity>,
        submitter: &UserId,
    ) -> Result<Vec<Amenity>, RepositoryError> {
        let mut tables = self.tables()?;

        if let Some(missing) = submissions
            .iter()
            .map(|submission| submission.category)
            .find(|category| !tables.categories.contains_key(category))
        {
            return Err(RepositoryError::UnknownCategory(missing));
        }

        let mut created = Vec::with_capacity(submissions.len());
        for submission in submissions {
            let id = tables.next_amenity_id();
            let amenity = submission.with_id(id);
            tables.amenities.insert(id, amenity.clone());
            tables.push_verification(submitter.clone(), VerifiedEntity::Amenity(id));
            created.push(amenity);
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::domain::LocalizedText;

    fn category(id: u64) -> AmenityCategory {
        AmenityCategory {
            id: CategoryId(id),
            title: LocalizedText::from_pairs([("en", format!("Category {id}"))]),
            order: id as i32,
        }
    }

    fn submission(category: u64, title: &str) -> NewAmenity {
        NewAmenity {
            category: CategoryId(category),
            title: LocalizedText::from_pairs([("en", title)]),
            abbreviation: LocalizedText::from_pairs([("en", &title[..2])]),
            is_active: false,
            is_available_for_house: false,
            is_available_for_house_space: false,
        }
    }

    #[test]
    fn submit_links_each_amenity_to_submitter() {
        let store = InMemoryAmenityStore::default();
        store.insert_category(category(1)).expect("category stored");
        let user = UserId("resident-1".to_string());

        let created = store
            .submit(vec![submission(1, "Pool"), submission(1, "Gym")], &user)
            .expect("submit succeeds");

        assert_eq!(created.len(), 2);
        assert_eq!(created[0].title.get("en"), Some("Pool"));
        let ledger = store.verifications_for(&user).expect("ledger readable");
        let linked: Vec<_> = ledger.iter().filter_map(|r| r.entity.amenity()).collect();
        assert_eq!(linked, vec![created[0].id, created[1].id]);
    }

    #[test]
    fn submit_is_all_or_nothing() {
        let store = InMemoryAmenityStore::default();
        store.insert_category(category(1)).expect("category stored");
        let user = UserId("resident-1".to_string());

        let result = store.submit(vec![submission(1, "Pool"), submission(9, "Gym")], &user);

        assert!(matches!(
            result,
            Err(RepositoryError::UnknownCategory(CategoryId(9)))
        ));
        assert_eq!(store.amenity_count().expect("count"), 0);
        assert!(store.verifications().expect("ledger").is_empty());
    }

    #[test]
    fn generated_ids_skip_past_seeded_rows() {
        let store = InMemoryAmenityStore::default();
        store.insert_category(category(1)).expect("category stored");
        let mut seeded = submission(1, "Sauna").with_id(AmenityId(40));
        seeded.is_active = true;
        store.insert_amenity(seeded).expect("seeded");

        let created = store
            .submit(vec![submission(1, "Pool")], &UserId("u".to_string()))
            .expect("submit succeeds");

        assert_eq!(created[0].id, AmenityId(41));
    }

    #[test]
    fn seeded_rows_keep_their_identity() {
        let store = InMemoryAmenityStore::default();
        store.insert_category(category(1)).expect("category stored");
        store
            .insert_amenity(submission(1, "Pool").with_id(AmenityId(5)))
            .expect("first row stored");

        let result = store.insert_amenity(submission(1, "Gym").with_id(AmenityId(5)));

        assert!(matches!(
            result,
            Err(RepositoryError::DuplicateAmenity(AmenityId(5)))
        ));
        let kept = store.amenity(AmenityId(5)).expect("read").expect("present");
        assert_eq!(kept.title.get("en"), Some("Pool"));
    }

    #[test]
    fn ledger_holds_one_row_per_amenity() {
        let store = InMemoryAmenityStore::default();
        store.insert_category(category(1)).expect("category stored");
        store
            .insert_amenity(submission(1, "Pool").with_id(AmenityId(5)))
            .expect("stored");
        store
            .record_verification(UserId("a".to_string()), VerifiedEntity::Amenity(AmenityId(5)))
            .expect("first record");

        let result = store
            .record_verification(UserId("b".to_string()), VerifiedEntity::Amenity(AmenityId(5)));

        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyVerified(AmenityId(5)))
        ));
        assert_eq!(store.verifications().expect("ledger").len(), 1);
    }
}
