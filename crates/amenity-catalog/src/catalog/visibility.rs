use std::collections::{BTreeMap, HashMap};

use super::domain::{Amenity, AmenityCategory, AmenityId, AvailabilityFilter, UserId};
use super::repository::{AmenityRepository, RepositoryError};

/// Amenity joined with the category it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorizedAmenity {
    pub category: AmenityCategory,
    pub amenity: Amenity,
}

/// Amenities `user` may see under `filter`.
///
/// Union of the globally listed set and the user's own pending submissions,
/// de-duplicated by amenity id. Output is ordered by id; grouping and display
/// order are left to the hierarchy assembler.
pub fn visible_amenities<R>(
    repository: &R,
    user: &UserId,
    filter: AvailabilityFilter,
) -> Result<Vec<CategorizedAmenity>, RepositoryError>
where
    R: AmenityRepository + ?Sized,
{
    let listed = repository.listed_amenities(filter)?;

    let submitted_ids: Vec<AmenityId> = repository
        .verifications_for(user)?
        .iter()
        .filter_map(|record| record.entity.amenity())
        .collect();
    let submitted = if submitted_ids.is_empty() {
        Vec::new()
    } else {
        repository.amenities_by_id(&submitted_ids)?
    };

    let mut merged: BTreeMap<AmenityId, Amenity> = BTreeMap::new();
    for amenity in listed.into_iter().chain(submitted) {
        merged.entry(amenity.id).or_insert(amenity);
    }

    let categories: HashMap<_, _> = repository
        .categories()?
        .into_iter()
        .map(|category| (category.id, category))
        .collect();

    merged
        .into_values()
        .map(|amenity| -> Result<CategorizedAmenity, RepositoryError> {
            let category = categories.get(&amenity.category).cloned().ok_or(
                RepositoryError::DanglingCategory {
                    amenity: amenity.id,
                    category: amenity.category,
                },
            )?;
            Ok(CategorizedAmenity { category, amenity })
        })
        .collect()
}
