use std::collections::BTreeMap;

use super::domain::{Amenity, AmenityCategory, CategoryGroup, CategoryId};
use super::visibility::CategorizedAmenity;

/// Group a flat visibility result into ordered category buckets.
///
/// Buckets follow category `order`, then title, then id. Amenities inside a
/// bucket follow title, then id. Only categories present in `items` appear.
pub fn assemble(items: Vec<CategorizedAmenity>) -> Vec<CategoryGroup> {
    let mut buckets: BTreeMap<CategoryId, (AmenityCategory, Vec<Amenity>)> = BTreeMap::new();
    for CategorizedAmenity { category, amenity } in items {
        buckets
            .entry(category.id)
            .or_insert_with(|| (category, Vec::new()))
            .1
            .push(amenity);
    }

    let mut buckets: Vec<_> = buckets.into_values().collect();
    buckets.sort_by(|(left, _), (right, _)| {
        left.order
            .cmp(&right.order)
            .then_with(|| left.title.sort_key().cmp(right.title.sort_key()))
            .then_with(|| left.id.cmp(&right.id))
    });

    buckets
        .into_iter()
        .map(|(category, mut amenities)| {
            amenities.sort_by(|left, right| {
                left.title
                    .sort_key()
                    .cmp(right.title.sort_key())
                    .then_with(|| left.id.cmp(&right.id))
            });
            CategoryGroup {
                category: category.title,
                amenities: amenities.iter().map(Amenity::view).collect(),
            }
        })
        .collect()
}
