use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Language used to derive ordering keys for localized titles.
pub const PRIMARY_LANGUAGE: &str = "en";

/// Identifier wrapper for amenity categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

/// Identifier wrapper for amenities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmenityId(pub u64);

/// Opaque caller identity handed out by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display text keyed by language code, e.g. `{"en": "Pool", "ru": "Бассейн"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self(entries)
    }

    /// Convenience constructor for fixtures and seeds.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(lang, text)| (lang.into(), text.into()))
                .collect(),
        )
    }

    pub fn get(&self, language: &str) -> Option<&str> {
        self.0.get(language).map(String::as_str)
    }

    /// Ordering key: primary-language text, else the first language by code.
    pub fn sort_key(&self) -> &str {
        self.get(PRIMARY_LANGUAGE)
            .or_else(|| self.0.values().next().map(String::as_str))
            .unwrap_or_default()
    }
}

/// Named, ordered grouping of amenities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmenityCategory {
    pub id: CategoryId,
    pub title: LocalizedText,
    pub order: i32,
}

/// Taggable feature of a house or house space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amenity {
    pub id: AmenityId,
    pub category: CategoryId,
    pub title: LocalizedText,
    pub abbreviation: LocalizedText,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_available_for_house: bool,
    #[serde(default)]
    pub is_available_for_house_space: bool,
}

impl Amenity {
    pub fn view(&self) -> AmenityView {
        AmenityView {
            id: self.id,
            title: self.title.clone(),
            abbreviation: self.abbreviation.clone(),
        }
    }

    /// True when the amenity belongs to the globally visible set for `filter`.
    pub fn is_listed_for(&self, filter: AvailabilityFilter) -> bool {
        self.is_active
            && match filter {
                AvailabilityFilter::Any => true,
                AvailabilityFilter::House => self.is_available_for_house,
                AvailabilityFilter::HouseSpace => self.is_available_for_house_space,
            }
    }
}

/// Validated payload for a user-submitted amenity, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmenityDraft {
    pub title: LocalizedText,
    pub abbreviation: LocalizedText,
}

/// Which availability flag restricts the globally visible amenity set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityFilter {
    #[default]
    Any,
    House,
    HouseSpace,
}

impl AvailabilityFilter {
    pub fn label(&self) -> &'static str {
        match self {
            AvailabilityFilter::Any => "any",
            AvailabilityFilter::House => "house",
            AvailabilityFilter::HouseSpace => "house_space",
        }
    }
}

/// Public representation of an amenity in API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmenityView {
    pub id: AmenityId,
    pub title: LocalizedText,
    pub abbreviation: LocalizedText,
}

/// One bucket of the amenity hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: LocalizedText,
    pub amenities: Vec<AmenityView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amenity(active: bool, house: bool, space: bool) -> Amenity {
        Amenity {
            id: AmenityId(1),
            category: CategoryId(1),
            title: LocalizedText::from_pairs([("en", "Pool")]),
            abbreviation: LocalizedText::from_pairs([("en", "PL")]),
            is_active: active,
            is_available_for_house: house,
            is_available_for_house_space: space,
        }
    }

    #[test]
    fn sort_key_prefers_primary_language() {
        let text = LocalizedText::from_pairs([("de", "Becken"), ("en", "Pool")]);
        assert_eq!(text.sort_key(), "Pool");
    }

    #[test]
    fn sort_key_falls_back_to_first_language_code() {
        let text = LocalizedText::from_pairs([("ru", "Бассейн"), ("de", "Becken")]);
        assert_eq!(text.sort_key(), "Becken");
        assert_eq!(LocalizedText::default().sort_key(), "");
    }

    #[test]
    fn inactive_amenities_are_never_listed() {
        let hidden = amenity(false, true, true);
        assert!(!hidden.is_listed_for(AvailabilityFilter::Any));
        assert!(!hidden.is_listed_for(AvailabilityFilter::House));
        assert!(!hidden.is_listed_for(AvailabilityFilter::HouseSpace));
    }

    #[test]
    fn availability_filter_selects_matching_flag() {
        let house_only = amenity(true, true, false);
        assert!(house_only.is_listed_for(AvailabilityFilter::Any));
        assert!(house_only.is_listed_for(AvailabilityFilter::House));
        assert!(!house_only.is_listed_for(AvailabilityFilter::HouseSpace));
    }

    #[test]
    fn localized_text_serializes_as_plain_object() {
        let text = LocalizedText::from_pairs([("en", "Line"), ("ru", "Линия")]);
        let value = serde_json::to_value(&text).expect("serializes");
        assert_eq!(value, serde_json::json!({ "en": "Line", "ru": "Линия" }));
    }
}
