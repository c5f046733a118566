use amenity_catalog::catalog::{AvailabilityFilter, CatalogSeed, InMemoryAmenityStore};
use amenity_catalog::config::CatalogConfig;
use amenity_catalog::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the configured seed, or starts from an empty catalog.
pub(crate) fn build_store(config: &CatalogConfig) -> Result<InMemoryAmenityStore, AppError> {
    let seed = match &config.seed_path {
        Some(path) => {
            info!(path = %path.display(), "loading catalog seed");
            CatalogSeed::from_path(path)?
        }
        None => CatalogSeed::default(),
    };

    Ok(seed.into_store(config.default_category)?)
}

pub(crate) fn parse_filter(raw: &str) -> Result<AvailabilityFilter, String> {
    match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "any" | "all" => Ok(AvailabilityFilter::Any),
        "house" => Ok(AvailabilityFilter::House),
        "house_space" => Ok(AvailabilityFilter::HouseSpace),
        other => Err(format!(
            "unknown availability filter '{other}' (expected any, house, or house-space)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amenity_catalog::catalog::{AmenityRepository, CategoryId};

    #[test]
    fn parses_cli_filter_spellings() {
        assert_eq!(parse_filter("house-space"), Ok(AvailabilityFilter::HouseSpace));
        assert_eq!(parse_filter(" House "), Ok(AvailabilityFilter::House));
        assert_eq!(parse_filter("all"), Ok(AvailabilityFilter::Any));
        assert!(parse_filter("garage").is_err());
    }

    #[test]
    fn unseeded_store_holds_default_category() {
        let store = build_store(&CatalogConfig {
            default_category: CategoryId(4),
            seed_path: None,
        })
        .expect("store builds");
        let categories = store.categories().expect("categories");
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].id, CategoryId(4));
    }
}
