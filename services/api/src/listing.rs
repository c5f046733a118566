use crate::infra::{build_store, parse_filter};
use amenity_catalog::catalog::{AmenityCatalogService, AvailabilityFilter, CategoryGroup, UserId};
use amenity_catalog::config::AppConfig;
use amenity_catalog::error::AppError;
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// User whose pending submissions should be included
    #[arg(long)]
    pub(crate) user: String,
    /// Availability filter: any, house, or house-space
    #[arg(long, default_value = "any", value_parser = parse_filter)]
    pub(crate) filter: AvailabilityFilter,
    /// Print the hierarchy as JSON instead of an outline
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_catalog_list(args: ListArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = Arc::new(build_store(&config.catalog)?);
    let service = AmenityCatalogService::new(store, config.catalog.default_category);

    let user = UserId(args.user);
    let groups = service.list(&user, args.filter)?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&groups).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        print!("{}", render_outline(&user, args.filter, &groups));
    }
    Ok(())
}

fn render_outline(user: &UserId, filter: AvailabilityFilter, groups: &[CategoryGroup]) -> String {
    let mut out = format!("Amenities visible to {user} (filter: {})\n", filter.label());
    if groups.is_empty() {
        out.push_str("- none\n");
        return out;
    }

    for group in groups {
        out.push_str(&format!("\n{}\n", group.category.sort_key()));
        for amenity in &group.amenities {
            out.push_str(&format!(
                "- [{}] {} ({})\n",
                amenity.id.0,
                amenity.title.sort_key(),
                amenity.abbreviation.sort_key()
            ));
        }
    }
    out
}
