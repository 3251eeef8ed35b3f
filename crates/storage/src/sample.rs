//! Bundled world catalog so the quiz runs without an asset directory.

use crate::repository::{InMemoryCatalog, ProviderError};

const AFRICA: &[&str] = &[
    "Algeria", "Angola", "Botswana", "Cameroon", "Egypt", "Ethiopia", "Ghana", "Kenya",
    "Madagascar", "Mali", "Morocco", "Nigeria", "Senegal", "South_Africa", "Tanzania", "Uganda",
];

const ASIA: &[&str] = &[
    "Bangladesh", "Cambodia", "China", "India", "Indonesia", "Japan", "Laos", "Malaysia",
    "Mongolia", "Nepal", "Pakistan", "Philippines", "South_Korea", "Thailand", "Vietnam",
];

const EUROPE: &[&str] = &[
    "Austria", "Belgium", "Czech_Republic", "Denmark", "Estonia", "Finland", "France", "Germany",
    "Greece", "Ireland", "Italy", "Netherlands", "Norway", "Poland", "Portugal", "Spain",
    "Sweden", "United_Kingdom",
];

const NORTH_AMERICA: &[&str] = &[
    "Bahamas", "Belize", "Canada", "Costa_Rica", "Cuba", "Dominican_Republic", "El_Salvador",
    "Guatemala", "Haiti", "Honduras", "Jamaica", "Mexico", "Nicaragua", "Panama",
    "United_States",
];

const OCEANIA: &[&str] = &[
    "Australia", "Fiji", "Kiribati", "Marshall_Islands", "Micronesia", "Nauru", "New_Zealand",
    "Palau", "Papua_New_Guinea", "Samoa", "Solomon_Islands", "Tonga", "Tuvalu", "Vanuatu",
];

const SOUTH_AMERICA: &[&str] = &[
    "Argentina", "Bolivia", "Brazil", "Chile", "Colombia", "Ecuador", "Guyana", "Paraguay",
    "Peru", "Suriname", "Uruguay", "Venezuela",
];

/// The six world regions of the classic flag quiz.
pub const WORLD_REGIONS: [&str; 6] = [
    "Africa",
    "Asia",
    "Europe",
    "North_America",
    "Oceania",
    "South_America",
];

/// # Errors
///
/// Returns `ProviderError::Malformed` if a bundled name fails validation.
pub fn world_catalog() -> Result<InMemoryCatalog, ProviderError> {
    InMemoryCatalog::from_regions(WORLD_REGIONS.into_iter().zip([
        AFRICA,
        ASIA,
        EUROPE,
        NORTH_AMERICA,
        OCEANIA,
        SOUTH_AMERICA,
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::CatalogProvider;

    #[tokio::test]
    async fn every_region_fills_a_default_round() {
        let catalog = world_catalog().unwrap();
        let regions = catalog.list_regions().await.unwrap();
        assert_eq!(regions.len(), WORLD_REGIONS.len());

        for region in regions {
            let items = catalog.list_identifiers(&region).await.unwrap();
            assert!(items.len() >= 10, "{region} has only {} items", items.len());
            assert!(items.iter().all(|item| item.region() == region));
        }
    }
}
