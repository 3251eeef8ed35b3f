use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use quiz_core::model::{ItemId, RegionTag};
use storage::repository::CatalogProvider;
use tracing::{debug, info, warn};

use crate::error::CatalogError;

type RegionMap = BTreeMap<RegionTag, Vec<ItemId>>;

/// Read-mostly index of every known item, partitioned by region.
///
/// The mapping is pulled from a `CatalogProvider` on `load` and replaced as a
/// whole on `refresh`; readers always see either the old or the new mapping.
pub struct CatalogIndex {
    provider: Arc<dyn CatalogProvider>,
    entries: RwLock<Arc<RegionMap>>,
}

impl CatalogIndex {
    /// Build an index by pulling every region from the provider.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Load` if the provider fails.
    pub async fn load(provider: Arc<dyn CatalogProvider>) -> Result<Self, CatalogError> {
        let entries = fetch(provider.as_ref()).await?;
        info!(
            regions = entries.len(),
            items = entries.values().map(Vec::len).sum::<usize>(),
            "catalog loaded"
        );
        Ok(Self {
            provider,
            entries: RwLock::new(Arc::new(entries)),
        })
    }

    /// Re-pull from the provider and swap in the new mapping.
    ///
    /// On failure the previous mapping is kept.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Load` if the provider fails.
    pub async fn refresh(&self) -> Result<(), CatalogError> {
        let fresh = match fetch(self.provider.as_ref()).await {
            Ok(fresh) => fresh,
            Err(err) => {
                warn!(%err, "catalog refresh failed, keeping previous entries");
                return Err(err);
            }
        };
        let fresh = Arc::new(fresh);
        // The guarded value is only ever replaced whole, so a poisoned lock
        // still holds a consistent mapping.
        *self.entries.write().unwrap_or_else(PoisonError::into_inner) = fresh;
        info!("catalog refreshed");
        Ok(())
    }

    fn snapshot(&self) -> Arc<RegionMap> {
        Arc::clone(&self.entries.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Regions with at least one item.
    #[must_use]
    pub fn regions_available(&self) -> BTreeSet<RegionTag> {
        self.snapshot()
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(region, _)| region.clone())
            .collect()
    }

    /// Identifiers of every requested region, concatenated in region order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownRegion` for the first requested region
    /// that has no entries.
    pub fn identifiers(&self, regions: &BTreeSet<RegionTag>) -> Result<Vec<ItemId>, CatalogError> {
        let entries = self.snapshot();
        let mut out = Vec::new();
        for region in regions {
            let items = entries
                .get(region)
                .filter(|items| !items.is_empty())
                .ok_or_else(|| CatalogError::UnknownRegion(region.clone()))?;
            out.extend(items.iter().cloned());
        }
        Ok(out)
    }

    /// Total number of items across all regions.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.snapshot().values().map(Vec::len).sum()
    }
}

impl fmt::Debug for CatalogIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.snapshot();
        f.debug_struct("CatalogIndex")
            .field("regions", &entries.len())
            .field("items", &entries.values().map(Vec::len).sum::<usize>())
            .finish_non_exhaustive()
    }
}

async fn fetch(provider: &dyn CatalogProvider) -> Result<RegionMap, CatalogError> {
    let mut entries = RegionMap::new();
    for region in provider.list_regions().await? {
        let listed = provider.list_identifiers(&region).await?;
        let mut seen = HashSet::with_capacity(listed.len());
        let mut items = Vec::with_capacity(listed.len());
        for item in listed {
            if item.region() != region {
                warn!(%item, %region, "provider listed item under a foreign region");
                continue;
            }
            if seen.insert(item.clone()) {
                items.push(item);
            }
        }
        debug!(%region, count = items.len(), "indexed region");
        entries.insert(region, items);
    }
    Ok(entries)
}
