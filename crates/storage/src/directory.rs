//! Catalog backed by an asset directory.
//!
//! Layout: one subdirectory per region, one image per item named after its
//! identifier, e.g. `flags/Europe/Europe-Czech_Republic.png`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::{ItemId, RegionTag};
use tokio::fs;
use tracing::{debug, warn};

use crate::repository::{CatalogProvider, ProviderError};

pub const DEFAULT_EXTENSION: &str = "png";

#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
    extension: String,
}

impl DirectoryCatalog {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Only files with this extension count as items.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the image backing an item.
    #[must_use]
    pub fn asset_path(&self, item: &ItemId) -> PathBuf {
        self.root
            .join(item.region().as_str())
            .join(format!("{item}.{}", self.extension))
    }

    async fn read_entries(dir: &Path) -> Result<Vec<fs::DirEntry>, ProviderError> {
        let mut reader = fs::read_dir(dir)
            .await
            .map_err(|e| unavailable(dir, &e))?;
        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| unavailable(dir, &e))? {
            entries.push(entry);
        }
        Ok(entries)
    }
}

fn unavailable(path: &Path, err: &std::io::Error) -> ProviderError {
    ProviderError::Unavailable(format!("{}: {err}", path.display()))
}

#[async_trait]
impl CatalogProvider for DirectoryCatalog {
    async fn list_regions(&self) -> Result<Vec<RegionTag>, ProviderError> {
        let mut regions = Vec::new();
        for entry in Self::read_entries(&self.root).await? {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| unavailable(&entry.path(), &e))?;
            if !file_type.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                warn!(path = %entry.path().display(), "skipping non UTF-8 region directory");
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            regions.push(RegionTag::new(name)?);
        }
        regions.sort();
        debug!(root = %self.root.display(), count = regions.len(), "listed regions");
        Ok(regions)
    }

    async fn list_identifiers(&self, region: &RegionTag) -> Result<Vec<ItemId>, ProviderError> {
        let dir = self.root.join(region.as_str());
        if !fs::try_exists(&dir).await.map_err(|e| unavailable(&dir, &e))? {
            return Err(ProviderError::RegionNotFound(region.clone()));
        }

        let mut items = Vec::new();
        for entry in Self::read_entries(&dir).await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                warn!(path = %path.display(), "skipping non UTF-8 asset name");
                continue;
            };
            let item = match ItemId::new(stem) {
                Ok(item) => item,
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping malformed asset name");
                    continue;
                }
            };
            if item.region() != *region {
                warn!(path = %path.display(), %region, "skipping asset filed under the wrong region");
                continue;
            }
            items.push(item);
        }
        items.sort();
        debug!(%region, count = items.len(), "listed identifiers");
        Ok(items)
    }
}
