//! Quiz settings loaded from defaults, TOML files and the environment.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use quiz_core::model::{
    DEFAULT_CHOICE_COUNT, DEFAULT_ROUND_LENGTH, ItemIdError, RegionTag, RoundConfigDraft,
};
use serde::{Deserialize, Serialize};
use storage::directory::DEFAULT_EXTENSION;
use storage::sample::WORLD_REGIONS;

/// Project-level settings file, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "flagquiz.toml";

/// Prefix for environment overrides, e.g. `FLAGQUIZ_CHOICES=6`.
pub const ENV_PREFIX: &str = "FLAGQUIZ_";

/// Region used when the selection ends up empty.
pub const FALLBACK_REGION: &str = "North_America";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    /// Asset directory with one folder per region. Bundled names when unset.
    pub catalog_dir: Option<PathBuf>,
    /// File extension of the flag images under `catalog_dir`.
    pub catalog_extension: String,
    pub regions: Vec<String>,
    pub choices: usize,
    pub questions: usize,
    /// Fixed seed for reproducible rounds.
    pub seed: Option<u64>,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            catalog_dir: None,
            catalog_extension: DEFAULT_EXTENSION.to_string(),
            regions: WORLD_REGIONS.iter().map(ToString::to_string).collect(),
            choices: DEFAULT_CHOICE_COUNT,
            questions: DEFAULT_ROUND_LENGTH,
            seed: None,
        }
    }
}

impl QuizSettings {
    /// Layered sources, lowest priority first: defaults, `./flagquiz.toml`,
    /// the explicit `--config` file, then `FLAGQUIZ_*` variables.
    #[must_use]
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(PROJECT_CONFIG_FILE));
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// # Errors
    ///
    /// Returns the figment error if a source cannot be parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Round settings for the session engine.
    ///
    /// An empty region list falls back to `North_America`.
    ///
    /// # Errors
    ///
    /// Returns `ItemIdError::EmptyRegion` if a configured region is blank.
    pub fn round_draft(&self) -> Result<RoundConfigDraft, ItemIdError> {
        let mut regions = self
            .regions
            .iter()
            .map(RegionTag::new)
            .collect::<Result<BTreeSet<_>, _>>()?;
        if regions.is_empty() {
            regions.insert(RegionTag::new(FALLBACK_REGION)?);
        }
        Ok(RoundConfigDraft::new(regions)
            .with_choice_count(self.choices)
            .with_round_length(self.questions))
    }
}
