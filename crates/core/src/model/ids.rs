use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator between the region tag and the item name in an identifier.
pub const REGION_SEPARATOR: char = '-';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ItemIdError {
    #[error("region tag cannot be empty")]
    EmptyRegion,

    #[error("identifier `{0}` has no `-` between region and name")]
    MissingSeparator(String),

    #[error("identifier `{0}` has an empty name")]
    EmptyName(String),
}

/// Grouping key for quiz items (e.g. `Europe`, `North_America`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionTag(String);

impl RegionTag {
    /// Create a validated region tag.
    ///
    /// # Errors
    ///
    /// Returns `ItemIdError::EmptyRegion` if the tag is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ItemIdError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ItemIdError::EmptyRegion);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable form of the tag, underscores shown as spaces.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.0.replace('_', " ")
    }
}

/// Opaque key of the form `<region>-<name>` referencing one quiz item.
///
/// The region is everything before the first `-`; the remainder is the item
/// name. Both parts are validated non-empty on construction, so the accessors
/// below never fail.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId {
    raw: String,
    split: usize,
}

impl ItemId {
    /// Parse an identifier.
    ///
    /// # Errors
    ///
    /// Returns `ItemIdError` if the separator is missing or either side is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, ItemIdError> {
        let raw = value.into();
        let Some(split) = raw.find(REGION_SEPARATOR) else {
            return Err(ItemIdError::MissingSeparator(raw));
        };
        if split == 0 {
            return Err(ItemIdError::EmptyRegion);
        }
        if split + REGION_SEPARATOR.len_utf8() == raw.len() {
            return Err(ItemIdError::EmptyName(raw));
        }
        Ok(Self { raw, split })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The region tag this item belongs to.
    #[must_use]
    pub fn region(&self) -> RegionTag {
        RegionTag(self.raw[..self.split].to_string())
    }

    /// Name part without the region prefix, underscores kept.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.raw[self.split + REGION_SEPARATOR.len_utf8()..]
    }

    /// Region-stripped name with underscores replaced by spaces.
    ///
    /// This is the string shown on a choice and compared against guesses.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name().replace('_', " ")
    }
}

impl fmt::Debug for RegionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionTag({})", self.0)
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.raw)
    }
}

impl fmt::Display for RegionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for RegionTag {
    type Err = ItemIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for ItemId {
    type Err = ItemIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RegionTag {
    type Error = ItemIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for ItemId {
    type Error = ItemIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RegionTag> for String {
    fn from(value: RegionTag) -> Self {
        value.0
    }
}

impl From<ItemId> for String {
    fn from(value: ItemId) -> Self {
        value.raw
    }
}
