mod ids;
mod round;
mod summary;

pub use ids::{ItemId, ItemIdError, REGION_SEPARATOR, RegionTag};
pub use round::{
    ALLOWED_CHOICE_COUNTS, DEFAULT_CHOICE_COUNT, DEFAULT_ROUND_LENGTH, GRID_COLUMNS, RoundConfig,
    RoundConfigDraft, RoundConfigError,
};
pub use summary::{ACCURACY_NUMERATOR, RoundSummary, RoundSummaryError};
