/// Matching and reporting policies
pub mod name_normalization;
pub mod top_level_counts;

pub use name_normalization::comparison_key;
pub use top_level_counts::TopLevelCounts;
