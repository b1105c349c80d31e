//! Merge policy: the default layer every builder starts from.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;

/// Builder seeded with the built-in defaults as the lowest layer.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("storage.data_dir", "data")?
        .set_default("query.default_limit", 100)?
        .set_default(
            "analysis.trend_window",
            crate::analysis::DEFAULT_TREND_WINDOW as i64,
        )
}
