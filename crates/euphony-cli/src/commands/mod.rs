pub mod catalog;
pub mod config;
pub mod recommend;
pub mod resolve;
pub mod similar;

use anyhow::{Context, Result};
use euphony_core::Catalog;
use euphony_recommend::{Config, Recommender};

pub use catalog::show_catalog;
pub use recommend::{run_recommend, RecommendRequest};
pub use resolve::show_resolution;
pub use similar::show_similar;

/// Load the configured catalog and build a recommender over it.
pub fn load_recommender(config: &Config) -> Result<Recommender> {
    let catalog = Catalog::load(&config.catalog_path).with_context(|| {
        format!(
            "Failed to load catalog from {}\n\nPass --catalog or set catalog_path with 'euphony config set catalog_path <PATH>'",
            config.catalog_path.display()
        )
    })?;
    Recommender::new(catalog, &config.index_params()).context("Failed to build the search index")
}
