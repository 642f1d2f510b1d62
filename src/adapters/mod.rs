// Adapters layer: concrete implementations of the domain ports (catalog sources, storage).

pub mod catalog;
pub mod memory;
pub mod storage;
pub mod youtube;

use crate::config::toml_config::{SourceConfig, SourceKind};
use crate::domain::ports::VideoSource;
use crate::utils::error::Result;

pub use catalog::CatalogFileSource;
pub use memory::MemorySource;
pub use storage::LocalStorage;
pub use youtube::YouTubeSource;

/// Builds the catalog source selected by `kind`.
pub fn build_source(kind: SourceKind, config: &SourceConfig) -> Result<Box<dyn VideoSource>> {
    tracing::debug!("Using {} catalog source", kind);

    let source: Box<dyn VideoSource> = match kind {
        SourceKind::Memory => Box::new(MemorySource::new()),
        SourceKind::Catalog => Box::new(CatalogFileSource::new(LocalStorage::new(
            config.catalog_path.clone(),
        ))),
        SourceKind::YouTube => Box::new(YouTubeSource::new(config.youtube.clone())?),
    };
    Ok(source)
}
