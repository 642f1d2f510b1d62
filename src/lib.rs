pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{build_source, CatalogFileSource, LocalStorage, MemorySource, YouTubeSource};
pub use config::{AppConfig, SourceKind};
pub use crate::core::{selection, service::ComboService};
pub use domain::model::{Combination, Video, VideoFilters};
pub use utils::error::{AppError, Result};
