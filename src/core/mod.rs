pub mod selection;
pub mod service;

pub use crate::domain::model::{CatalogQuery, Combination, Video, VideoFilters};
pub use crate::domain::ports::{Storage, VideoSource};
pub use crate::utils::error::Result;
