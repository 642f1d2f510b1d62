use crate::domain::model::{CatalogQuery, Video};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> bool;
}

/// Supplies the candidate list the selection engine packs from.
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn fetch_catalog(&self, query: &CatalogQuery) -> Result<Vec<Video>>;

    fn name(&self) -> &str;
}

#[async_trait]
impl VideoSource for Box<dyn VideoSource> {
    async fn fetch_catalog(&self, query: &CatalogQuery) -> Result<Vec<Video>> {
        (**self).fetch_catalog(query).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
