use crate::domain::model::{CatalogQuery, Video};
use crate::domain::ports::VideoSource;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Fixed in-process catalog, used for demos and when no other source is
/// configured. Queries are ignored.
#[derive(Debug, Clone)]
pub struct MemorySource {
    videos: Vec<Video>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self {
            videos: sample_videos(),
        }
    }

    pub fn with_videos(videos: Vec<Video>) -> Self {
        Self { videos }
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_videos() -> Vec<Video> {
    [
        ("001", 120),
        ("002", 180),
        ("003", 300),
        ("004", 240),
        ("005", 150),
        ("006", 360),
        ("007", 420),
        ("008", 90),
        ("009", 540),
        ("010", 600),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (id, duration))| Video::new(id, format!("Sample video {}", i + 1), duration))
    .collect()
}

#[async_trait]
impl VideoSource for MemorySource {
    async fn fetch_catalog(&self, _query: &CatalogQuery) -> Result<Vec<Video>> {
        Ok(self.videos.clone())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
