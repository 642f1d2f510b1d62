use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// A catalog entry as seen by the selection engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    /// Length in seconds.
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl Video {
    pub fn new(id: impl Into<String>, title: impl Into<String>, duration: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration,
            url: None,
            thumbnail_url: None,
        }
    }

    pub fn youtube(id: impl Into<String>, title: impl Into<String>, duration: i64) -> Self {
        let id = id.into();
        let url = format!("{}{}", YOUTUBE_WATCH_URL, id);
        Self {
            url: Some(url),
            ..Self::new(id, title, duration)
        }
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration as f64 / 60.0
    }
}

/// One candidate grouping of videos produced by a single attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    /// In selection order.
    pub items: Vec<Video>,
    pub total_duration: i64,
    /// `target - total_duration`; lower is better.
    pub remaining: i64,
}

impl Combination {
    pub fn empty(target: i64) -> Self {
        Self {
            items: Vec::new(),
            total_duration: 0,
            remaining: target,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_minutes(&self) -> f64 {
        self.total_duration as f64 / 60.0
    }

    pub fn remaining_minutes(&self) -> f64 {
        self.remaining as f64 / 60.0
    }
}

/// A stored catalog row, richer than [`Video`]: it carries the statistics the
/// catalog store filters and orders on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub video_id: String,
    pub channel_id: String,
    pub title: String,
    pub duration_seconds: i64,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CatalogEntry> for Video {
    fn from(entry: &CatalogEntry) -> Self {
        Video {
            thumbnail_url: entry.thumbnail_url.clone(),
            ..Video::youtube(&entry.video_id, &entry.title, entry.duration_seconds)
        }
    }
}

/// Request-side filters, in the vocabulary of the YouTube search API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFilters {
    pub max_results: Option<usize>,
    /// `date`, `rating`, `relevance`, `title`, `viewCount` or `videoCount`.
    pub order: Option<String>,
    pub max_duration: Option<i64>,
    pub min_likes: Option<u64>,
    pub min_views: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDir {
    #[default]
    Asc,
    Desc,
}

/// Source-side query; each source honours the parts it can.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub limit: Option<usize>,
    /// `duration`, `likes`, `views` or `published_at` for the catalog store;
    /// passed through as the search order for the YouTube source.
    pub order_by: Option<String>,
    pub order_dir: Option<OrderDir>,
    pub max_duration: Option<i64>,
    pub min_likes: Option<u64>,
    pub min_views: Option<u64>,
}

impl CatalogQuery {
    pub fn is_empty(&self) -> bool {
        *self == CatalogQuery::default()
    }
}
