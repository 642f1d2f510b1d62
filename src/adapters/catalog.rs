use crate::domain::model::{CatalogEntry, CatalogQuery, OrderDir, Video};
use crate::domain::ports::{Storage, VideoSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::cmp::Ordering;

pub const DEFAULT_CATALOG_FILE: &str = "catalog.json";

/// Outcome of [`CatalogFileSource::upsert`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertSummary {
    pub inserted: usize,
    pub updated: usize,
}

/// Catalog persisted as a JSON array of [`CatalogEntry`] rows, keyed by
/// `video_id`. Filled by the `fetch-catalog` tool.
pub struct CatalogFileSource<S: Storage> {
    storage: S,
    file_name: String,
}

impl<S: Storage> CatalogFileSource<S> {
    pub fn new(storage: S) -> Self {
        Self::with_file_name(storage, DEFAULT_CATALOG_FILE)
    }

    pub fn with_file_name(storage: S, file_name: impl Into<String>) -> Self {
        Self {
            storage,
            file_name: file_name.into(),
        }
    }

    /// All stored rows; a missing file is an empty catalog.
    pub async fn load_entries(&self) -> Result<Vec<CatalogEntry>> {
        if !self.storage.exists(&self.file_name) {
            tracing::warn!("Catalog file {} not found, treating as empty", self.file_name);
            return Ok(Vec::new());
        }

        let data = self.storage.read_file(&self.file_name).await?;
        let entries: Vec<CatalogEntry> = serde_json::from_slice(&data)?;
        Ok(entries)
    }

    /// Inserts new rows and replaces existing ones with the same `video_id`.
    pub async fn upsert(&self, entries: Vec<CatalogEntry>) -> Result<UpsertSummary> {
        let mut stored = self.load_entries().await?;
        let mut summary = UpsertSummary::default();

        for entry in entries {
            match stored.iter_mut().find(|e| e.video_id == entry.video_id) {
                Some(existing) => {
                    *existing = entry;
                    summary.updated += 1;
                }
                None => {
                    stored.push(entry);
                    summary.inserted += 1;
                }
            }
        }

        let data = serde_json::to_vec_pretty(&stored)?;
        self.storage.write_file(&self.file_name, &data).await?;

        tracing::debug!(
            "Catalog {}: {} inserted, {} updated, {} total",
            self.file_name,
            summary.inserted,
            summary.updated,
            stored.len()
        );
        Ok(summary)
    }
}

/// Logs entries dropped for having no positive duration.
pub(crate) fn log_unplayable(entries: &[CatalogEntry]) {
    let skipped: Vec<&str> = entries
        .iter()
        .filter(|e| e.duration_seconds <= 0)
        .map(|e| e.video_id.as_str())
        .collect();
    if !skipped.is_empty() {
        tracing::warn!(
            "Skipping {} videos without a positive duration: {}",
            skipped.len(),
            skipped.join(", ")
        );
    }
}

fn compare_by(order_by: &str, a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    match order_by {
        "likes" | "rating" => a.like_count.cmp(&b.like_count),
        "views" | "viewCount" => a.view_count.cmp(&b.view_count),
        "published_at" | "date" => a.published_at.cmp(&b.published_at),
        _ => a.duration_seconds.cmp(&b.duration_seconds),
    }
}

/// True when the entry passes the duration and popularity filters of `query`.
/// Entries without a positive duration (live or upcoming broadcasts) never
/// match; the selection engine does not check durations itself.
pub fn matches_filters(entry: &CatalogEntry, query: &CatalogQuery) -> bool {
    entry.duration_seconds > 0
        && query.max_duration.map_or(true, |max| entry.duration_seconds <= max)
        && query.min_likes.map_or(true, |min| entry.like_count >= min)
        && query.min_views.map_or(true, |min| entry.view_count >= min)
}

/// Applies the store-side filters, ordering and limit. An empty query orders
/// by duration, shortest first.
pub fn apply_query(entries: &[CatalogEntry], query: &CatalogQuery) -> Vec<Video> {
    log_unplayable(entries);

    let mut matching: Vec<&CatalogEntry> = entries
        .iter()
        .filter(|e| matches_filters(e, query))
        .collect();

    let order_by = query.order_by.as_deref().unwrap_or("duration");
    let descending = query.order_dir == Some(OrderDir::Desc);
    matching.sort_by(|a, b| {
        let ordering = compare_by(order_by, a, b);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });

    if let Some(limit) = query.limit {
        matching.truncate(limit);
    }

    matching.into_iter().map(Video::from).collect()
}

#[async_trait]
impl<S: Storage> VideoSource for CatalogFileSource<S> {
    async fn fetch_catalog(&self, query: &CatalogQuery) -> Result<Vec<Video>> {
        let entries = self.load_entries().await?;
        Ok(apply_query(&entries, query))
    }

    fn name(&self) -> &str {
        "catalog"
    }
}
