//! YouTube Data API v3 client.
//!
//! `fetch_catalog` answers a selection request with one search page of the
//! configured channel. `fetch_channel_uploads` walks the channel's whole
//! uploads playlist and is what the `fetch-catalog` tool stores.

use crate::adapters::catalog::{log_unplayable, matches_filters};
use crate::config::toml_config::{YouTubeConfig, YOUTUBE_MAX_RESULTS};
use crate::domain::model::{CatalogEntry, CatalogQuery, Video};
use crate::domain::ports::VideoSource;
use crate::utils::duration::parse_iso8601_duration;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const SEARCH_ORDERS: [&str; 6] = [
    "date",
    "rating",
    "relevance",
    "title",
    "videoCount",
    "viewCount",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    content_details: ChannelContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: PlaylistSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistSnippet {
    resource_id: SearchId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    content_details: VideoContentDetails,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    #[serde(default)]
    channel_id: String,
    published_at: Option<DateTime<Utc>>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    duration: String,
}

// The API encodes counters as decimal strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

fn counter(value: &Option<String>) -> u64 {
    value.as_deref().and_then(|v| v.parse().ok()).unwrap_or(0)
}

impl VideoItem {
    fn into_entry(self, fetched_at: DateTime<Utc>) -> CatalogEntry {
        CatalogEntry {
            duration_seconds: parse_iso8601_duration(&self.content_details.duration),
            view_count: counter(&self.statistics.view_count),
            like_count: counter(&self.statistics.like_count),
            comment_count: counter(&self.statistics.comment_count),
            thumbnail_url: self
                .snippet
                .thumbnails
                .and_then(|t| t.default)
                .map(|t| t.url),
            published_at: self.snippet.published_at,
            channel_id: self.snippet.channel_id,
            title: self.snippet.title,
            video_id: self.id,
            updated_at: fetched_at,
        }
    }
}

pub struct YouTubeSource {
    client: Client,
    config: YouTubeConfig,
    api_key: String,
    channel_id: String,
}

impl YouTubeSource {
    /// Fails with `MissingConfigError` when the API key or channel id is unset.
    pub fn new(config: YouTubeConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| AppError::MissingConfigError {
                field: "source.youtube.api_key".to_string(),
            })?
            .to_string();
        let channel_id = config
            .channel_id()
            .ok_or_else(|| AppError::MissingConfigError {
                field: "source.youtube.channel_id".to_string(),
            })?
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
            channel_id,
        })
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), resource);
        let max_attempts = self.config.retry_attempts() + 1;
        let mut attempt = 0;

        loop {
            attempt += 1;
            tracing::debug!("GET {} (attempt {}/{})", url, attempt, max_attempts);

            let outcome = self
                .client
                .get(&url)
                .query(&[("key", self.api_key.as_str())])
                .query(params)
                .send()
                .await;

            let error = match outcome {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.json::<T>().await?);
                }
                Ok(response) => {
                    let status = response.status();
                    let message = response.text().await.unwrap_or_default();
                    let error = AppError::ApiStatusError {
                        status: status.as_u16(),
                        message,
                    };
                    if !is_retryable(status) {
                        return Err(error);
                    }
                    error
                }
                Err(e) => AppError::ApiError(e),
            };

            if attempt >= max_attempts {
                return Err(error);
            }

            tracing::warn!(
                "YouTube {} request failed ({}), retrying in {}s",
                resource,
                error,
                self.config.retry_delay_seconds()
            );
            tokio::time::sleep(Duration::from_secs(self.config.retry_delay_seconds())).await;
        }
    }

    /// Looks up details for the given ids, 50 per request.
    async fn video_details(&self, video_ids: &[String]) -> Result<Vec<CatalogEntry>> {
        let fetched_at = Utc::now();
        let mut entries = Vec::with_capacity(video_ids.len());

        for chunk in video_ids.chunks(YOUTUBE_MAX_RESULTS) {
            let page: Page<VideoItem> = self
                .get_json(
                    "videos",
                    &[
                        ("part", "snippet,contentDetails,statistics".to_string()),
                        ("id", chunk.join(",")),
                    ],
                )
                .await?;
            entries.extend(page.items.into_iter().map(|item| item.into_entry(fetched_at)));
        }

        Ok(entries)
    }

    async fn search_video_ids(&self, query: &CatalogQuery) -> Result<Vec<String>> {
        let max_results = query
            .limit
            .unwrap_or_else(|| self.config.max_results())
            .clamp(1, YOUTUBE_MAX_RESULTS);
        let order = query
            .order_by
            .as_deref()
            .filter(|order| SEARCH_ORDERS.contains(order))
            .unwrap_or("date");

        let page: Page<SearchItem> = self
            .get_json(
                "search",
                &[
                    ("part", "id".to_string()),
                    ("channelId", self.channel_id.clone()),
                    ("type", "video".to_string()),
                    ("maxResults", max_results.to_string()),
                    ("order", order.to_string()),
                ],
            )
            .await?;

        Ok(page
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect())
    }

    async fn uploads_playlist_id(&self) -> Result<Option<String>> {
        let page: Page<ChannelItem> = self
            .get_json(
                "channels",
                &[
                    ("part", "contentDetails".to_string()),
                    ("id", self.channel_id.clone()),
                ],
            )
            .await?;

        Ok(page
            .items
            .into_iter()
            .next()
            .map(|item| item.content_details.related_playlists.uploads))
    }

    /// Every upload of the channel with statistics, following playlist pages.
    pub async fn fetch_channel_uploads(&self) -> Result<Vec<CatalogEntry>> {
        let Some(playlist_id) = self.uploads_playlist_id().await? else {
            tracing::warn!("Channel {} not found", self.channel_id);
            return Ok(Vec::new());
        };
        tracing::info!("Uploads playlist for {}: {}", self.channel_id, playlist_id);

        let mut video_ids = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page_count = 0;

        loop {
            let mut params = vec![
                ("part", "snippet".to_string()),
                ("playlistId", playlist_id.clone()),
                ("maxResults", YOUTUBE_MAX_RESULTS.to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }

            let page: Page<PlaylistItem> = self.get_json("playlistItems", &params).await?;
            let before = video_ids.len();
            video_ids.extend(
                page.items
                    .into_iter()
                    .filter_map(|item| item.snippet.resource_id.video_id),
            );
            page_count += 1;
            tracing::info!(
                "Playlist page {}: {} ids ({} total)",
                page_count,
                video_ids.len() - before,
                video_ids.len()
            );

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        if video_ids.is_empty() {
            tracing::warn!("Channel {} has no uploads", self.channel_id);
            return Ok(Vec::new());
        }

        self.video_details(&video_ids).await
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[async_trait]
impl VideoSource for YouTubeSource {
    async fn fetch_catalog(&self, query: &CatalogQuery) -> Result<Vec<Video>> {
        let video_ids = self.search_video_ids(query).await?;
        if video_ids.is_empty() {
            tracing::warn!("No videos found for channel {}", self.channel_id);
            return Ok(Vec::new());
        }

        let entries = self.video_details(&video_ids).await?;
        log_unplayable(&entries);
        Ok(entries
            .iter()
            .filter(|entry| matches_filters(entry, query))
            .map(Video::from)
            .collect())
    }

    fn name(&self) -> &str {
        "youtube"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config_for(server: &MockServer) -> YouTubeConfig {
        YouTubeConfig {
            api_key: Some("test-key".to_string()),
            channel_id: Some("UCchannel".to_string()),
            base_url: server.base_url(),
            retry_attempts: Some(1),
            retry_delay_seconds: Some(0),
            ..YouTubeConfig::default()
        }
    }

    fn video_json(id: &str, duration: &str, views: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "snippet": {
                "title": format!("Title {}", id),
                "channelId": "UCchannel",
                "publishedAt": "2024-03-01T10:00:00Z",
                "thumbnails": {"default": {"url": format!("https://i.ytimg.com/vi/{}/default.jpg", id)}}
            },
            "contentDetails": {"duration": duration},
            "statistics": {"viewCount": views, "likeCount": "5", "commentCount": "1"}
        })
    }

    #[test]
    fn test_missing_credentials() {
        let result = YouTubeSource::new(YouTubeConfig::default());
        assert!(matches!(result, Err(AppError::MissingConfigError { .. })));
    }

    #[tokio::test]
    async fn test_fetch_catalog_search_then_details() {
        let server = MockServer::start();

        let search = server.mock(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("key", "test-key")
                .query_param("channelId", "UCchannel")
                .query_param("maxResults", "50")
                .query_param("order", "date");
            then.status(200).json_body(serde_json::json!({
                "items": [
                    {"id": {"kind": "youtube#video", "videoId": "v1"}},
                    {"id": {"kind": "youtube#video", "videoId": "v2"}}
                ]
            }));
        });

        let details = server.mock(|when, then| {
            when.method(GET).path("/videos").query_param("id", "v1,v2");
            then.status(200).json_body(serde_json::json!({
                "items": [
                    video_json("v1", "PT4M30S", "100"),
                    video_json("v2", "PT1H2M", "2000")
                ]
            }));
        });

        let source = YouTubeSource::new(config_for(&server)).unwrap();
        let videos = source.fetch_catalog(&CatalogQuery::default()).await.unwrap();

        search.assert();
        details.assert();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].duration, 270);
        assert_eq!(videos[1].duration, 3720);
        assert_eq!(
            videos[0].url.as_deref(),
            Some("https://www.youtube.com/watch?v=v1")
        );
    }

    #[tokio::test]
    async fn test_fetch_catalog_applies_filters() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/search").query_param("maxResults", "10");
            then.status(200).json_body(serde_json::json!({
                "items": [{"id": {"videoId": "v1"}}, {"id": {"videoId": "v2"}}]
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/videos");
            then.status(200).json_body(serde_json::json!({
                "items": [
                    video_json("v1", "PT4M30S", "100"),
                    video_json("v2", "PT1H2M", "2000")
                ]
            }));
        });

        let source = YouTubeSource::new(config_for(&server)).unwrap();
        let query = CatalogQuery {
            limit: Some(10),
            max_duration: Some(600),
            ..CatalogQuery::default()
        };
        let videos = source.fetch_catalog(&query).await.unwrap();

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, "v1");
    }

    #[tokio::test]
    async fn test_live_broadcasts_are_skipped() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(serde_json::json!({
                "items": [{"id": {"videoId": "live"}}, {"id": {"videoId": "v1"}}]
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/videos");
            then.status(200).json_body(serde_json::json!({
                "items": [
                    video_json("live", "P0D", "0"),
                    video_json("v1", "PT4M30S", "100")
                ]
            }));
        });

        let source = YouTubeSource::new(config_for(&server)).unwrap();
        let videos = source.fetch_catalog(&CatalogQuery::default()).await.unwrap();

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, "v1");
        assert!(videos.iter().all(|v| v.duration > 0));
    }

    #[tokio::test]
    async fn test_empty_search_skips_details() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(serde_json::json!({"items": []}));
        });
        let details = server.mock(|when, then| {
            when.method(GET).path("/videos");
            then.status(200).json_body(serde_json::json!({"items": []}));
        });

        let source = YouTubeSource::new(config_for(&server)).unwrap();
        let videos = source.fetch_catalog(&CatalogQuery::default()).await.unwrap();

        assert!(videos.is_empty());
        details.assert_hits(0);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start();

        let search = server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(403).body("quotaExceeded");
        });

        let source = YouTubeSource::new(config_for(&server)).unwrap();
        let result = source.fetch_catalog(&CatalogQuery::default()).await;

        assert!(matches!(
            result,
            Err(AppError::ApiStatusError { status: 403, .. })
        ));
        search.assert_hits(1);
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let server = MockServer::start();

        let search = server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(503);
        });

        let source = YouTubeSource::new(config_for(&server)).unwrap();
        let result = source.fetch_catalog(&CatalogQuery::default()).await;

        assert!(matches!(
            result,
            Err(AppError::ApiStatusError { status: 503, .. })
        ));
        search.assert_hits(2);
    }

    #[tokio::test]
    async fn test_fetch_channel_uploads_follows_pages() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/channels").query_param("id", "UCchannel");
            then.status(200).json_body(serde_json::json!({
                "items": [{"contentDetails": {"relatedPlaylists": {"uploads": "UUchannel"}}}]
            }));
        });
        // Registered first so it takes precedence for the follow-up request.
        let second_page = server.mock(|when, then| {
            when.method(GET)
                .path("/playlistItems")
                .query_param("pageToken", "NEXT");
            then.status(200).json_body(serde_json::json!({
                "items": [{"snippet": {"resourceId": {"videoId": "v3"}}}]
            }));
        });
        let first_page = server.mock(|when, then| {
            when.method(GET)
                .path("/playlistItems")
                .query_param("playlistId", "UUchannel");
            then.status(200).json_body(serde_json::json!({
                "items": [
                    {"snippet": {"resourceId": {"videoId": "v1"}}},
                    {"snippet": {"resourceId": {"videoId": "v2"}}}
                ],
                "nextPageToken": "NEXT"
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/videos").query_param("id", "v1,v2,v3");
            then.status(200).json_body(serde_json::json!({
                "items": [
                    video_json("v1", "PT1M", "10"),
                    video_json("v2", "PT2M", "20"),
                    video_json("v3", "PT3M", "30")
                ]
            }));
        });

        let source = YouTubeSource::new(config_for(&server)).unwrap();
        let entries = source.fetch_channel_uploads().await.unwrap();

        first_page.assert();
        second_page.assert();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].video_id, "v3");
        assert_eq!(entries[2].duration_seconds, 180);
        assert_eq!(entries[2].view_count, 30);
        assert_eq!(entries[2].like_count, 5);
        assert!(entries[2].published_at.is_some());
        assert!(entries[2].thumbnail_url.is_some());
    }

    #[tokio::test]
    async fn test_unknown_channel_yields_nothing() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/channels");
            then.status(200).json_body(serde_json::json!({"items": []}));
        });

        let source = YouTubeSource::new(config_for(&server)).unwrap();
        assert!(source.fetch_channel_uploads().await.unwrap().is_empty());
    }
}
