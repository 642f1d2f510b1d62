use anyhow::Result;
use chrono::Utc;
use httpmock::prelude::*;
use jaljalgotcha::config::toml_config::YouTubeConfig;
use jaljalgotcha::domain::model::CatalogEntry;
use jaljalgotcha::{
    AppConfig, CatalogFileSource, ComboService, LocalStorage, SourceKind, VideoFilters,
    YouTubeSource,
};
use std::collections::HashSet;
use tempfile::TempDir;

fn entry(id: &str, duration: i64, views: u64) -> CatalogEntry {
    CatalogEntry {
        video_id: id.to_string(),
        channel_id: "UCtest".to_string(),
        title: format!("Clip {}", id),
        duration_seconds: duration,
        view_count: views,
        like_count: views / 10,
        comment_count: 0,
        thumbnail_url: None,
        published_at: None,
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_catalog_file_feeds_selection() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().to_string_lossy().to_string();

    let catalog = CatalogFileSource::new(LocalStorage::new(path.clone()));
    catalog
        .upsert(vec![
            entry("a", 120, 100),
            entry("b", 180, 5_000),
            entry("c", 300, 50),
            entry("d", 240, 8_000),
            entry("e", 150, 900),
            entry("f", 1_200, 10_000),
        ])
        .await?;

    let service = ComboService::new(CatalogFileSource::new(LocalStorage::new(path))).with_seed(Some(5));
    let filters = VideoFilters {
        max_duration: Some(600),
        min_views: Some(100),
        ..VideoFilters::default()
    };

    let combinations = service.combinations(600, 10, &filters).await?;
    assert_eq!(combinations.len(), 10);

    let allowed: HashSet<&str> = ["a", "b", "d", "e"].into_iter().collect();
    for combination in &combinations {
        assert!(combination.total_duration <= 600);
        for video in &combination.items {
            assert!(allowed.contains(video.id.as_str()), "{} passed the filters", video.id);
        }
    }
    assert!(combinations
        .windows(2)
        .all(|pair| pair[0].remaining <= pair[1].remaining));

    Ok(())
}

#[tokio::test]
async fn test_fetched_uploads_are_stored_and_selectable() {
    let server = MockServer::start();
    let temp_dir = TempDir::new().unwrap();

    server.mock(|when, then| {
        when.method(GET).path("/channels");
        then.status(200).json_body(serde_json::json!({
            "items": [{"contentDetails": {"relatedPlaylists": {"uploads": "UUx"}}}]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/playlistItems");
        then.status(200).json_body(serde_json::json!({
            "items": [
                {"snippet": {"resourceId": {"videoId": "v1"}}},
                {"snippet": {"resourceId": {"videoId": "v2"}}}
            ]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/videos");
        then.status(200).json_body(serde_json::json!({
            "items": [
                {
                    "id": "v1",
                    "snippet": {"title": "Short", "channelId": "UCx", "publishedAt": "2023-05-01T00:00:00Z"},
                    "contentDetails": {"duration": "PT3M"},
                    "statistics": {"viewCount": "10"}
                },
                {
                    "id": "v2",
                    "snippet": {"title": "Long", "channelId": "UCx"},
                    "contentDetails": {"duration": "PT6M"},
                    "statistics": {}
                }
            ]
        }));
    });

    let mut config = AppConfig::default();
    config.source.kind = SourceKind::Catalog;
    config.source.catalog_path = temp_dir.path().to_str().unwrap().to_string();
    config.source.youtube = YouTubeConfig {
        api_key: Some("k".to_string()),
        channel_id: Some("UCx".to_string()),
        base_url: server.base_url(),
        ..YouTubeConfig::default()
    };

    let youtube = YouTubeSource::new(config.source.youtube.clone()).unwrap();
    let entries = youtube.fetch_channel_uploads().await.unwrap();
    assert_eq!(entries.len(), 2);

    let storage = LocalStorage::new(config.source.catalog_path.clone());
    let summary = CatalogFileSource::new(storage).upsert(entries).await.unwrap();
    assert_eq!(summary.inserted, 2);

    let source = jaljalgotcha::build_source(config.source.kind, &config.source).unwrap();
    let service = ComboService::new(source).with_min_remaining(0);
    let combinations = service
        .combinations(540, 3, &VideoFilters::default())
        .await
        .unwrap();

    for combination in combinations {
        assert_eq!(combination.total_duration, 540);
        assert_eq!(combination.remaining, 0);
        assert_eq!(combination.len(), 2);
    }
}
