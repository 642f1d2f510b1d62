use crate::core::selection::{self, SelectionParams};
use crate::domain::model::{CatalogQuery, Combination, OrderDir, VideoFilters};
use crate::domain::ports::VideoSource;
use crate::utils::error::Result;
use crate::utils::validation::validate_attempts;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

pub struct ComboService<S: VideoSource> {
    source: S,
    min_remaining: i64,
    max_attempts: usize,
    seed: Option<u64>,
    parallel: bool,
}

impl<S: VideoSource> ComboService<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            min_remaining: selection::DEFAULT_MIN_REMAINING,
            max_attempts: selection::DEFAULT_MAX_ATTEMPTS,
            seed: None,
            parallel: false,
        }
    }

    pub fn with_min_remaining(mut self, min_remaining: i64) -> Self {
        self.min_remaining = min_remaining;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Fixes the random seed so every call returns the same selection.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Maps search-API style filters onto the catalog query vocabulary.
    pub fn convert_filters(filters: &VideoFilters) -> CatalogQuery {
        CatalogQuery {
            limit: filters.max_results,
            order_by: filters.order.clone(),
            order_dir: filters.order.as_deref().map(|order| {
                if order == "date" {
                    OrderDir::Desc
                } else {
                    OrderDir::Asc
                }
            }),
            max_duration: filters.max_duration,
            min_likes: filters.min_likes,
            min_views: filters.min_views,
        }
    }

    pub async fn combinations(
        &self,
        target: i64,
        attempts: usize,
        filters: &VideoFilters,
    ) -> Result<Vec<Combination>> {
        validate_attempts(attempts, self.max_attempts)?;

        let query = Self::convert_filters(filters);
        let videos = self.source.fetch_catalog(&query).await?;
        tracing::info!(
            "Fetched {} videos from {} source",
            videos.len(),
            self.source.name()
        );

        let params = SelectionParams {
            attempts,
            min_remaining: self.min_remaining,
        };
        let seed = self.seed.unwrap_or_else(|| rand::thread_rng().gen());

        let combinations = if self.parallel {
            selection::select_many_parallel(Arc::from(videos), target, params, seed).await
        } else {
            let mut rng = StdRng::seed_from_u64(seed);
            selection::select_many_with(&videos, target, &params, &mut rng)
        };

        if let Some(best) = combinations.first() {
            tracing::debug!(
                "Best of {} combinations: {} videos, {}s total, {}s remaining",
                combinations.len(),
                best.len(),
                best.total_duration,
                best.remaining
            );
        }

        Ok(combinations)
    }

    /// Like [`combinations`](Self::combinations) but draws from the caller's RNG.
    pub async fn combinations_with_rng<R: Rng + Send>(
        &self,
        target: i64,
        attempts: usize,
        filters: &VideoFilters,
        rng: &mut R,
    ) -> Result<Vec<Combination>> {
        validate_attempts(attempts, self.max_attempts)?;

        let query = Self::convert_filters(filters);
        let videos = self.source.fetch_catalog(&query).await?;
        tracing::debug!("Fetched {} videos from {} source", videos.len(), self.source.name());

        let params = SelectionParams {
            attempts,
            min_remaining: self.min_remaining,
        };
        Ok(selection::select_many_with(&videos, target, &params, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemorySource;
    use crate::utils::error::AppError;

    #[test]
    fn test_convert_filters_date_order_is_descending() {
        let filters = VideoFilters {
            max_results: Some(20),
            order: Some("date".to_string()),
            max_duration: Some(600),
            min_likes: Some(10),
            min_views: None,
        };

        let query = ComboService::<MemorySource>::convert_filters(&filters);
        assert_eq!(query.limit, Some(20));
        assert_eq!(query.order_by.as_deref(), Some("date"));
        assert_eq!(query.order_dir, Some(OrderDir::Desc));
        assert_eq!(query.max_duration, Some(600));
        assert_eq!(query.min_likes, Some(10));
        assert_eq!(query.min_views, None);
    }

    #[test]
    fn test_convert_filters_other_order_is_ascending() {
        let filters = VideoFilters {
            order: Some("viewCount".to_string()),
            ..VideoFilters::default()
        };

        let query = ComboService::<MemorySource>::convert_filters(&filters);
        assert_eq!(query.order_dir, Some(OrderDir::Asc));
    }

    #[test]
    fn test_convert_empty_filters() {
        let query = ComboService::<MemorySource>::convert_filters(&VideoFilters::default());
        assert!(query.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_zero_attempts() {
        let service = ComboService::new(MemorySource::new());
        let result = service.combinations(600, 0, &VideoFilters::default()).await;
        assert!(matches!(result, Err(AppError::InvalidAttempts { attempts: 0 })));
    }

    #[tokio::test]
    async fn test_rejects_attempts_above_cap() {
        let service = ComboService::new(MemorySource::new())
            .with_max_attempts(10)
            .with_parallel(true);
        let result = service
            .combinations(600, 1_000_000_000_000, &VideoFilters::default())
            .await;
        assert!(matches!(result, Err(AppError::TooManyAttempts { max: 10, .. })));
    }

    #[tokio::test]
    async fn test_combinations_from_memory_source() {
        let service = ComboService::new(MemorySource::new()).with_seed(Some(3));
        let combinations = service
            .combinations(1800, 5, &VideoFilters::default())
            .await
            .unwrap();

        assert_eq!(combinations.len(), 5);
        assert!(combinations.windows(2).all(|w| w[0].remaining <= w[1].remaining));
        for combination in &combinations {
            assert!(combination.total_duration <= 1800);
        }
    }

    #[tokio::test]
    async fn test_seeded_service_is_reproducible() {
        let sequential = ComboService::new(MemorySource::new()).with_seed(Some(21));
        let first = sequential.combinations(1200, 3, &VideoFilters::default()).await.unwrap();
        let second = sequential.combinations(1200, 3, &VideoFilters::default()).await.unwrap();
        assert_eq!(first, second);

        let parallel = ComboService::new(MemorySource::new())
            .with_seed(Some(21))
            .with_parallel(true);
        let third = parallel.combinations(1200, 3, &VideoFilters::default()).await.unwrap();
        let fourth = parallel.combinations(1200, 3, &VideoFilters::default()).await.unwrap();
        assert_eq!(third, fourth);
    }

    #[test]
    fn test_combinations_with_rng() {
        let service = ComboService::new(MemorySource::new()).with_min_remaining(0);
        let mut rng = StdRng::seed_from_u64(8);

        let combinations = tokio_test::block_on(service.combinations_with_rng(
            600,
            2,
            &VideoFilters::default(),
            &mut rng,
        ))
        .unwrap();

        assert_eq!(combinations.len(), 2);
        assert_eq!(service.source_name(), "memory");
    }
}
