use crate::config::toml_config::{AppConfig, SourceKind};
use crate::domain::model::VideoFilters;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "jaljalgotcha")]
#[command(about = "Pick video combinations that fill a target duration")]
pub struct CliConfig {
    /// Target duration: minutes (30) or HH:MM:SS / MM:SS (1:30:00)
    #[arg(short, long)]
    pub duration: String,

    /// Number of combinations to generate
    #[arg(short, long)]
    pub attempts: Option<usize>,

    /// Catalog source: memory, catalog or youtube
    #[arg(long)]
    pub source: Option<SourceKind>,

    /// Path to a TOML configuration file
    #[arg(short, long, env = "JALJALGOTCHA_CONFIG")]
    pub config: Option<String>,

    /// Directory holding catalog.json
    #[arg(long)]
    pub catalog_path: Option<String>,

    /// Skip videos longer than this many seconds
    #[arg(long)]
    pub max_duration: Option<i64>,

    #[arg(long)]
    pub min_likes: Option<u64>,

    #[arg(long)]
    pub min_views: Option<u64>,

    #[arg(long)]
    pub max_results: Option<usize>,

    /// date, rating, relevance, title, viewCount, videoCount
    #[arg(long)]
    pub order: Option<String>,

    /// Stop packing once this many seconds or fewer are left
    #[arg(long)]
    pub min_remaining: Option<i64>,

    /// Fix the random seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run attempts on separate blocking tasks
    #[arg(long)]
    pub parallel: bool,

    /// Print combinations as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// File (or environment) configuration with command line overrides applied.
    pub fn load_app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::from_env(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(kind) = self.source {
            config.source.kind = kind;
        }
        if let Some(path) = &self.catalog_path {
            config.source.catalog_path = path.clone();
        }
        if let Some(attempts) = self.attempts {
            config.selection.attempts = attempts;
        }
        if let Some(min_remaining) = self.min_remaining {
            config.selection.min_remaining = min_remaining;
        }
        if self.seed.is_some() {
            config.selection.seed = self.seed;
        }
        if self.parallel {
            config.selection.parallel = true;
        }
    }

    pub fn filters(&self) -> VideoFilters {
        VideoFilters {
            max_results: self.max_results,
            order: self.order.clone(),
            max_duration: self.max_duration,
            min_likes: self.min_likes,
            min_views: self.min_views,
        }
    }
}
