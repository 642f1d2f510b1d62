use clap::Parser;
use jaljalgotcha::adapters::{CatalogFileSource, LocalStorage, YouTubeSource};
use jaljalgotcha::utils::logger;
use jaljalgotcha::AppConfig;

#[derive(Parser)]
#[command(name = "fetch-catalog")]
#[command(about = "Download a channel's uploads into the local catalog file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, env = "JALJALGOTCHA_CONFIG")]
    config: Option<String>,

    /// Override the channel from the configuration
    #[arg(long)]
    channel_id: Option<String>,

    /// Override the catalog directory from the configuration
    #[arg(long)]
    catalog_path: Option<String>,

    /// Fetch and report without writing the catalog
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let mut config = match &args.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => AppConfig::from_env(),
    };

    if let Some(channel_id) = args.channel_id {
        config.source.youtube.channel_id = Some(channel_id);
    }
    if let Some(catalog_path) = args.catalog_path {
        config.source.catalog_path = catalog_path;
    }

    if let Err(e) = config.validate_youtube_credentials() {
        tracing::error!("❌ {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let youtube = YouTubeSource::new(config.source.youtube.clone())?;
    tracing::info!("🚀 Fetching uploads of channel {}", youtube.channel_id());

    let entries = youtube.fetch_channel_uploads().await?;
    tracing::info!("📥 Fetched {} videos", entries.len());

    if args.dry_run {
        for entry in &entries {
            println!("{}\t{}s\t{}", entry.video_id, entry.duration_seconds, entry.title);
        }
        tracing::info!("🔍 DRY RUN MODE - catalog not written");
        return Ok(());
    }

    let catalog = CatalogFileSource::new(LocalStorage::new(config.source.catalog_path.clone()));
    let summary = catalog.upsert(entries).await?;

    tracing::info!(
        "✅ Catalog updated in {}: {} new, {} updated",
        config.source.catalog_path,
        summary.inserted,
        summary.updated
    );
    println!(
        "✅ {} new, {} updated videos saved to {}",
        summary.inserted, summary.updated, config.source.catalog_path
    );

    Ok(())
}
