use clap::Parser;
use jaljalgotcha::api::views::to_views;
use jaljalgotcha::utils::duration::{format_duration, parse_target};
use jaljalgotcha::utils::error::{AppError, ErrorSeverity};
use jaljalgotcha::utils::{logger, validation::Validate};
use jaljalgotcha::{build_source, CliConfig, Combination, ComboService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting jaljalgotcha CLI");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(cli: &CliConfig) -> Result<(), AppError> {
    let config = cli.load_app_config()?;
    config.validate()?;

    let target = parse_target(&cli.duration)?;
    let source = build_source(config.source.kind, &config.source)?;
    let service = ComboService::new(source)
        .with_min_remaining(config.selection.min_remaining)
        .with_max_attempts(config.selection.max_attempts)
        .with_seed(config.selection.seed)
        .with_parallel(config.selection.parallel);

    let combinations = service
        .combinations(target, config.selection.attempts, &cli.filters())
        .await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&to_views(&combinations))?);
    } else {
        print_combinations(target, &combinations);
    }

    Ok(())
}

fn print_combinations(target: i64, combinations: &[Combination]) {
    println!("🎯 Target: {}", format_duration(target));

    for (rank, combination) in combinations.iter().enumerate() {
        println!();
        println!(
            "#{}  total {}  remaining {}  ({} videos)",
            rank + 1,
            format_duration(combination.total_duration),
            format_duration(combination.remaining),
            combination.len()
        );
        for video in &combination.items {
            println!(
                "    {}  {}  {}",
                format_duration(video.duration),
                video.title,
                video.url.as_deref().unwrap_or(&video.id)
            );
        }
    }
}
