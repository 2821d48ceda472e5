use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use recent_tweets::cli::{Cli, Commands};
use recent_tweets::clock::{Clock, SystemClock};
use recent_tweets::config::Config;
use recent_tweets::logging::init_logging;
use recent_tweets::render::Renderer;
use recent_tweets::services::{CacheService, TimelineService};
use recent_tweets::sources::TwitterTimelineSource;
use recent_tweets::storage::{SqlitePostCacheRepository, SqliteStorage};

type Service = TimelineService<TwitterTimelineSource, SqlitePostCacheRepository>;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    init_logging(&config.log_level);

    let service = build_service(&config)?;

    match cli.command {
        Commands::Render { title } => cmd_render(&service, &config, title.as_deref()),
        Commands::List => cmd_list(&service, &config),
        Commands::ClearCache => cmd_clear_cache(&service),
        Commands::Status => cmd_status(&service),
    }
}

fn build_service(config: &Config) -> anyhow::Result<Service> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Initialize storage
    let storage = SqliteStorage::new(&config.db_path)
        .with_context(|| format!("Failed to open cache database at {}", config.db_path))?;
    let cache = CacheService::new(SqlitePostCacheRepository::new(storage), clock.clone());

    let source = TwitterTimelineSource::new(&config.api_url, config.request_timeout, clock)?;

    Ok(TimelineService::new(
        source,
        cache,
        config.normalizer()?,
        config.cache_ttl(),
    ))
}

fn cmd_render(service: &Service, config: &Config, title: Option<&str>) -> anyhow::Result<()> {
    let fetch_config = config.fetch_config()?;
    let result = service.get_posts(&fetch_config, &config.credentials);

    if let Err(e) = &result {
        warn!(error = %e, "Rendering empty widget");
    }

    print!("{}", Renderer::default().render_widget(title, &result));
    Ok(())
}

fn cmd_list(service: &Service, config: &Config) -> anyhow::Result<()> {
    let fetch_config = config.fetch_config()?;
    let posts = service
        .get_posts(&fetch_config, &config.credentials)
        .context("Could not load tweets")?;

    println!("{}", serde_json::to_string_pretty(&posts)?);
    Ok(())
}

fn cmd_clear_cache(service: &Service) -> anyhow::Result<()> {
    service.clear_cache()?;
    println!("Cache cleared!");
    Ok(())
}

fn cmd_status(service: &Service) -> anyhow::Result<()> {
    let Some(entry) = service.cache_entry()? else {
        println!("No tweets cached.");
        return Ok(());
    };

    let now = service.cache().now();
    if entry.is_expired(now) {
        println!(
            "{} tweets cached, expired at {}",
            entry.value.len(),
            entry.expires_at.to_rfc3339()
        );
    } else {
        println!(
            "{} tweets cached, expires at {}",
            entry.value.len(),
            entry.expires_at.to_rfc3339()
        );
    }

    for post in &entry.value {
        println!("  {} ({})", post.uri, post.created_at);
    }

    Ok(())
}
