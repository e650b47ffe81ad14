//! sparkctl - terminal editor for the Spark device library.

use std::sync::Arc;

use anyhow::Context;
use clap::{ColorChoice, Parser};
use spark_source::{GitHubClient, LocalSource, RemoteSource, Source, resolve_token};
use sparkctl::app::App;
use sparkctl::cli::{Cli, LogFormatArg, LogLevelArg};
use sparkctl::logging::{LogConfig, LogFormat, default_log_file, init_logging};
use sparkctl::runtime;
use sparkctl::settings::Settings;
use tracing::level_filters::LevelFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    if let Err(error) = run(&cli).await {
        tracing::error!("{error:#}");
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load_required(path)
            .with_context(|| format!("cannot use --config {}", path.display()))?,
        None => Settings::load(),
    };

    let source = build_source(cli, &settings).await?;
    tracing::info!("Starting sparkctl ({})", source.kind().badge());
    let app = App::new(source.kind(), source.can_write());
    runtime::run(app, source).await
}

async fn build_source(cli: &Cli, settings: &Settings) -> anyhow::Result<Arc<dyn Source>> {
    if cli.is_local() {
        let root = cli
            .path
            .clone()
            .unwrap_or_else(|| settings.local.path.clone());
        tracing::info!("Using local library at {}", root.display());
        return Ok(Arc::new(LocalSource::new(root)));
    }

    let remote = &settings.remote;
    let token = resolve_token()
        .await
        .context("no GitHub credentials found (use --local to edit a checkout on disk)")?;
    let client = GitHubClient::new(&remote.api_url, &remote.owner, &remote.repo, &token)
        .context("failed to create GitHub client")?;
    tracing::info!(
        "Using GitHub repository {}/{} ({})",
        remote.owner,
        remote.repo,
        remote.base_branch
    );
    Ok(Arc::new(RemoteSource::new(client, &remote.base_branch)))
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone().or_else(default_log_file);
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        // The log goes to a file, never a terminal.
        ColorChoice::Never | ColorChoice::Auto => false,
    };
    config
}
