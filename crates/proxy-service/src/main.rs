use anyhow::{Context, Result};
use clap::Parser;
use proxy_config::{ConfigLoader, ProxyConfig};
use proxy_service::{
	cli::{Args, Command},
	telemetry::{init_tracing, TracingConfig},
	ApiServer, AppState,
};
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	let config = load_config(&args).await?;

	let level = args
		.log_level
		.clone()
		.unwrap_or_else(|| config.logging.level.clone());
	let tracing_config = if args.json_logs || config.logging.json {
		TracingConfig::production()
	} else {
		TracingConfig::new()
	};
	init_tracing(&tracing_config.with_level(level))?;

	match args.command {
		Some(Command::Start) | None => start_service(config).await,
		Some(Command::Validate) => validate(&args, &config),
	}
}

async fn load_config(args: &Args) -> Result<ProxyConfig> {
	let mut loader = ConfigLoader::new();
	if let Some(path) = &args.config {
		loader = loader.with_file(path);
	}

	loader.load().await.context("Failed to load configuration")
}

async fn start_service(config: ProxyConfig) -> Result<()> {
	info!("Starting orchestrator proxy");
	info!("Production upstream: {}", config.upstream.prod_base_url);
	info!("Staging upstream: {}", config.upstream.staging_base_url);

	if config.upstream.api_key().is_none() {
		warn!("RHINESTONE_API_KEY is not set, proxy routes will answer 500");
	}

	let state = AppState::from_config(config).context("Failed to build application state")?;

	ApiServer::new(state).run(shutdown_signal()).await?;

	info!("Orchestrator proxy stopped");
	Ok(())
}

fn validate(args: &Args, config: &ProxyConfig) -> Result<()> {
	match &args.config {
		Some(path) => info!("Configuration file {:?} is valid", path),
		None => info!("Default configuration is valid"),
	}
	info!("Listen address: {}:{}", config.server.host, config.server.port);
	info!("Base path: {}", config.server.base_path);
	info!(
		"Retries: {} per endpoint, {}ms timeout",
		config.retry.max_retries, config.retry.timeout_ms
	);
	info!("API key configured: {}", config.upstream.api_key().is_some());

	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");
	};

	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("failed to install signal handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	info!("Shutdown signal received");
}
