//! Chips CLI
//!
//! Resolves, classifies and prints toolbar status chips for a registry
//! snapshot, once or every time the snapshot changes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use chips::config::{ChipsConfig, OutputFormat, Overrides};
use chips::present::OutputPresenter;
use chips::snapshot::{SnapshotLoader, SnapshotWatcher, reload};
use status_chips::{Attributes, ChipEntity, ScopeConfig, StatusChips};

/// Toolbar status chips
#[derive(Parser, Debug)]
#[command(name = "chips")]
#[command(about = "Toolbar status chips for a registry snapshot", long_about = None)]
struct Args {
    /// Configuration file (defaults to ./chips.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Registry snapshot document (.json or .toml)
    #[arg(short, long, global = true)]
    snapshot: Option<PathBuf>,

    /// Dashboard URL; its last path segment is the fallback area
    #[arg(long, global = true)]
    url: Option<String>,

    /// Area to show chips for
    #[arg(long, global = true)]
    area: Option<String>,

    /// Additional label status entities must carry
    #[arg(long = "label", global = true)]
    additional_label: Option<String>,

    /// Label that overrides every other scoping rule
    #[arg(long, global = true)]
    solo_label: Option<String>,

    /// Main dashboard path (default "home")
    #[arg(long, global = true)]
    status_path: Option<String>,

    /// Hide chips flagged exclude_on_status_path
    #[arg(long, global = true)]
    optional: bool,

    /// Output format for chip lists
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve and print the chips for the snapshot once
    Render,
    /// Print a suggested configuration for a new card
    Stub,
    /// Classify a single state
    Classify {
        /// Raw state value
        #[arg(long)]
        state: Option<String>,
        /// Attribute bag as a JSON object
        #[arg(long, default_value = "{}")]
        attributes: String,
    },
    /// Re-render whenever the snapshot file changes
    Watch,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            snapshot: self.snapshot.clone(),
            url: self.url.clone(),
            format: self.format,
            scope: ScopeConfig {
                area: self.area.clone(),
                additional_label: self.additional_label.clone(),
                solo_label: self.solo_label.clone(),
                status_path: self.status_path.clone(),
                features: None,
            },
        }
        .with_optional(self.optional)
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chips=info,status_chips=info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let config = ChipsConfig::load(args.config.as_deref(), &args.overrides())
        .context("failed to load configuration")?;

    match args.command {
        Command::Render => render(config).await,
        Command::Stub => stub(config).await,
        Command::Classify { state, attributes } => classify(state, &attributes),
        Command::Watch => watch(config).await,
    }
}

fn card(config: &ChipsConfig) -> StatusChips<OutputPresenter> {
    let card = StatusChips::new(
        config.scope.clone(),
        OutputPresenter::stdout(config.output.format),
    );
    match &config.url {
        Some(url) => card.with_url(url),
        None => card,
    }
}

async fn render(config: ChipsConfig) -> Result<()> {
    let registries = SnapshotLoader::load(&config.snapshot).await?;
    let mut card = card(&config);
    card.update(&registries);
    Ok(())
}

async fn stub(config: ChipsConfig) -> Result<()> {
    let registries = SnapshotLoader::load(&config.snapshot).await?;
    let stub = registries.stub_config();
    info!(area = %stub.area, "suggested stub configuration");
    println!("{}", serde_json::to_string_pretty(&stub)?);
    Ok(())
}

fn classify(state: Option<String>, attributes: &str) -> Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(attributes).context("attributes must be JSON")?;
    let attributes = Attributes::try_from(value)
        .map_err(|v| anyhow::anyhow!("attributes must be a JSON object, got {}", v))?;

    let view = ChipEntity::new("cli.state", state, attributes).view();
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

async fn watch(config: ChipsConfig) -> Result<()> {
    let mut card = card(&config);

    // Present whatever is there now; a bad snapshot just waits for the next write
    if let Err(e) = reload(&config.snapshot, &mut card).await {
        tracing::warn!("Initial snapshot not loaded: {}", e);
    }

    let watcher = SnapshotWatcher::new(&config.snapshot)
        .with_context(|| format!("failed to watch {}", config.snapshot.display()))?;

    tokio::select! {
        _ = watcher.run(&mut card) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }
    Ok(())
}
