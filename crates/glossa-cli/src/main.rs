//! `glossa` update binary.
//!
//! Reads `glossa.toml` (or the path given with `--config`), merges the scan
//! files of every configured scan directory into the translation files of
//! one locale, and reports added and deleted messages.
//!
//! # Usage
//!
//! ```
//! glossa --locale fr
//! GLOSSA_KEEP_OLD_MESSAGES=true glossa --config app/glossa.toml --dry-run
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use glossa_cli::{UpdateConfig, Updater};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Update translation files from extracted messages")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "glossa.toml")]
  config: PathBuf,

  /// Locale to update; overrides the configured one.
  #[arg(short, long)]
  locale: Option<String>,

  /// Only update this domain (repeatable).
  #[arg(short, long = "domain", value_name = "DOMAIN")]
  domains: Vec<String>,

  /// Keep messages that are no longer found in the scan.
  #[arg(long)]
  keep_old_messages: bool,

  /// Report changes without writing any file.
  #[arg(long)]
  dry_run: bool,
}

fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration: file, then environment, then flags.
  let mut builder = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(
      config::Environment::with_prefix("GLOSSA")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("scan_dirs")
        .with_list_parse_key("domains")
        .with_list_parse_key("ignored_domains"),
    )
    .set_override_option("locale", cli.locale)?;
  if !cli.domains.is_empty() {
    builder = builder.set_override("domains", cli.domains)?;
  }
  if cli.keep_old_messages {
    builder = builder.set_override("keep_old_messages", true)?;
  }
  let settings = builder
    .build()
    .with_context(|| format!("failed to read {}", cli.config.display()))?;

  let update_cfg: UpdateConfig = settings
    .try_deserialize()
    .context("failed to deserialise UpdateConfig")?;

  let updater = Updater::new(update_cfg).context("invalid configuration")?;
  let report = updater
    .process(cli.dry_run)
    .context("translation update failed")?;

  for key in &report.changes.added {
    tracing::info!("+ {key}");
  }
  for key in &report.changes.deleted {
    tracing::info!("- {key}");
  }
  tracing::info!(
    "{} added, {} deleted, {} file(s) {}",
    report.changes.added.len(),
    report.changes.deleted.len(),
    report.files.len(),
    if cli.dry_run { "checked" } else { "written" }
  );

  Ok(())
}
