//! Command line entry point printing the precache manifest for a built site.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use precache_manifest::config::DEFAULT_CONFIG_FILE;
use precache_manifest::{PrecacheBuilder, PrecacheConfig, SizeBudget};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "precache-manifest")]
#[command(about = "Generate a deterministic, content-hashed precache manifest")]
#[command(version)]
struct Cli {
  /// Configuration file (defaults to precache.config.json in the working directory)
  #[arg(long)]
  config: Option<PathBuf>,

  /// Build root holding the built assets (overrides the configuration)
  #[arg(long)]
  root: Option<PathBuf>,

  /// Glob pattern relative to the build root; repeat to replace the configured list
  #[arg(long = "pattern", value_name = "GLOB")]
  patterns: Vec<String>,

  /// Largest file in bytes that may be precached (overrides the configuration)
  #[arg(long, value_name = "BYTES")]
  max_size: Option<u64>,

  /// Compare against a previously generated manifest and fail when it differs
  #[arg(long, value_name = "FILE")]
  check: Option<PathBuf>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let (mut config, base_dir) = load_config(cli.config.as_deref())?;

  if !cli.patterns.is_empty() {
    config.glob_patterns = cli.patterns;
  }
  if let Some(max_size) = cli.max_size {
    config.maximum_file_size_bytes = SizeBudget(max_size);
  }

  let builder = match &cli.root {
    Some(root) => {
      config.build_root = root.to_string_lossy().into_owned();
      PrecacheBuilder::new(&config)
    }
    None => PrecacheBuilder::new(&config).with_base_dir(&base_dir),
  };

  let artifacts = builder.build().with_context(|| {
    format!(
      "failed to generate precache manifest for {}",
      builder.build_root().display()
    )
  })?;

  if let Some(previous_path) = &cli.check {
    let previous = fs::read_to_string(previous_path)
      .with_context(|| format!("failed to read {}", previous_path.display()))?;
    if artifacts.differs_from(&previous) {
      bail!(
        "precache manifest differs from {}; clients will refetch",
        previous_path.display()
      );
    }
    tracing::info!(path = %previous_path.display(), "precache manifest unchanged");
    return Ok(());
  }

  println!("{}", artifacts.manifest_json);
  Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<(PrecacheConfig, PathBuf)> {
  match explicit {
    Some(path) => {
      let config = PrecacheConfig::from_path(path)?;
      let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
      Ok((config, base_dir))
    }
    None => {
      let cwd = std::env::current_dir().context("failed to resolve working directory")?;
      let config = PrecacheConfig::discover(&cwd)
        .with_context(|| format!("failed to load {DEFAULT_CONFIG_FILE}"))?;
      Ok((config, cwd))
    }
  }
}
