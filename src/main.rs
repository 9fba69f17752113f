//! CLI entry point for the GTFS route filter.
//!
//! Filters routes.txt, trips.txt, and stop_times.txt down to an
//! allow-listed set of routes, then swaps the filtered tables over the
//! canonical file names in the destination directory.

use anyhow::{Result, bail};
use clap::Parser;
use gtfs_route_filter::config::FilterConfig;
use gtfs_route_filter::pipeline;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gtfs_route_filter")]
#[command(about = "Filter a GTFS feed down to an allow-listed set of routes", long_about = None)]
struct Cli {
    /// JSON config file with allowed_route_ids and directories
    #[arg(short, long)]
    config: Option<String>,

    /// Route id to keep (repeatable); overrides the config file's allow-set
    #[arg(short = 'r', long = "route", value_name = "ROUTE_ID")]
    routes: Vec<String>,

    /// Directory containing the source routes.txt, trips.txt, stop_times.txt
    #[arg(short, long, value_name = "DIR")]
    source_dir: Option<PathBuf>,

    /// Directory receiving the filtered and published tables
    #[arg(short, long, value_name = "DIR")]
    dest_dir: Option<PathBuf>,

    /// Treat a missing or empty source table as a hard error
    #[arg(long, default_value_t = false)]
    strict: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/gtfs_route_filter.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gtfs_route_filter.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    info!(
        routes = config.allowed_route_ids.len(),
        source = %config.source_directory.display(),
        dest = %config.destination_directory.display(),
        "Starting filter run"
    );

    let summary = pipeline::run(&config)?;

    if cli.strict && summary.any_failed() {
        bail!("one or more stages had a missing or empty source table");
    }
    if summary.all_failed() {
        bail!("every stage had a missing or empty source table; nothing was filtered");
    }

    info!(published = summary.published, "Filter run complete");
    Ok(())
}

/// Builds the effective config: the JSON file (if given) supplies the
/// base values, CLI flags override them, and bare-CLI runs fall back to
/// the conventional directory layout.
fn resolve_config(cli: &Cli) -> Result<FilterConfig> {
    let mut config = match &cli.config {
        Some(path) => FilterConfig::load(path)?,
        None => FilterConfig {
            allowed_route_ids: Default::default(),
            source_directory: PathBuf::from("gtfs_extracted"),
            destination_directory: PathBuf::from("assets/gtfs"),
        },
    };

    if !cli.routes.is_empty() {
        config.allowed_route_ids = cli.routes.iter().cloned().collect();
    }
    if let Some(dir) = &cli.source_dir {
        config.source_directory = dir.clone();
    }
    if let Some(dir) = &cli.dest_dir {
        config.destination_directory = dir.clone();
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("gtfs_route_filter").chain(args.iter().copied()))
    }

    #[test]
    fn test_resolve_config_from_flags_with_default_dirs() {
        let config = resolve_config(&cli(&["--route", "2", "--route", "3"])).unwrap();
        assert_eq!(config.allowed_route_ids.len(), 2);
        assert_eq!(config.source_directory, PathBuf::from("gtfs_extracted"));
        assert_eq!(config.destination_directory, PathBuf::from("assets/gtfs"));
    }

    #[test]
    fn test_resolve_config_requires_some_allow_set() {
        assert!(resolve_config(&cli(&[])).is_err());
    }

    #[test]
    fn test_resolve_config_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filter.json");
        std::fs::write(
            &path,
            r#"{
                "allowed_route_ids": ["3048"],
                "source_directory": "from_file_src",
                "destination_directory": "from_file_dest"
            }"#,
        )
        .unwrap();

        let config = resolve_config(&cli(&[
            "--config",
            path.to_str().unwrap(),
            "--route",
            "99",
            "--source-dir",
            "cli_src",
        ]))
        .unwrap();

        assert_eq!(config.allowed_route_ids.len(), 1);
        assert!(config.allowed_route_ids.contains("99"));
        assert_eq!(config.source_directory, PathBuf::from("cli_src"));
        assert_eq!(config.destination_directory, PathBuf::from("from_file_dest"));
    }
}
