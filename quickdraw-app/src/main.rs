use anyhow::Result;
use clap::Parser;
use quickdraw_common::observability::{init_logging, LogConfig};
use quickdraw_config::{QuickdrawConfig, QuickdrawConfigLoader};
use std::path::PathBuf;

mod harvest;

#[derive(Parser, Debug)]
#[command(
    name = "quickdraw",
    about = "Harvest lottery quick tips into CSV sample tables"
)]
struct Cli {
    /// Configuration file (YAML); a missing file falls back to defaults
    /// plus QUICKDRAW_* environment overrides
    #[arg(long, default_value = "quickdraw.yaml")]
    config: PathBuf,

    /// Number of picks to collect this run
    #[arg(long)]
    count: Option<u32>,

    /// Directory receiving the sample-<k>.csv tables
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Run the browser with a visible window
    #[arg(long)]
    headed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (env wins over file, flags win over both)
    let mut loader = QuickdrawConfigLoader::new();
    if cli.config.exists() {
        loader = loader.with_file(&cli.config);
    }
    let mut cfg: QuickdrawConfig = loader.load()?;
    if let Some(count) = cli.count {
        cfg.sampling.count = count;
    }
    if let Some(data_dir) = cli.data_dir {
        cfg.storage.data_dir = data_dir;
    }
    if cli.headed {
        cfg.site.headless = false;
    }
    cfg.validate()?;

    init_logging(LogConfig::default())?;

    let report = harvest::run(&cfg).await?;

    match &report.output {
        Some(path) => println!(
            "collected {} of {} requested samples -> {}",
            report.collected,
            report.requested,
            path.display()
        ),
        None => println!(
            "collected {} of {} requested samples; nothing persisted",
            report.collected, report.requested
        ),
    }
    Ok(())
}
