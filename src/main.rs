use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use monedero::cli::Cli;
use monedero::config::{REPORT_FILE_NAME, app_paths, load_or_init_config};
use monedero::ledger::Ledger;
use monedero::shell;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = app_paths(cli.home.clone())?;
    let (cfg, cfg_path) = load_or_init_config(&paths)?;
    debug!(
        config = %cfg_path.display(),
        data_dir = %paths.data_dir.display(),
        "resolved app paths"
    );

    let report_path = cli
        .report_file
        .or_else(|| cfg.report_file.clone())
        .unwrap_or_else(|| PathBuf::from(REPORT_FILE_NAME));

    let mut ledger = Ledger::new();
    shell::run(&mut ledger, &cfg, &report_path)
}
