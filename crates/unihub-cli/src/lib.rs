pub mod cli;
pub mod dispatch;
pub mod headless;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use unihub_app::App;
use unihub_core::backend::Backend;
use unihub_core::logging;
use unihub_core::process_backend::ProcessBackend;

use crate::cli::Cli;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    if let Err(error) = logging::init() {
        eprintln!("Warning: logging disabled: {error:#}");
    }

    let config = App::ensure_config_ready()?;
    let backend: Arc<dyn Backend> = Arc::new(ProcessBackend::from_config(&config.backend));

    dispatch::run_with_deps(cli, backend, &config)
}
