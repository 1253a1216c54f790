use clap::Parser;
use pyrin_swagger::cli::{run_cli, Cli};
use pyrin_swagger::logging::{init_logging_with_config, LogConfig};

fn main() -> anyhow::Result<()> {
    let _log_guard = init_logging_with_config(&LogConfig::from_env())?;
    run_cli(Cli::parse())
}
