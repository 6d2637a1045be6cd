use anyhow::Result;
use clap::Parser;
use evidence_panel::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Routes all log::info!() etc. to the debug log file.
    // CLI --log-level takes precedence over RUST_LOG and DEBUG_LEVEL.
    evidence_panel::debug::init_log_bridge(cli.log_level);

    log::info!("Starting evidence-panel {}", evidence_panel::VERSION);

    let mut stdout = std::io::stdout().lock();
    let result = cli::run(cli, &mut stdout);

    if let Err(ref e) = result {
        log::error!("Command failed: {e:#}");
    }
    log::logger().flush();
    result
}
