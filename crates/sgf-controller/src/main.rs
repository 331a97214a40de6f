//! sgfctl - command-line controller for the SGF sensor mesh

use std::process::ExitCode;

use clap::Parser;
use sgf_controller::runner::{install_interrupt_handler, run, spawn_console_reader};
use sgf_controller::{ControllerConfig, ControllerResult, SerialRadio, Session, ThreadPacer};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Controller for an SGF sensor mesh attached through an XBee coordinator
#[derive(Parser, Debug)]
#[command(name = "sgfctl", version, about)]
struct Cli {
    /// Serial device of the coordinator radio
    #[arg(short, long, env = "SGF_PORT", default_value = "/dev/ttyUSB0")]
    port: String,

    /// Serial baud rate
    #[arg(short, long, default_value_t = 9600)]
    baud: u32,

    /// Delay between transmissions to consecutive nodes (milliseconds)
    #[arg(long, default_value_t = 1000)]
    pacing_ms: u64,

    /// Delay after opening the port before node discovery (milliseconds)
    #[arg(long, default_value_t = 1000)]
    settle_ms: u64,

    /// Skip node discovery at startup
    #[arg(long)]
    no_discover: bool,

    /// Ask renamed nodes to identify themselves again
    #[arg(long)]
    requery_on_rename: bool,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn config(&self) -> ControllerConfig {
        ControllerConfig {
            port: self.port.clone(),
            baud_rate: self.baud,
            pacing_ms: self.pacing_ms,
            settle_delay_ms: self.settle_ms,
            discover_on_start: !self.no_discover,
            requery_on_rename: self.requery_on_rename,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match start(cli.config()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

fn start(config: ControllerConfig) -> ControllerResult<()> {
    match serde_json::to_string(&config) {
        Ok(json) => debug!("configuration: {}", json),
        Err(e) => debug!("configuration not serializable: {}", e),
    }

    let (radio, frames) = SerialRadio::open(&config.port, config.baud_rate)?;
    let commands = spawn_console_reader()?;
    let interrupts = install_interrupt_handler()?;

    let mut session = Session::new(radio, ThreadPacer, &config);
    run(&mut session, frames, commands, interrupts, &config)
}
