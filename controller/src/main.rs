mod actuator;
mod device;
mod monitor;
mod run;

use std::path::PathBuf;

use clap::Parser;

/// Keeps furnace heat circulating: runs the blower past the end of each heat
/// cycle and nudges ceiling fan speeds around heat transitions.
#[derive(Parser)]
#[command(name = "fancontrol")]
pub struct Cli {
    /// Fetch and print one raw status response per device, then exit.
    #[arg(short, long)]
    pub debug: bool,

    /// Send a reboot command to every ceiling fan, then exit.
    #[arg(long)]
    pub reboot_fans: bool,

    /// Path to a JSON config file; built-in defaults apply when omitted.
    #[arg(long, env = "FANCONTROL_CONFIG")]
    pub config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run::run(Cli::parse()).await
}
