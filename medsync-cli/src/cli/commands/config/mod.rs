//! `medsync config`

mod handler;

pub use handler::handle_config_command;

use clap::Args;

#[derive(Args, Debug)]
pub struct ConfigCommands {
    /// Print only the path of the per-user config file
    #[arg(long)]
    pub path: bool,
}
