//! `medsync inspect`

mod handler;

pub use handler::handle_inspect_command;

use std::path::PathBuf;

use clap::Args;

#[derive(Args, Debug)]
pub struct InspectCommands {
    /// Workbook to inspect
    pub path: PathBuf,

    /// Number of leading rows to print
    #[arg(short, long, default_value_t = 10)]
    pub rows: usize,
}
