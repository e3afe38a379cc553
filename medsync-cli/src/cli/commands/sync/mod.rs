//! `medsync sync`

mod handler;

pub use handler::handle_sync_command;

use std::path::PathBuf;

use clap::Args;

#[derive(Args, Debug)]
pub struct SyncCommands {
    /// MARG stock report, stored as medicine-1
    #[arg(long, value_name = "PATH")]
    pub marg: Option<PathBuf>,

    /// PMBI stock report, stored as medicine-2
    #[arg(long, value_name = "PATH")]
    pub pmbi: Option<PathBuf>,

    /// Write the JSON document to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Leave out the _imported_at marker
    #[arg(long)]
    pub no_timestamp: bool,
}
