//! `medsync import`

mod handler;

pub use handler::handle_import_command;

use std::path::PathBuf;

use clap::Args;

use crate::ingest::Schema;
use crate::output::OutputFormat;

#[derive(Args, Debug)]
pub struct ImportCommands {
    /// Stock report workbook (.xls, .xlsx, .xlsm, .xlsb, .ods)
    pub path: PathBuf,

    /// Report family: marg (medicine-1) or pmbi (medicine-2)
    #[arg(short, long)]
    pub schema: Schema,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Leave out the _imported_at marker
    #[arg(long)]
    pub no_timestamp: bool,
}
