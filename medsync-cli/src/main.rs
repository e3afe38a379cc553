use std::process::ExitCode;

use clap::Parser;
use is_terminal::IsTerminal;

use medsync::cli::{Cli, run};
use medsync::output::error_to_json;

fn main() -> ExitCode {
    // Load .env so MEDSYNC_CONFIG and RUST_LOG can live there
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    if cli.no_color || !std::io::stderr().is_terminal() {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            println!("{}", error_to_json(&e));
            ExitCode::FAILURE
        }
    }
}
