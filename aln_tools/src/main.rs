/*
Alignment helpers run ahead of sca_process
    + filter-size: drop sequences whose length is outside mean +/- tolerance
    + parse-gi: extract GI numbers from Blast-formatted headers

Logging through env_logger, RUST_LOG overrides the default "info"
*/

mod utils;
use clap::Parser;
use utils::get_args::{Cli, Command};
use utils::commands::{filter_size, parse_gi};
use log::{debug, error, info};
use env_logger::Env;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    debug!("Parsing commandline arguments");
    let result = match &cli.command {
        Command::FilterSize { alignment, tolerance, output } => {
            info!("Filtering {:?} by sequence length", alignment);
            filter_size(alignment, *tolerance, output)
        }
        Command::ParseGi { alignment, output } => {
            info!("Parsing GI numbers from {:?}", alignment);
            parse_gi(alignment, output)
        }
    };
    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
