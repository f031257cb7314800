/*
Pre-process a multiple sequence alignment for statistical coupling analysis
    + remove sequences with non-standard amino acids
    + trim positions with more than 80% gaps
    + pick the reference sequence and map alignment columns to its numbering
        + PDB structure, reference sequence file, explicit index, or automatic
    + filter sequences by gaps and identity to the reference, weight them
    + filter positions by weighted gap fraction
    + optionally subsample to 1.5 x effective sequences
    + write the processed alignment and the database for the correlation stage

Logging through env_logger, RUST_LOG overrides the default "info"
*/

mod bin_utils;
use clap::Parser;
use bin_utils::get_args::Cli;
use bin_utils::process_msa::run;
use log::{debug, error, info};
use env_logger::Env;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    debug!("Parsing commandline arguments");
    info!("Processing alignment: {:?}", cli.alignment);
    match run(&cli) {
        Ok(paths) => info!("Processed alignment: {:?}", paths.fasta),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
