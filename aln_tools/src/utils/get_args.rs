use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Alignment helpers run ahead of sca_process", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Remove sequences whose length is far from the mean length
    FilterSize {
        /// Input sequence alignment in fasta format
        alignment: PathBuf,
        /// Residues above or below the mean length to tolerate. Default: 50
        #[arg(short='t', long="tolerance", default_value_t=50)]
        tolerance: usize,
        /// Output alignment. Default: FilteredAln.fa
        #[arg(long="output", default_value="FilteredAln.fa")]
        output: PathBuf,
    },
    /// Write the GI number of every sequence header, one per line
    ParseGi {
        /// Blast-formatted alignment in fasta format
        alignment: PathBuf,
        /// Output file. Default: GI_Num
        #[arg(long="output", default_value="GI_Num")]
        output: PathBuf,
    },
}
