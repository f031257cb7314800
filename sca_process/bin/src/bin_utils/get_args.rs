use clap::Parser;
use std::ops::RangeInclusive;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Pre-process a multiple sequence alignment for statistical coupling analysis", long_about = None)]
pub struct Cli {
    /// Input sequence alignment in fasta format
    pub alignment: PathBuf,
    /// PDB identifier (ex: 1RX2)
    #[arg(short='s', long="pdb")]
    pub pdbid: Option<String>,
    /// Chain ID in the PDB for the reference sequence. Default: A
    #[arg(short='c', long="chainID", default_value_t='A')]
    pub chain_id: char,
    /// Directory holding <PDBID>.pdb files. Default: current directory
    #[arg(long="pdb-dir", default_value=".")]
    pub pdb_dir: PathBuf,
    /// Species of the reference sequence, matched against alignment headers
    #[arg(short='f', long="species")]
    pub species: Option<String>,
    /// Reference sequence, supplied as a fasta file
    #[arg(short='r', long="refseq")]
    pub refseq: Option<PathBuf>,
    /// Reference positions, supplied as a text file with one position per line
    #[arg(short='o', long="refpos")]
    pub refpos: Option<PathBuf>,
    /// Reference sequence number in the alignment, counting from 0
    #[arg(short='i', long="refindex")]
    pub i_ref: Option<usize>,
    /// Filtering parameters: max gaps per position, max gaps per sequence,
    /// min identity to the reference, max identity for weighting. Default: 0.2 0.2 0.2 0.8
    #[arg(short='p', long="parameters", num_args=4, value_parser=validate_percent,
          default_values_t=[0.2, 0.2, 0.2, 0.8])]
    pub parameters: Vec<f64>,
    /// Subsample the alignment to 1.5 x the number of effective sequences
    #[arg(short='n', long="selectSeqs")]
    pub select_seqs: bool,
    /// Seed for subsampling. Default: 0
    #[arg(long="seed", default_value_t=0)]
    pub seed: u64,
    /// Truncate the alignment to the positions of the reference
    #[arg(short='t', long="truncate")]
    pub truncate: bool,
    /// Also write the results as csv matrices for external analysis tools
    #[arg(short='m', long="matlab")]
    pub matlab: bool,
    /// Name of the output database. Default: alignment file name
    #[arg(long="output")]
    pub output: Option<String>,
    /// Output directory. Default: "Outputs"
    #[arg(long="outdir", default_value="Outputs")]
    pub outdir: PathBuf,
    /// Number of threads for the identity calculations. Default: 4
    #[arg(long="threads", default_value_t=4)]
    pub nproc: usize,
}

const PERCENTAGE: RangeInclusive<f64> = 0f64..=1f64;

fn validate_percent(input_str: &str) -> Result<f64, String> {
    let percent: f64 = input_str
        .parse()
        .map_err(|_| format!("{input_str} is not a number"))?;
    if PERCENTAGE.contains(&percent) {
        Ok(percent)
    } else {
        Err(
            format!("Parameter not in the range {} - {}", PERCENTAGE.start(), PERCENTAGE.end())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["sca_process", "aln.fasta"]).unwrap();
        assert_eq!(cli.parameters, vec![0.2, 0.2, 0.2, 0.8]);
        assert_eq!(cli.chain_id, 'A');
        assert!(!cli.select_seqs);
        assert_eq!(cli.outdir, PathBuf::from("Outputs"));
    }

    #[test]
    fn test_parameters_validated() {
        let cli = Cli::try_parse_from(["sca_process", "aln.fasta", "-p", "0.3", "0.25", "0.1", "0.9"]).unwrap();
        assert_eq!(cli.parameters, vec![0.3, 0.25, 0.1, 0.9]);
        assert!(Cli::try_parse_from(["sca_process", "aln.fasta", "-p", "0.3", "2", "0.1", "0.9"]).is_err());
        assert!(Cli::try_parse_from(["sca_process", "aln.fasta", "-p", "0.3"]).is_err());
    }

    #[test]
    fn test_reference_flags() {
        let cli = Cli::try_parse_from([
            "sca_process", "aln.fasta", "-s", "5P21", "-c", "B", "-f", "Homo sapiens", "-t", "-n",
        ]).unwrap();
        assert_eq!(cli.pdbid.as_deref(), Some("5P21"));
        assert_eq!(cli.chain_id, 'B');
        assert_eq!(cli.species.as_deref(), Some("Homo sapiens"));
        assert!(cli.truncate && cli.select_seqs);
    }
}
