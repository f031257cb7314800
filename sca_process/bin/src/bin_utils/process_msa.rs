/*
    Translate the command line into a pipeline run
        reference options, filtering parameters, output layout
    Run the pipeline and persist the results
*/

use log::{debug, info};
use msa_tools::lib_utils::bundle::{write_outputs, OutputOptions, OutputPaths};
use msa_tools::lib_utils::gap_filter::FilterParameters;
use msa_tools::lib_utils::pipeline::{process_msa, ProcessConfig};
use msa_tools::lib_utils::reference::{PdbQuery, ReferenceOptions};
use msa_tools::lib_utils::structure::LocalPdbSource;
use msa_tools::ScaResult;
use super::get_args::Cli;

pub fn build_config(cli: &Cli) -> ScaResult<ProcessConfig> {
    let reference = ReferenceOptions {
        ref_index: cli.i_ref,
        pdb: cli.pdbid.as_ref().map(|id| PdbQuery { id: id.clone(), chain: cli.chain_id }),
        species: cli.species.clone(),
        ref_seq: cli.refseq.clone(),
        ref_pos: cli.refpos.clone(),
        truncate: cli.truncate,
    };
    Ok(ProcessConfig {
        alignment: cli.alignment.clone(),
        reference,
        params: FilterParameters::from_slice(&cli.parameters)?,
        select_seqs: cli.select_seqs,
        seed: cli.seed,
        nproc: cli.nproc,
    })
}

pub fn run(cli: &Cli) -> ScaResult<OutputPaths> {
    let config = build_config(cli)?;
    debug!("Reference options: {:?}", config.reference);
    let source = LocalPdbSource::new(&cli.pdb_dir);
    let bundle = process_msa(&config, &source)?;
    let output = OutputOptions {
        dir: cli.outdir.clone(),
        name: cli.output.clone(),
        workspace_export: cli.matlab,
    };
    let paths = write_outputs(&bundle, &cli.alignment, &output)?;
    info!("Calculations complete, database written to {:?}", paths.database);
    Ok(paths)
}
