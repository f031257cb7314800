/*
    Preprocess an alignment for SCA
        1) load, drop sequences with non-standard amino acids
        2) trim positions with more than 80% gaps so the reference maps cleanly
        3) resolve the reference sequence and the ATS
        4) filter sequences (gaps, identity to reference) and weight them
        5) filter positions with the weighted gap threshold
        6) optionally subsample to 1.5 x effective sequences
        7) final weights and numeric alignment
    Every stage hands a new alignment to the next; ATS and distances follow the kept columns.
*/


use std::path::PathBuf;
use log::info;
use crate::read_alignment;
use super::alignment::{lett2num, remove_nonstandard};
use super::bundle::SequenceBundle;
use super::errors::{ScaError, ScaResult};
use super::gap_filter::{filter_positions, filter_sequences, FilterParameters, IdentityReference, INITIAL_TRIM_GAPS};
use super::reference::{resolve_reference, ReferenceOptions};
use super::similarity::{effective_count, effective_sequences, seq_weights};
use super::structure::{select_distances, StructureSource};
use super::subsample::rand_sel;

#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub alignment: PathBuf,
    pub reference: ReferenceOptions,
    pub params: FilterParameters,
    /// Subsample to 1.5 x the effective number of sequences
    pub select_seqs: bool,
    pub seed: u64,
    pub nproc: usize,
}

impl ProcessConfig {
    pub fn new(alignment: impl Into<PathBuf>) -> Self {
        Self {
            alignment: alignment.into(),
            reference: ReferenceOptions::default(),
            params: FilterParameters::default(),
            select_seqs: false,
            seed: 0,
            nproc: 4,
        }
    }
}

fn ensure_lockstep(stage: &str, npos: usize, ats: usize, distances: Option<&Vec<Vec<f64>>>) -> ScaResult<()> {
    if ats != npos {
        return Err(ScaError::input(format!(
            "after {stage}: {npos} positions but ATS holds {ats} labels"
        )));
    }
    if let Some(d) = distances {
        if d.len() != npos || d.iter().any(|r| r.len() != npos) {
            let cols = d.iter().map(Vec::len).find(|&l| l != npos).unwrap_or(npos);
            return Err(ScaError::input(format!(
                "after {stage}: {npos} positions but the distance matrix is {} x {}", d.len(), cols
            )));
        }
    }
    Ok(())
}

pub fn process_msa(config: &ProcessConfig, source: &dyn StructureSource) -> ScaResult<SequenceBundle> {
    config.params.validate()?;
    let nproc = config.nproc.max(1);

    let loaded = read_alignment(&config.alignment)?;
    let width = loaded.ensure_aligned()?;
    info!("Loaded alignment of {} sequences, {} positions.", loaded.len(), width);

    info!("Checking alignment for non-standard amino acids");
    let (standard, _) = remove_nonstandard(&loaded);
    if standard.is_empty() {
        return Err(ScaError::input("no sequences left after removing non-standard amino acids"));
    }

    info!("Trimming alignment for highly gapped positions (80% or more).");
    let (trimmed, trim_columns) = filter_positions(&standard, None, INITIAL_TRIM_GAPS)?;
    info!("Alignment size post-trimming: {} positions", trimmed.ensure_aligned()?);

    let resolution = resolve_reference(&trimmed, &standard, &trim_columns, &config.reference, source, nproc)?;
    let npos = resolution.alignment.ensure_aligned()?;
    ensure_lockstep("reference resolution", npos, resolution.ats.len(), resolution.distances.as_ref())?;
    info!(
        "Conducting sequence and position filtering: alignment size is {} seqs, {} pos",
        resolution.alignment.len(), npos
    );

    let seq_filter = filter_sequences(
        &resolution.alignment,
        IdentityReference::Index(resolution.ref_index),
        &config.params,
        nproc,
    )?;
    let (filtered, pos_keep) = filter_positions(
        &seq_filter.alignment,
        Some(&seq_filter.weights),
        config.params.max_frac_gaps_pos,
    )?;
    let ats: Vec<Option<String>> = pos_keep.iter().map(|&c| resolution.ats[c].clone()).collect();
    let distmat = resolution.distances.as_ref().map(|d| select_distances(d, &pos_keep));
    ensure_lockstep("position filtering", pos_keep.len(), ats.len(), distmat.as_ref())?;

    let effseqs_prelimit = effective_count(&seq_filter.weights);
    let nseq_prelimit = filtered.len();
    info!(
        "After filtering: alignment size is {} seqs, {} effective seqs, {} pos",
        nseq_prelimit, effseqs_prelimit, pos_keep.len()
    );

    let ref_position = seq_filter.reference_position();
    let (alignment, i_ref_processed) = if config.select_seqs {
        let protected: Vec<usize> = ref_position.into_iter().collect();
        let target = ((1.5 * effseqs_prelimit as f64) as usize).max(protected.len());
        info!("Subsampling to {} sequences", target);
        let selected = rand_sel(&seq_filter.weights, target, &protected, config.seed)?;
        let processed_ref = ref_position.and_then(|r| selected.iter().position(|&s| s == r));
        (filtered.select_rows(&selected), processed_ref)
    } else {
        (filtered, ref_position)
    };

    let seqw = seq_weights(&alignment, config.params.max_seqid, nproc);
    let effseqs = effective_sequences(&seqw);
    let msa_num = lett2num(&alignment);
    let nseq = alignment.len();
    info!("Final alignment parameters:");
    info!("Number of sequences: M = {}", nseq);
    info!("Number of effective sequences: M' = {:.0}", effseqs.round());
    info!("Number of alignment positions: L = {}", ats.len());
    if let Some(d) = &distmat {
        let mapped = ats.iter().filter(|a| a.is_some()).count();
        info!("Number of structure positions mapped: {}", mapped);
        info!("Size of the distance matrix: {} x {}", d.len(), d.len());
    }

    let pdb = config.reference.pdb.as_ref().filter(|_| resolution.distances.is_some());
    Ok(SequenceBundle {
        alg: alignment.sequences().to_vec(),
        hd: alignment.headers().to_vec(),
        msa_num,
        seqw,
        nseq,
        npos: ats.len(),
        ats,
        effseqs,
        limitseqs: config.select_seqs,
        nseq_prelimit,
        effseqs_prelimit,
        pdbid: pdb.map(|p| p.id.clone()),
        pdb_chain: pdb.map(|p| p.chain),
        distmat,
        refseq: config.reference.ref_seq.clone(),
        refpos: config.reference.ref_pos.clone(),
        i_ref: resolution.ref_index,
        i_ref_processed,
        trim_parameters: config.params.as_array(),
        truncate_flag: config.reference.truncate,
        strategy: resolution.strategy,
    })
}
