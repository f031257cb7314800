/*
    Pairwise sequence identity over an alignment
        identity = matching residues / alignment width
        the matrix is filled row by row on a thread pool
    Sequence weights
        w_i = 1 / number of sequences with identity to i above max_seqid
    Automatic reference choice
        sequence whose mean identity is closest to the mean identity of all pairs
*/


use std::sync::{Arc, Mutex, PoisonError};
use threadpool::ThreadPool;
use log::{debug, info};
use super::alignment::{residue_code, Alignment, GAP};
use super::errors::{ScaError, ScaResult};
use super::subsample::rand_sel;

pub const DEFAULT_MAX_SEQID: f64 = 0.8;
/// Above this many sequences the reference is chosen from a weighted subsample
const CHOOSE_REF_SAMPLE: usize = 1000;
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

fn counts_as_match(residue: u8, with_gaps: bool) -> bool {
    residue_code(residue) != 0 || (with_gaps && residue == GAP)
}

/// Fraction of columns where both rows carry the same amino acid (or both a gap, with_gaps)
pub fn pairwise_identity(a: &[u8], b: &[u8], with_gaps: bool) -> f64 {
    let width = a.len().max(b.len());
    if width == 0 {
        return 0.0;
    }
    let matches = a.iter().zip(b.iter())
        .filter(|(&x, &y)| x == y && counts_as_match(x, with_gaps))
        .count();
    matches as f64 / width as f64
}

pub fn similarity_matrix(rows: &[Vec<u8>], with_gaps: bool, nproc: usize) -> Vec<Vec<f64>> {
    let n = rows.len();
    let shared_rows: Arc<Vec<Vec<u8>>> = Arc::new(rows.to_vec());
    let arc_matrix: Arc<Mutex<Vec<Vec<f64>>>> = Arc::new(Mutex::new(vec![Vec::new(); n]));
    let pool = ThreadPool::new(nproc.max(1));
    debug!("Computing {n} x {n} identity matrix on {} threads", nproc.max(1));
    for i in 0..n {
        let rows_clone = Arc::clone(&shared_rows);
        let arc_clone = Arc::clone(&arc_matrix);
        pool.execute(move || {
            let values: Vec<f64> = rows_clone.iter()
                .map(|other| pairwise_identity(&rows_clone[i], other, with_gaps))
                .collect();
            let mut matrix = arc_clone.lock().unwrap_or_else(PoisonError::into_inner);
            matrix[i] = values;
        });
    }
    pool.join();
    match Arc::try_unwrap(arc_matrix) {
        Ok(matrix) => matrix.into_inner().unwrap_or_else(PoisonError::into_inner),
        Err(shared) => shared.lock().unwrap_or_else(PoisonError::into_inner).clone(),
    }
}

fn owned_rows(alignment: &Alignment) -> Vec<Vec<u8>> {
    alignment.rows().iter().map(|r| r.to_vec()).collect()
}

/// Sequence similarity matrix with gaps excluded
pub fn seq_sim(alignment: &Alignment, nproc: usize) -> Vec<Vec<f64>> {
    similarity_matrix(&owned_rows(alignment), false, nproc)
}

pub fn seq_weights(alignment: &Alignment, max_seqid: f64, nproc: usize) -> Vec<f64> {
    let sim = similarity_matrix(&owned_rows(alignment), true, nproc);
    sim.iter().enumerate()
        .map(|(i, row)| {
            let neighbours = row.iter().enumerate()
                .filter(|&(j, &s)| j == i || s > max_seqid)
                .count();
            1.0 / neighbours as f64
        })
        .collect()
}

pub fn effective_sequences(weights: &[f64]) -> f64 {
    weights.iter().sum()
}

/// Whole number of effective sequences, floor of the weight sum.
/// Sums of 1/n fractions land just below the integer, so a small tolerance is added.
pub fn effective_count(weights: &[f64]) -> usize {
    (effective_sequences(weights) + WEIGHT_SUM_TOLERANCE).floor() as usize
}

pub fn choose_ref_seq(alignment: &Alignment, nproc: usize) -> ScaResult<usize> {
    alignment.ensure_aligned()?;
    let candidates: Vec<usize> = if alignment.len() > CHOOSE_REF_SAMPLE {
        info!("Choosing reference from a weighted sample of {} sequences", CHOOSE_REF_SAMPLE);
        let weights = seq_weights(alignment, DEFAULT_MAX_SEQID, nproc);
        rand_sel(&weights, CHOOSE_REF_SAMPLE, &[], 0)?
    } else {
        (0..alignment.len()).collect()
    };
    if candidates.len() == 1 {
        return Ok(candidates[0]);
    }
    let sim = seq_sim(&alignment.select_rows(&candidates), nproc);
    let n = sim.len();
    let pair_values: Vec<f64> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .map(|(i, j)| sim[i][j])
        .collect();
    let mean_pair = pair_values.iter().sum::<f64>() / pair_values.len() as f64;

    let mut best: Option<(usize, f64)> = None;
    for (k, row) in sim.iter().enumerate() {
        let diff = (row.iter().sum::<f64>() / n as f64 - mean_pair).abs();
        match best {
            Some((_, d)) if d <= diff => {}
            _ => best = Some((k, diff)),
        }
    }
    best.map(|(k, _)| candidates[k])
        .ok_or_else(|| ScaError::input("cannot choose a reference from an empty alignment"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aln(seqs: &[&str]) -> Alignment {
        let headers = (0..seqs.len()).map(|i| format!("s{i}")).collect();
        Alignment::new(headers, seqs.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_pairwise_identity_gap_handling() {
        assert_eq!(pairwise_identity(b"AC--", b"AC--", true), 1.0);
        assert_eq!(pairwise_identity(b"AC--", b"AC--", false), 0.5);
        assert_eq!(pairwise_identity(b"ACDE", b"ACDF", false), 0.75);
    }

    #[test]
    fn test_similarity_matrix_independent_of_threads() {
        let rows: Vec<Vec<u8>> = ["ACDE", "ACDF", "GGDE", "----"].iter().map(|s| s.as_bytes().to_vec()).collect();
        let single = similarity_matrix(&rows, true, 1);
        let pooled = similarity_matrix(&rows, true, 3);
        assert_eq!(single, pooled);
        assert_eq!(single[0][1], 0.75);
        assert_eq!(single[1][0], 0.75);
        assert_eq!(single[3][3], 1.0);
    }

    #[test]
    fn test_seq_weights_downweight_redundant() {
        let weights = seq_weights(&aln(&["ACDEFGHIKL", "ACDEFGHIKL", "WWWWWWWWWW"]), 0.8, 2);
        assert_eq!(weights, vec![0.5, 0.5, 1.0]);
        assert_eq!(effective_sequences(&weights), 2.0);
    }

    #[test]
    fn test_effective_count_of_redundant_family() {
        let weights = seq_weights(&aln(&["ACDEFGHIKL"; 6]), 0.8, 3);
        assert_eq!(effective_count(&weights), 1);
        assert_eq!(effective_count(&[0.5, 0.5, 0.9]), 1);
        assert_eq!(effective_count(&[]), 0);
    }

    #[test]
    fn test_seq_weights_always_count_self() {
        let weights = seq_weights(&aln(&["ACDE", "ACDE"]), 1.0, 1);
        assert_eq!(weights, vec![1.0, 1.0]);
    }

    #[test]
    fn test_choose_ref_seq_mean_identity_rule() {
        // pair mean 1/3; row means 0.5, 0.67, 0.5 -> rows 0 and 2 tie, first wins
        let idx = choose_ref_seq(&aln(&["AAAAAAAA", "AAAACCCC", "CCCCCCCC"]), 2).unwrap();
        assert_eq!(idx, 0);
        // pair mean 0.458; row means 0.6875 x3 and 0.3125
        let idx = choose_ref_seq(&aln(&["AAAA", "AAAA", "AAAC", "CCCC"]), 2).unwrap();
        assert_eq!(idx, 3);
    }

    #[test]
    fn test_choose_ref_seq_single() {
        assert_eq!(choose_ref_seq(&aln(&["ACDE"]), 1).unwrap(), 0);
        assert!(choose_ref_seq(&Alignment::default(), 1).is_err());
    }
}
