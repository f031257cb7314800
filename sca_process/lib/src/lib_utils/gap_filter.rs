/*
    Gap and identity filters
        positions: drop columns whose (weighted) gap fraction is above the threshold
        sequences: drop rows with too many gaps or too little identity to the reference,
                   then weight the survivors
    Both return the kept indices so parallel structures can be narrowed in lockstep
*/


use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use super::alignment::{Alignment, GAP};
use super::errors::{ScaError, ScaResult};
use super::similarity::{choose_ref_seq, pairwise_identity, seq_weights};

/// Gap threshold used to stabilise the alignment before mapping the reference
pub const INITIAL_TRIM_GAPS: f64 = 0.8;

/// [max gaps per position, max gaps per sequence, min identity to reference, max identity for weighting]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterParameters {
    pub max_frac_gaps_pos: f64,
    pub max_frac_gaps_seq: f64,
    pub min_seqid: f64,
    pub max_seqid: f64,
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self {
            max_frac_gaps_pos: 0.2,
            max_frac_gaps_seq: 0.2,
            min_seqid: 0.2,
            max_seqid: 0.8,
        }
    }
}

impl FilterParameters {
    pub fn from_slice(values: &[f64]) -> ScaResult<Self> {
        match values {
            [pos, seq, min, max] => {
                let params = Self {
                    max_frac_gaps_pos: *pos,
                    max_frac_gaps_seq: *seq,
                    min_seqid: *min,
                    max_seqid: *max,
                };
                params.validate()?;
                Ok(params)
            }
            _ => Err(ScaError::input(format!(
                "expected 4 filtering parameters, got {}", values.len()
            ))),
        }
    }

    pub fn validate(&self) -> ScaResult<()> {
        for (name, value) in [
            ("max_frac_gaps for positions", self.max_frac_gaps_pos),
            ("max_frac_gaps for sequences", self.max_frac_gaps_seq),
            ("min SID to reference", self.min_seqid),
            ("max SID for weighting", self.max_seqid),
        ] {
            check_fraction(name, value)?;
        }
        Ok(())
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.max_frac_gaps_pos, self.max_frac_gaps_seq, self.min_seqid, self.max_seqid]
    }
}

fn check_fraction(name: &str, value: f64) -> ScaResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ScaError::input(format!("{name} must be within 0 - 1, got {value}")))
    }
}

pub fn filter_positions(
    alignment: &Alignment,
    weights: Option<&[f64]>,
    max_frac_gaps: f64,
) -> ScaResult<(Alignment, Vec<usize>)> {
    check_fraction("max_frac_gaps", max_frac_gaps)?;
    let width = alignment.ensure_aligned()?;
    let unit;
    let weights = match weights {
        Some(w) if w.len() != alignment.len() => {
            return Err(ScaError::input(format!(
                "{} weights supplied for {} sequences", w.len(), alignment.len()
            )));
        }
        Some(w) => w,
        None => {
            unit = vec![1.0; alignment.len()];
            &unit[..]
        }
    };
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(ScaError::input("sequence weights sum to zero"));
    }

    let mut gap_weight = vec![0.0f64; width];
    for (row, w) in alignment.rows().iter().zip(weights) {
        row.iter().enumerate()
            .filter(|(_, &r)| r == GAP)
            .for_each(|(col, _)| gap_weight[col] += w);
    }
    let keep: Vec<usize> = gap_weight.iter().enumerate()
        .filter(|(_, &g)| g / total <= max_frac_gaps)
        .map(|(col, _)| col)
        .collect();
    debug!("Kept {} of {} positions at max gap fraction {}", keep.len(), width, max_frac_gaps);
    Ok((alignment.select_columns(&keep), keep))
}

/// Row used as the identity reference when filtering sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityReference {
    Index(usize),
    /// No reference known; one is chosen from the alignment itself
    Automatic,
}

#[derive(Debug, Clone)]
pub struct SequenceFilterResult {
    pub alignment: Alignment,
    pub weights: Vec<f64>,
    /// Indices of surviving rows in the input alignment
    pub kept: Vec<usize>,
    /// Row of the identity reference in the input alignment
    pub reference: usize,
}

impl SequenceFilterResult {
    /// Position of the reference among the kept rows
    pub fn reference_position(&self) -> Option<usize> {
        self.kept.iter().position(|&k| k == self.reference)
    }
}

pub fn filter_sequences(
    alignment: &Alignment,
    reference: IdentityReference,
    params: &FilterParameters,
    nproc: usize,
) -> ScaResult<SequenceFilterResult> {
    params.validate()?;
    let width = alignment.ensure_aligned()?;
    let reference = match reference {
        IdentityReference::Index(idx) if idx >= alignment.len() => {
            return Err(ScaError::input(format!(
                "reference index {} out of range for {} sequences", idx, alignment.len()
            )));
        }
        IdentityReference::Index(idx) => idx,
        IdentityReference::Automatic => {
            let idx = choose_ref_seq(alignment, nproc)?;
            info!("No reference index supplied, identity filtering against automatically chosen sequence {}", idx);
            idx
        }
    };

    let ref_row = alignment.row(reference);
    let kept: Vec<usize> = (0..alignment.len())
        .filter(|&s| {
            if s == reference {
                return true;
            }
            let row = alignment.row(s);
            let gap_fraction = row.iter().filter(|&&r| r == GAP).count() as f64 / width as f64;
            if gap_fraction > params.max_frac_gaps_seq {
                debug!("{} removed: gap fraction {:.3}", alignment.headers()[s], gap_fraction);
                return false;
            }
            let identity = pairwise_identity(row, ref_row, true);
            if identity <= params.min_seqid {
                debug!("{} removed: identity to reference {:.3}", alignment.headers()[s], identity);
                return false;
            }
            true
        })
        .collect();
    let ref_gaps = ref_row.iter().filter(|&&r| r == GAP).count() as f64 / width as f64;
    if ref_gaps > params.max_frac_gaps_seq {
        warn!("Reference sequence has gap fraction {:.3} above the threshold; keeping it anyway", ref_gaps);
    }

    let filtered = alignment.select_rows(&kept);
    let weights = seq_weights(&filtered, params.max_seqid, nproc);
    info!("Sequence filtering kept {} of {} sequences", kept.len(), alignment.len());
    Ok(SequenceFilterResult {
        alignment: filtered,
        weights,
        kept,
        reference,
    })
}
