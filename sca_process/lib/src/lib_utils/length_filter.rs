/*
    Filter sequences by size
        mean length over all sequences (gaps counted)
        keep sequences with mean - tolerance < length < mean + tolerance
        report counts kept / total
*/


use log::info;
use super::alignment::Alignment;
use super::errors::{ScaError, ScaResult};

pub const DEFAULT_TOLERANCE: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct LengthReport {
    pub mean: f64,
    pub min: usize,
    pub max: usize,
    pub kept: usize,
    pub total: usize,
}

pub fn filter_seq_size(alignment: &Alignment, tolerance: usize) -> ScaResult<(Alignment, LengthReport)> {
    if alignment.is_empty() {
        return Err(ScaError::input("cannot filter an empty alignment by length"));
    }
    let lengths: Vec<usize> = alignment.sequences().iter().map(|s| s.len()).collect();
    let mean = lengths.iter().sum::<usize>() as f64 / lengths.len() as f64;
    let min = *lengths.iter().min().unwrap_or(&0);
    let max = *lengths.iter().max().unwrap_or(&0);
    info!("Average sequence length: {:.0}", mean.round());
    info!("Min: {}, Max {}", min, max);

    let min_size = mean - tolerance as f64;
    let max_size = mean + tolerance as f64;
    info!("Keeping sequences in the range: {} - {}", min_size, max_size);
    let keep: Vec<usize> = lengths.iter().enumerate()
        .filter(|(_, &len)| (len as f64) > min_size && (len as f64) < max_size)
        .map(|(idx, _)| idx)
        .collect();
    info!("Keeping {} of {} total sequences", keep.len(), lengths.len());

    let report = LengthReport { mean, min, max, kept: keep.len(), total: lengths.len() };
    Ok((alignment.select_rows(&keep), report))
}
