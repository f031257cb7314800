
// header helpers for Blast-formatted alignments, e.g. ">gi_15829270_ref_NP_..."


use super::alignment::Alignment;
use super::errors::{ScaError, ScaResult};

/// GI number: second '_' separated field of the header
pub fn parse_gi(header: &str) -> ScaResult<&str> {
    header.split('_')
        .nth(1)
        .filter(|gi| !gi.is_empty())
        .ok_or_else(|| ScaError::input(format!("no GI field in header {header:?}")))
}

pub fn parse_gis(alignment: &Alignment) -> ScaResult<Vec<String>> {
    alignment.headers().iter()
        .map(|h| parse_gi(h).map(String::from))
        .collect()
}
