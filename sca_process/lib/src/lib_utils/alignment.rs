/*
    In-memory alignment
        headers and sequences kept as parallel vectors
        every narrowing step returns a new Alignment, nothing is edited in place
        column operations require equal sequence lengths (ensure_aligned)
*/


use std::io::Write;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use super::errors::{ScaError, ScaResult};

pub const GAP: u8 = b'-';
pub const AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";
const PERMITTED_CHARACTERS: &str = "ACDEFGHIKLMNPQRSTVWY-";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Alignment {
    headers: Vec<String>,
    sequences: Vec<String>,
}

impl Alignment {
    pub fn new(headers: Vec<String>, sequences: Vec<String>) -> ScaResult<Self> {
        if headers.len() != sequences.len() {
            return Err(ScaError::input(format!(
                "{} headers but {} sequences", headers.len(), sequences.len()
            )));
        }
        Ok(Self { headers, sequences })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn sequences(&self) -> &[String] {
        &self.sequences
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn row(&self, index: usize) -> &[u8] {
        self.sequences[index].as_bytes()
    }

    pub fn rows(&self) -> Vec<&[u8]> {
        self.sequences.iter().map(|s| s.as_bytes()).collect()
    }

    pub fn records(&self) -> impl Iterator<Item = (&String, &String)> {
        self.headers.iter().zip(self.sequences.iter())
    }

    /// Width of the alignment. Fails on an empty or ragged record set.
    pub fn ensure_aligned(&self) -> ScaResult<usize> {
        let width = match self.sequences.first() {
            Some(seq) => seq.len(),
            None => return Err(ScaError::input("alignment contains no sequences")),
        };
        if let Some((idx, seq)) = self.sequences.iter().enumerate().find(|(_, s)| s.len() != width) {
            return Err(ScaError::input(format!(
                "sequence {} ({}) has length {} but the alignment width is {}",
                idx, self.headers[idx], seq.len(), width
            )));
        }
        Ok(width)
    }

    /// Keep the given rows, in the order supplied
    pub fn select_rows(&self, keep: &[usize]) -> Alignment {
        Alignment {
            headers: keep.iter().map(|&i| self.headers[i].clone()).collect(),
            sequences: keep.iter().map(|&i| self.sequences[i].clone()).collect(),
        }
    }

    /// Keep the given columns of every row
    pub fn select_columns(&self, keep: &[usize]) -> Alignment {
        let sequences = self.sequences.iter()
            .map(|seq| {
                let bytes = seq.as_bytes();
                keep.iter().map(|&c| bytes[c] as char).collect::<String>()
            })
            .collect();
        Alignment {
            headers: self.headers.clone(),
            sequences,
        }
    }

    /// Ungapped residues of a row
    pub fn ungapped_row(&self, index: usize) -> Vec<u8> {
        self.row(index).iter().copied().filter(|&b| b != GAP).collect()
    }

    pub fn write_fasta<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (header, sequence) in self.records() {
            writeln!(writer, ">{}", header)?;
            writeln!(writer, "{}", sequence)?;
        }
        Ok(())
    }
}

/// Drop sequences that contain anything other than the 20 amino acids or a gap
pub fn remove_nonstandard(alignment: &Alignment) -> (Alignment, Vec<usize>) {
    let keep: Vec<usize> = alignment.sequences().iter().enumerate()
        .filter(|(idx, seq)| {
            match seq.chars().find(|c| !PERMITTED_CHARACTERS.contains(*c)) {
                Some(c) => {
                    debug!("{} contains non-standard character {}", alignment.headers()[*idx], c);
                    false
                }
                None => true,
            }
        })
        .map(|(idx, _)| idx)
        .collect();
    if keep.len() < alignment.len() {
        warn!("Removed {} sequences containing non-standard amino acids", alignment.len() - keep.len());
    }
    info!("Alignment size after removing sequences with non-standard amino acids: {}", keep.len());
    (alignment.select_rows(&keep), keep)
}

/// Residue code: ACDEFGHIKLMNPQRSTVWY -> 1..=20, anything else -> 0
pub fn residue_code(residue: u8) -> u8 {
    AMINO_ACIDS.bytes()
        .position(|aa| aa == residue)
        .map(|p| p as u8 + 1)
        .unwrap_or(0)
}

pub fn lett2num(alignment: &Alignment) -> Vec<Vec<u8>> {
    alignment.rows().iter()
        .map(|row| row.iter().map(|&r| residue_code(r)).collect())
        .collect()
}
