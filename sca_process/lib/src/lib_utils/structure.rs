/*
    Reference structures for the alignment-to-structure mapping
        a StructureSource supplies one chain of a PDB entry
            residue sequence, residue labels (number + insertion code)
            minimum interatomic distance between residues
        LocalPdbSource reads PDB-format files from a directory
*/


use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use log::{debug, info};
use super::errors::{ResolutionFailure, ScaError, ScaResult};

/// Distance given to column pairs where either column has no structural counterpart
pub const UNMAPPED_DISTANCE: f64 = 1000.0;

const THREE_TO_ONE: [(&str, char); 20] = [
    ("ALA", 'A'), ("CYS", 'C'), ("ASP", 'D'), ("GLU", 'E'), ("PHE", 'F'),
    ("GLY", 'G'), ("HIS", 'H'), ("ILE", 'I'), ("LYS", 'K'), ("LEU", 'L'),
    ("MET", 'M'), ("ASN", 'N'), ("PRO", 'P'), ("GLN", 'Q'), ("ARG", 'R'),
    ("SER", 'S'), ("THR", 'T'), ("VAL", 'V'), ("TRP", 'W'), ("TYR", 'Y'),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ChainStructure {
    pub sequence: String,
    /// Residue label per residue, e.g. "27" or "100A"
    pub labels: Vec<String>,
    /// Minimum interatomic distance between residue pairs
    pub distances: Vec<Vec<f64>>,
}

pub trait StructureSource {
    fn fetch(&self, pdb_id: &str, chain: char) -> ScaResult<ChainStructure>;
}

/// Reads `<dir>/<id>.pdb` (any case) or `<dir>/pdb<id>.ent`
#[derive(Debug, Clone)]
pub struct LocalPdbSource {
    pub dir: PathBuf,
}

impl LocalPdbSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn locate(&self, pdb_id: &str) -> Option<PathBuf> {
        let lower = pdb_id.to_ascii_lowercase();
        [
            format!("{pdb_id}.pdb"),
            format!("{lower}.pdb"),
            format!("{}.pdb", pdb_id.to_ascii_uppercase()),
            format!("pdb{lower}.ent"),
        ]
        .iter()
        .map(|name| self.dir.join(name))
        .find(|candidate| candidate.is_file())
    }
}

impl StructureSource for LocalPdbSource {
    fn fetch(&self, pdb_id: &str, chain: char) -> ScaResult<ChainStructure> {
        let path = self.locate(pdb_id).ok_or_else(|| {
            ScaError::reference(
                "loading the reference structure",
                ResolutionFailure::StructureUnavailable(format!(
                    "no PDB file for {} in {:?}", pdb_id, self.dir
                )),
            )
        })?;
        info!("Reading structure {} chain {} from {:?}", pdb_id, chain, path);
        let contents = fs::read_to_string(&path).map_err(|e| ScaError::io(&path, e))?;
        parse_chain(&contents, chain).map_err(|message| {
            ScaError::reference(
                "parsing the reference structure",
                ResolutionFailure::StructureUnavailable(format!("{:?}: {}", path, message)),
            )
        })
    }
}

struct ResidueAtoms {
    name: String,
    label: String,
    coords: Vec<[f64; 3]>,
}

/// Parse the amino-acid residues of one chain from the first model of a PDB file
pub fn parse_chain(contents: &str, chain: char) -> Result<ChainStructure, String> {
    let codes: HashMap<&str, char> = THREE_TO_ONE.iter().copied().collect();
    let mut residues: Vec<ResidueAtoms> = Vec::new();
    let mut lookup: HashMap<String, usize> = HashMap::new();

    for line in contents.lines() {
        if line.starts_with("ENDMDL") {
            break;
        }
        if line.get(0..6).map(str::trim) != Some("ATOM") {
            continue;
        }
        if line.get(21..22).and_then(|s| s.chars().next()) != Some(chain) {
            continue;
        }
        let alt_loc = line.get(16..17).unwrap_or(" ");
        if alt_loc != " " && alt_loc != "A" {
            continue;
        }
        let residue_name = line.get(17..20).map(str::trim).unwrap_or("").to_ascii_uppercase();
        if !codes.contains_key(residue_name.as_str()) {
            continue;
        }
        let number = line.get(22..26).map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| format!("missing residue number in line: {line}"))?;
        let insertion = line.get(26..27).map(str::trim).unwrap_or("");
        let label = format!("{number}{insertion}");
        let coord = [
            parse_coordinate(line, 30..38)?,
            parse_coordinate(line, 38..46)?,
            parse_coordinate(line, 46..54)?,
        ];
        let idx = *lookup.entry(label.clone()).or_insert_with(|| {
            residues.push(ResidueAtoms { name: residue_name.clone(), label, coords: Vec::new() });
            residues.len() - 1
        });
        residues[idx].coords.push(coord);
    }

    if residues.is_empty() {
        return Err(format!("chain {chain} has no amino-acid residues"));
    }
    let sequence: String = residues.iter()
        .map(|r| codes.get(r.name.as_str()).copied().unwrap_or('X'))
        .collect();
    let n = residues.len();
    let mut distances = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = min_distance(&residues[i].coords, &residues[j].coords);
            distances[i][j] = d;
            distances[j][i] = d;
        }
    }
    debug!("Chain {} sequence: {}", chain, sequence);
    Ok(ChainStructure {
        sequence,
        labels: residues.into_iter().map(|r| r.label).collect(),
        distances,
    })
}

fn parse_coordinate(line: &str, range: std::ops::Range<usize>) -> Result<f64, String> {
    line.get(range)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .ok_or_else(|| format!("invalid coordinate in line: {line}"))
}

fn min_distance(first: &[[f64; 3]], second: &[[f64; 3]]) -> f64 {
    first.iter()
        .flat_map(|a| second.iter().map(move |b| {
            ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
        }))
        .fold(f64::INFINITY, f64::min)
}

/// Re-index residue distances onto alignment columns via the ATS
pub fn distances_for_ats(structure: &ChainStructure, ats: &[Option<String>]) -> Vec<Vec<f64>> {
    let index: HashMap<&str, usize> = structure.labels.iter()
        .enumerate()
        .map(|(i, label)| (label.as_str(), i))
        .collect();
    let positions: Vec<Option<usize>> = ats.iter()
        .map(|label| label.as_deref().and_then(|l| index.get(l).copied()))
        .collect();
    positions.iter().enumerate()
        .map(|(j, first)| {
            positions.iter().enumerate()
                .map(|(k, second)| match (first, second) {
                    _ if j == k => 0.0,
                    (Some(a), Some(b)) => structure.distances[*a][*b],
                    _ => UNMAPPED_DISTANCE,
                })
                .collect()
        })
        .collect()
}

/// Square sub-matrix on the kept positions
pub fn select_distances(distances: &[Vec<f64>], keep: &[usize]) -> Vec<Vec<f64>> {
    keep.iter()
        .map(|&j| keep.iter().map(|&k| distances[j][k]).collect())
        .collect()
}
