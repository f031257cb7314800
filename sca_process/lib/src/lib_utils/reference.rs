/*
    Resolve the reference sequence and the alignment-to-structure mapping (ATS)
        strategies, first applicable wins
            explicit index          - row given by the caller, columns numbered straight from its residues
            PDB structure           - row best matching the chain sequence,
                                      species-restricted search first when a species is given
            reference sequence file - row best matching the supplied sequence
            automatic               - row chosen by mean identity, sequential numbering
        numbering
            structure residue labels, a position file, or 1..N
            an unreadable or mismatched position file falls back to 1..N with a warning
        truncate keeps only the columns that received a label
*/


use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use crate::read_alignment;
use super::alignment::{Alignment, GAP};
use super::errors::{ResolutionFailure, ScaError, ScaResult};
use super::pairwise::global_align;
use super::similarity::choose_ref_seq;
use super::structure::{distances_for_ats, StructureSource};

/// Position label per alignment column, `None` where the column has no counterpart
pub type Ats = Vec<Option<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceStrategy {
    ExplicitIndex,
    Pdb,
    ReferenceSequence,
    Automatic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdbQuery {
    pub id: String,
    pub chain: char,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceOptions {
    pub ref_index: Option<usize>,
    pub pdb: Option<PdbQuery>,
    pub species: Option<String>,
    pub ref_seq: Option<PathBuf>,
    pub ref_pos: Option<PathBuf>,
    pub truncate: bool,
}

impl ReferenceOptions {
    pub fn strategy(&self) -> ReferenceStrategy {
        if self.ref_index.is_some() {
            ReferenceStrategy::ExplicitIndex
        } else if self.pdb.is_some() {
            ReferenceStrategy::Pdb
        } else if self.ref_seq.is_some() {
            ReferenceStrategy::ReferenceSequence
        } else {
            ReferenceStrategy::Automatic
        }
    }

    /// Report options the chosen strategy ignores; reject combinations that cannot work
    pub fn validate(&self) -> ScaResult<ReferenceStrategy> {
        let strategy = self.strategy();
        match strategy {
            ReferenceStrategy::ExplicitIndex => {
                if self.pdb.is_some() || self.ref_seq.is_some() || self.species.is_some() {
                    info!("Reference index supplied, ignoring PDB, species and reference sequence options");
                }
            }
            ReferenceStrategy::Pdb => {
                if self.ref_seq.is_some() {
                    warn!("Both a PDB id and a reference sequence supplied, using the PDB and ignoring the reference sequence");
                }
                if self.ref_pos.is_some() {
                    warn!("Structure numbering is used with a PDB id, ignoring the reference position file");
                }
            }
            ReferenceStrategy::ReferenceSequence => {
                if self.species.is_some() {
                    warn!("No PDB id, ignoring species");
                }
            }
            ReferenceStrategy::Automatic => {
                if self.truncate {
                    return Err(ScaError::config(
                        "--truncate needs a reference (PDB id, reference sequence or reference index)",
                    ));
                }
                if self.species.is_some() {
                    warn!("No PDB id, ignoring species");
                }
                if self.ref_pos.is_some() {
                    warn!("No reference sequence given, ignoring the reference position file");
                }
            }
        }
        Ok(strategy)
    }
}

#[derive(Debug, Clone)]
pub struct Resolution {
    pub strategy: ReferenceStrategy,
    pub ref_index: usize,
    /// Alignment after optional truncation to mapped columns
    pub alignment: Alignment,
    pub ats: Ats,
    /// Columns of the input alignment that survive truncation
    pub kept_columns: Vec<usize>,
    /// Column-pair structural distances, present for the PDB strategy
    pub distances: Option<Vec<Vec<f64>>>,
}

/// `trimmed` is searched and mapped; `untrimmed` (same rows, all columns) supplies the
/// reference residues when the caller names the row directly. `trim_columns[c]` is the
/// column of `untrimmed` that became column `c` of `trimmed`.
pub fn resolve_reference(
    trimmed: &Alignment,
    untrimmed: &Alignment,
    trim_columns: &[usize],
    options: &ReferenceOptions,
    source: &dyn StructureSource,
    nproc: usize,
) -> ScaResult<Resolution> {
    let strategy = options.validate()?;
    let width = trimmed.ensure_aligned()?;
    let resolution = match strategy {
        ReferenceStrategy::ExplicitIndex => {
            let ref_index = options.ref_index.unwrap_or_default();
            if ref_index >= trimmed.len() {
                return Err(ScaError::reference(
                    "using the supplied reference index",
                    ResolutionFailure::IndexOutOfRange { index: ref_index, count: trimmed.len() },
                ));
            }
            info!("Using provided reference index {}", ref_index);
            info!("{}", trimmed.headers()[ref_index]);
            if trim_columns.len() != width {
                return Err(ScaError::input(format!(
                    "{} trimmed columns recorded for an alignment of width {}", trim_columns.len(), width
                )));
            }
            let ref_len = untrimmed.ungapped_row(ref_index).len();
            let labels = position_labels(options.ref_pos.as_deref(), ref_len);
            let ats = direct_ats(untrimmed, ref_index, trim_columns, &labels)?;
            let (alignment, ats, kept_columns) = truncate_to_reference(trimmed, ats, options.truncate);
            Resolution { strategy, ref_index, alignment, ats, kept_columns, distances: None }
        }
        ReferenceStrategy::Pdb => {
            let query = options.pdb.as_ref().ok_or_else(|| ScaError::config("PDB strategy without a PDB id"))?;
            let structure = source.fetch(&query.id, query.chain)?;
            let ref_index = match options.species.as_deref() {
                Some(species) => {
                    info!("Finding reference sequence using species-based best match..");
                    match msa_search(trimmed, structure.sequence.as_bytes(), Some(species)) {
                        Ok(idx) => idx,
                        Err(e) if e.is_no_match() => {
                            warn!("{}; falling back to a search of the whole alignment", e);
                            msa_search(trimmed, structure.sequence.as_bytes(), None)?
                        }
                        Err(e) => return Err(e),
                    }
                }
                None => {
                    info!("Finding reference sequence using global search...");
                    msa_search(trimmed, structure.sequence.as_bytes(), None)?
                }
            };
            let (alignment, ats, kept_columns) = make_ats(
                trimmed, ref_index, structure.sequence.as_bytes(), &structure.labels, options.truncate,
            )?;
            let distances = distances_for_ats(&structure, &ats);
            info!("ATS and distmat size - ATS: {}, distmat: {} x {}", ats.len(), distances.len(), distances.len());
            Resolution { strategy, ref_index, alignment, ats, kept_columns, distances: Some(distances) }
        }
        ReferenceStrategy::ReferenceSequence => {
            let path = options.ref_seq.as_deref().ok_or_else(|| ScaError::config("reference sequence strategy without a file"))?;
            info!("Finding reference sequence using provided sequence file...");
            let ref_seq = read_reference_sequence(path)?;
            let ref_index = msa_search(trimmed, &ref_seq, None)?;
            let labels = position_labels(options.ref_pos.as_deref(), ref_seq.len());
            let (alignment, ats, kept_columns) = make_ats(trimmed, ref_index, &ref_seq, &labels, options.truncate)?;
            Resolution { strategy, ref_index, alignment, ats, kept_columns, distances: None }
        }
        ReferenceStrategy::Automatic => {
            let ref_index = choose_ref_seq(trimmed, nproc)?;
            info!("No reference sequence given, chose as default ({}): {}", ref_index, trimmed.headers()[ref_index]);
            let ats = (1..=width).map(|p| Some(p.to_string())).collect();
            Resolution {
                strategy,
                ref_index,
                alignment: trimmed.clone(),
                ats,
                kept_columns: (0..width).collect(),
                distances: None,
            }
        }
    };
    debug_assert_eq!(resolution.ats.len(), resolution.kept_columns.len());
    Ok(resolution)
}

fn read_reference_sequence(path: &Path) -> ScaResult<Vec<u8>> {
    const STAGE: &str = "reading the reference sequence";
    let reference = read_alignment(path)
        .map_err(|e| ScaError::reference(STAGE, ResolutionFailure::MalformedReference(e.to_string())))?;
    let sequence: Vec<u8> = reference.row(0).iter().copied().filter(|&b| b != GAP).collect();
    if sequence.is_empty() {
        return Err(ScaError::reference(
            STAGE,
            ResolutionFailure::MalformedReference(format!("{:?} holds an empty sequence", path)),
        ));
    }
    if reference.len() > 1 {
        warn!("{:?} holds {} sequences, using the first", path, reference.len());
    }
    Ok(sequence)
}

/// Best matching row for `query`, restricted to headers mentioning `species`
pub fn msa_search(alignment: &Alignment, query: &[u8], species: Option<&str>) -> ScaResult<usize> {
    const STAGE: &str = "searching the alignment for the reference";
    if query.is_empty() {
        return Err(ScaError::reference(STAGE, ResolutionFailure::MalformedReference("empty query sequence".into())));
    }
    let candidates: Vec<usize> = match species {
        Some(species) => {
            let needle = species.to_lowercase();
            alignment.headers().iter().enumerate()
                .filter(|(_, h)| h.to_lowercase().contains(&needle))
                .map(|(i, _)| i)
                .collect()
        }
        None => (0..alignment.len()).collect(),
    };
    if candidates.is_empty() {
        return Err(ScaError::reference(
            STAGE,
            ResolutionFailure::NoMatch(format!("no header mentions species {:?}", species.unwrap_or(""))),
        ));
    }

    let mut best: Option<(usize, f64)> = None;
    let mut tied = 0;
    for idx in candidates {
        let row = alignment.ungapped_row(idx);
        let identity = global_align(&row, query).identical as f64 / query.len() as f64;
        debug!("{} identity to query {:.3}", alignment.headers()[idx], identity);
        match best {
            Some((_, b)) if identity < b => {}
            Some((_, b)) if identity == b => tied += 1,
            _ => {
                best = Some((idx, identity));
                tied = 0;
            }
        }
    }
    match best {
        Some((idx, identity)) if identity > 0.0 => {
            if tied > 0 {
                warn!(
                    "Ambiguous reference match: {} other sequences share the best identity {:.3}, using the first",
                    tied, identity
                );
            }
            info!("reference sequence index is: {} (identity {:.3})", idx, identity);
            info!("{}", alignment.headers()[idx]);
            Ok(idx)
        }
        _ => Err(ScaError::reference(
            STAGE,
            ResolutionFailure::NoMatch("no sequence shares residues with the query".into()),
        )),
    }
}

/// Label the columns of `alignment` by aligning the reference row to `ref_seq`.
/// Returns the (optionally truncated) alignment, its ATS and the kept columns.
pub fn make_ats(
    alignment: &Alignment,
    ref_index: usize,
    ref_seq: &[u8],
    labels: &[String],
    truncate: bool,
) -> ScaResult<(Alignment, Ats, Vec<usize>)> {
    let width = alignment.ensure_aligned()?;
    if labels.len() != ref_seq.len() {
        return Err(ScaError::input(format!(
            "{} position labels for a reference of {} residues", labels.len(), ref_seq.len()
        )));
    }
    let row = alignment.row(ref_index);
    let residue_columns: Vec<usize> = (0..width).filter(|&c| row[c] != GAP).collect();
    let residues: Vec<u8> = residue_columns.iter().map(|&c| row[c]).collect();
    let mapping = global_align(&residues, ref_seq);
    if mapping.pairs.is_empty() {
        return Err(ScaError::reference(
            "building the position mapping",
            ResolutionFailure::NoMatch(format!("{} has no residues aligned to the reference", alignment.headers()[ref_index])),
        ));
    }

    let mut ats: Ats = vec![None; width];
    for &(r, q) in &mapping.pairs {
        ats[residue_columns[r]] = Some(labels[q].clone());
    }
    Ok(truncate_to_reference(alignment, ats, truncate))
}

/// ATS read straight off the reference row: a trimmed column takes the label of the
/// reference residue it holds, counted along the untrimmed row
pub fn direct_ats(untrimmed: &Alignment, ref_index: usize, trim_columns: &[usize], labels: &[String]) -> ScaResult<Ats> {
    let row = untrimmed.row(ref_index);
    let mut rank = 0;
    let residue_rank: Vec<Option<usize>> = row.iter()
        .map(|&r| {
            if r == GAP {
                None
            } else {
                rank += 1;
                Some(rank - 1)
            }
        })
        .collect();
    let ats = trim_columns.iter()
        .map(|&c| match residue_rank.get(c) {
            Some(rank) => Ok(rank.and_then(|i| labels.get(i).cloned())),
            None => Err(ScaError::input(format!(
                "column {} outside the alignment width {}", c, row.len()
            ))),
        })
        .collect::<ScaResult<Ats>>()?;
    if ats.iter().all(Option::is_none) {
        return Err(ScaError::reference(
            "building the position mapping",
            ResolutionFailure::MalformedReference(format!(
                "{} has no residues in the trimmed alignment", untrimmed.headers()[ref_index]
            )),
        ));
    }
    Ok(ats)
}

/// Drop unlabelled columns when truncating; returns the alignment, its ATS and the kept columns
fn truncate_to_reference(alignment: &Alignment, ats: Ats, truncate: bool) -> (Alignment, Ats, Vec<usize>) {
    let width = ats.len();
    let mapped = ats.iter().filter(|a| a.is_some()).count();
    info!("Mapped {} of {} alignment positions to reference numbering", mapped, width);
    if !truncate {
        return (alignment.clone(), ats, (0..width).collect());
    }
    info!("truncating to reference sequence...");
    let keep: Vec<usize> = (0..width).filter(|&c| ats[c].is_some()).collect();
    let kept_ats = keep.iter().map(|&c| ats[c].clone()).collect();
    (alignment.select_columns(&keep), kept_ats, keep)
}

pub fn sequential_labels(count: usize) -> Vec<String> {
    (1..=count).map(|p| p.to_string()).collect()
}

/// One label per non-empty line
pub fn read_position_file(path: &Path) -> ScaResult<Vec<String>> {
    let contents = fs::read_to_string(path).map_err(|e| ScaError::io(path, e))?;
    let labels: Vec<String> = contents.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();
    if labels.is_empty() {
        return Err(ScaError::input(format!("reference position file {:?} is empty", path)));
    }
    Ok(labels)
}

/// Labels for a reference of `expected` residues; falls back to 1..N when the file cannot be used
pub fn position_labels(path: Option<&Path>, expected: usize) -> Vec<String> {
    match path {
        None => {
            info!("No reference position list provided. Using default numbering 1 to {}", expected);
            sequential_labels(expected)
        }
        Some(path) => match read_position_file(path) {
            Ok(labels) if labels.len() == expected => labels,
            Ok(labels) => {
                warn!(
                    "Reference position file {:?} lists {} positions for {} residues! Using default numbering 1 to {}",
                    path, labels.len(), expected, expected
                );
                sequential_labels(expected)
            }
            Err(e) => {
                warn!("Error reading reference position file ({})! Using default numbering 1 to {}", e, expected);
                sequential_labels(expected)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lib_utils::structure::tests::atom_line;
    use crate::lib_utils::gap_filter::filter_positions;
    use crate::lib_utils::structure::{parse_chain, ChainStructure, UNMAPPED_DISTANCE};
    use std::io::Write;

    struct FixedSource(Option<ChainStructure>);

    impl StructureSource for FixedSource {
        fn fetch(&self, pdb_id: &str, _chain: char) -> ScaResult<ChainStructure> {
            self.0.clone().ok_or_else(|| ScaError::reference(
                "loading the reference structure",
                ResolutionFailure::StructureUnavailable(pdb_id.to_string()),
            ))
        }
    }

    fn aln(records: &[(&str, &str)]) -> Alignment {
        Alignment::new(
            records.iter().map(|(h, _)| h.to_string()).collect(),
            records.iter().map(|(_, s)| s.to_string()).collect(),
        ).unwrap()
    }

    fn all_columns(alignment: &Alignment) -> Vec<usize> {
        (0..alignment.ensure_aligned().unwrap()).collect()
    }

    fn family() -> Alignment {
        aln(&[
            ("seq0 Escherichia coli", "MK-TAYIAKQ"),
            ("seq1 Homo sapiens", "MKSTAYLAKQ"),
            ("seq2 Mus musculus", "-KSWAYLGKQ"),
        ])
    }

    fn chain_for(sequence: &str, first_number: i32) -> ChainStructure {
        let lines: Vec<String> = sequence.chars().enumerate()
            .map(|(i, aa)| {
                let name = match aa {
                    'M' => "MET", 'K' => "LYS", 'S' => "SER", 'T' => "THR", 'A' => "ALA",
                    'Y' => "TYR", 'L' => "LEU", 'Q' => "GLN", 'I' => "ILE", _ => "GLY",
                };
                atom_line(i + 1, "CA", name, 'A', first_number + i as i32, ' ', [i as f64 * 3.8, 0.0, 0.0])
            })
            .collect();
        parse_chain(&lines.join("\n"), 'A').unwrap()
    }

    #[test]
    fn test_strategy_priority() {
        let mut options = ReferenceOptions {
            ref_seq: Some(PathBuf::from("ref.fasta")),
            pdb: Some(PdbQuery { id: "1ABC".into(), chain: 'A' }),
            ..Default::default()
        };
        assert_eq!(options.strategy(), ReferenceStrategy::Pdb);
        options.ref_index = Some(1);
        assert_eq!(options.strategy(), ReferenceStrategy::ExplicitIndex);
        assert_eq!(ReferenceOptions::default().strategy(), ReferenceStrategy::Automatic);
    }

    #[test]
    fn test_truncate_without_reference_is_configuration_error() {
        let options = ReferenceOptions { truncate: true, ..Default::default() };
        assert!(matches!(options.validate(), Err(ScaError::Configuration(_))));
    }

    #[test]
    fn test_explicit_index_wins() {
        let aln = family();
        let options = ReferenceOptions {
            ref_index: Some(2),
            pdb: Some(PdbQuery { id: "1ABC".into(), chain: 'A' }),
            ..Default::default()
        };
        let resolution = resolve_reference(&aln, &aln, &all_columns(&aln), &options, &FixedSource(None), 1).unwrap();
        assert_eq!(resolution.ref_index, 2);
        assert_eq!(resolution.strategy, ReferenceStrategy::ExplicitIndex);
        let expected: Ats = vec![None, Some("1".into()), Some("2".into()), Some("3".into()), Some("4".into()),
                                 Some("5".into()), Some("6".into()), Some("7".into()), Some("8".into()), Some("9".into())];
        assert_eq!(resolution.ats, expected);
    }

    #[test]
    fn test_explicit_index_numbering_skips_trimmed_columns() {
        let mut records = vec![("ref", "AAAAAAAAAA")];
        records.extend(std::iter::repeat(("gapped", "AAAA-AAAAA")).take(9));
        let untrimmed = aln(&records);
        let (trimmed, trim_columns) = filter_positions(&untrimmed, None, 0.8).unwrap();
        assert_eq!(trim_columns, vec![0, 1, 2, 3, 5, 6, 7, 8, 9]);

        let options = ReferenceOptions { ref_index: Some(0), ..Default::default() };
        let resolution = resolve_reference(&trimmed, &untrimmed, &trim_columns, &options, &FixedSource(None), 1).unwrap();
        let expected: Ats = ["1", "2", "3", "4", "6", "7", "8", "9", "10"].iter()
            .map(|l| Some(l.to_string()))
            .collect();
        assert_eq!(resolution.ats, expected);
        assert_eq!(resolution.kept_columns, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_explicit_index_truncates_to_reference_residues() {
        let aln = family();
        let options = ReferenceOptions { ref_index: Some(0), truncate: true, ..Default::default() };
        let resolution = resolve_reference(&aln, &aln, &all_columns(&aln), &options, &FixedSource(None), 1).unwrap();
        assert_eq!(resolution.kept_columns, vec![0, 1, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(resolution.ats.len(), 9);
        assert_eq!(resolution.ats[2].as_deref(), Some("3"));
        assert_eq!(resolution.alignment.row(0), b"MKTAYIAKQ");
    }

    #[test]
    fn test_explicit_index_out_of_range() {
        let aln = family();
        let options = ReferenceOptions { ref_index: Some(7), ..Default::default() };
        let err = resolve_reference(&aln, &aln, &all_columns(&aln), &options, &FixedSource(None), 1).unwrap_err();
        assert!(matches!(
            err,
            ScaError::ReferenceResolution { reason: ResolutionFailure::IndexOutOfRange { index: 7, count: 3 }, .. }
        ));
    }

    #[test]
    fn test_pdb_species_fallback_and_truncate() {
        let aln = family();
        // structure covers residues 2..=8 of the human sequence
        let source = FixedSource(Some(chain_for("KSTAYLA", 10)));
        let options = ReferenceOptions {
            pdb: Some(PdbQuery { id: "1ABC".into(), chain: 'A' }),
            species: Some("Danio rerio".into()),
            truncate: true,
            ..Default::default()
        };
        let resolution = resolve_reference(&aln, &aln, &all_columns(&aln), &options, &source, 1).unwrap();
        assert_eq!(resolution.ref_index, 1);
        assert_eq!(resolution.kept_columns, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(resolution.alignment.sequences()[1], "KSTAYLA");
        assert_eq!(resolution.ats.first(), Some(&Some("10".to_string())));
        let distances = resolution.distances.unwrap();
        assert_eq!(distances.len(), 7);
        assert!((distances[0][1] - 3.8).abs() < 1e-9);
    }

    #[test]
    fn test_pdb_unmapped_columns_get_sentinel() {
        let aln = family();
        let source = FixedSource(Some(chain_for("KSTAYLA", 10)));
        let options = ReferenceOptions {
            pdb: Some(PdbQuery { id: "1ABC".into(), chain: 'A' }),
            species: Some("homo SAPIENS".into()),
            ..Default::default()
        };
        let resolution = resolve_reference(&aln, &aln, &all_columns(&aln), &options, &source, 1).unwrap();
        assert_eq!(resolution.ref_index, 1);
        assert_eq!(resolution.ats.len(), 10);
        assert_eq!(resolution.ats[0], None);
        let distances = resolution.distances.unwrap();
        assert_eq!(distances[0][1], UNMAPPED_DISTANCE);
        assert_eq!(distances[0][0], 0.0);
    }

    #[test]
    fn test_structure_failure_is_fatal() {
        let aln = family();
        let options = ReferenceOptions {
            pdb: Some(PdbQuery { id: "1ABC".into(), chain: 'A' }),
            species: Some("Homo sapiens".into()),
            ..Default::default()
        };
        let err = resolve_reference(&aln, &aln, &all_columns(&aln), &options, &FixedSource(None), 1).unwrap_err();
        assert!(!err.is_no_match());
    }

    #[test]
    fn test_msa_search_no_species_match() {
        let err = msa_search(&family(), b"MKSTAYLAKQ", Some("Gallus")).unwrap_err();
        assert!(err.is_no_match());
        assert_eq!(msa_search(&family(), b"MKSTAYLAKQ", None).unwrap(), 1);
    }

    #[test]
    fn test_msa_search_tie_takes_first_row() {
        let tied = aln(&[
            ("seq0", "MKSTAYLAKQ"),
            ("seq1", "MKSTAYLAKQ"),
            ("seq2", "MKSTAYLAKQ"),
        ]);
        assert_eq!(msa_search(&tied, b"MKSTAYLAKQ", None).unwrap(), 0);
        assert_eq!(msa_search(&tied, b"MKSTAYLAKQ", Some("seq2")).unwrap(), 2);
    }

    #[test]
    fn test_reference_sequence_with_bad_position_file() {
        let dir = tempfile::tempdir().unwrap();
        let ref_path = dir.path().join("ref.fasta");
        fs::write(&ref_path, ">ref\nKSWAYLGKQ\n").unwrap();
        let pos_path = dir.path().join("positions.txt");
        let mut pos = fs::File::create(&pos_path).unwrap();
        writeln!(pos, "5\n6\n7").unwrap();

        let aln = family();
        let options = ReferenceOptions {
            ref_seq: Some(ref_path),
            ref_pos: Some(pos_path),
            ..Default::default()
        };
        let resolution = resolve_reference(&aln, &aln, &all_columns(&aln), &options, &FixedSource(None), 1).unwrap();
        assert_eq!(resolution.ref_index, 2);
        assert_eq!(resolution.ats[0], None);
        assert_eq!(resolution.ats[1], Some("1".to_string()));
        assert_eq!(resolution.ats[9], Some("9".to_string()));
    }

    #[test]
    fn test_position_labels_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let pos_path = dir.path().join("positions.txt");
        fs::write(&pos_path, "10\n11\n\n12A\n").unwrap();
        assert_eq!(position_labels(Some(&pos_path), 3), vec!["10", "11", "12A"]);
        assert_eq!(position_labels(Some(Path::new("/missing/positions.txt")), 2), vec!["1", "2"]);
    }

    #[test]
    fn test_automatic_uses_sequential_numbering() {
        let aln = family();
        let resolution = resolve_reference(&aln, &aln, &all_columns(&aln), &ReferenceOptions::default(), &FixedSource(None), 1).unwrap();
        assert_eq!(resolution.strategy, ReferenceStrategy::Automatic);
        assert_eq!(resolution.ats.len(), 10);
        assert_eq!(resolution.ats[9], Some("10".to_string()));
    }
}
