/*
    Persist the processed alignment
        <outdir>/<stem>processed.fasta   final alignment
        <outdir>/<name>.db.json          {"sequence": bundle} for the correlation stage
        <outdir>/<name>_workspace/       csv matrices for external analysis tools (optional)
*/


use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use log::info;
use serde::{Deserialize, Serialize};
use super::alignment::Alignment;
use super::errors::{ScaError, ScaResult};
use super::reference::{Ats, ReferenceStrategy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceBundle {
    pub alg: Vec<String>,
    pub hd: Vec<String>,
    pub msa_num: Vec<Vec<u8>>,
    pub seqw: Vec<f64>,
    pub nseq: usize,
    pub npos: usize,
    pub ats: Ats,
    pub effseqs: f64,
    pub limitseqs: bool,
    pub nseq_prelimit: usize,
    pub effseqs_prelimit: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pdbid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pdb_chain: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub distmat: Option<Vec<Vec<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub refseq: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub refpos: Option<PathBuf>,
    /// Reference row in the alignment as loaded (after the residue check)
    pub i_ref: usize,
    /// Reference row in the processed alignment, absent if subsampling dropped it
    pub i_ref_processed: Option<usize>,
    pub trim_parameters: [f64; 4],
    pub truncate_flag: bool,
    pub strategy: ReferenceStrategy,
}

/// Top-level database layout shared with the correlation stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaDatabase {
    pub sequence: SequenceBundle,
}

impl SequenceBundle {
    pub fn alignment(&self) -> ScaResult<Alignment> {
        Alignment::new(self.hd.clone(), self.alg.clone())
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub dir: PathBuf,
    /// Database name, defaults to the alignment file stem
    pub name: Option<String>,
    pub workspace_export: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("Outputs"),
            name: None,
            workspace_export: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub fasta: PathBuf,
    pub database: PathBuf,
    pub workspace: Option<PathBuf>,
}

/// File name up to the first '.'
pub fn alignment_stem(alignment: &Path) -> String {
    alignment.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or("alignment")
        .to_string()
}

pub fn write_fasta_file(alignment: &Alignment, path: &Path) -> ScaResult<()> {
    let file = File::create(path).map_err(|e| ScaError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    alignment.write_fasta(&mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| ScaError::io(path, e))
}

pub fn write_outputs(bundle: &SequenceBundle, alignment_path: &Path, options: &OutputOptions) -> ScaResult<OutputPaths> {
    fs::create_dir_all(&options.dir).map_err(|e| ScaError::io(&options.dir, e))?;
    let stem = alignment_stem(alignment_path);
    let name = options.name.clone().unwrap_or_else(|| stem.clone());

    let fasta = options.dir.join(format!("{stem}processed.fasta"));
    write_fasta_file(&bundle.alignment()?, &fasta)?;
    info!("Processed alignment written to {:?}", fasta);

    let database = options.dir.join(format!("{name}.db.json"));
    info!("Opening database file {:?}", database);
    let file = File::create(&database).map_err(|e| ScaError::io(&database, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &ScaDatabase { sequence: bundle.clone() })?;
    writer.flush().map_err(|e| ScaError::io(&database, e))?;

    let workspace = if options.workspace_export {
        let dir = options.dir.join(format!("{name}_workspace"));
        export_workspace(bundle, &dir)?;
        Some(dir)
    } else {
        None
    };
    Ok(OutputPaths { fasta, database, workspace })
}

pub fn read_database(path: &Path) -> ScaResult<ScaDatabase> {
    let file = File::open(path).map_err(|e| ScaError::io(path, e))?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

/// Numeric matrices as csv, one file per variable
pub fn export_workspace(bundle: &SequenceBundle, dir: &Path) -> ScaResult<()> {
    fs::create_dir_all(dir).map_err(|e| ScaError::io(dir, e))?;
    info!("Writing numeric workspace to {:?}", dir);

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(dir.join("msa_num.csv"))?;
    for row in &bundle.msa_num {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush().map_err(|e| ScaError::io(dir.join("msa_num.csv"), e))?;

    let mut writer = csv::Writer::from_path(dir.join("seqw.csv"))?;
    writer.write_record(["header", "weight"])?;
    for (header, weight) in bundle.hd.iter().zip(&bundle.seqw) {
        writer.write_record([header.as_str(), weight.to_string().as_str()])?;
    }
    writer.flush().map_err(|e| ScaError::io(dir.join("seqw.csv"), e))?;

    let mut writer = csv::Writer::from_path(dir.join("ats.csv"))?;
    writer.write_record(["column", "position"])?;
    for (column, label) in bundle.ats.iter().enumerate() {
        writer.write_record([(column + 1).to_string(), label.clone().unwrap_or_else(|| "-".into())])?;
    }
    writer.flush().map_err(|e| ScaError::io(dir.join("ats.csv"), e))?;

    if let Some(distmat) = &bundle.distmat {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(dir.join("distmat.csv"))?;
        for row in distmat {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        writer.flush().map_err(|e| ScaError::io(dir.join("distmat.csv"), e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> SequenceBundle {
        SequenceBundle {
            alg: vec!["AC-".into(), "ACD".into()],
            hd: vec!["a".into(), "b".into()],
            msa_num: vec![vec![1, 2, 0], vec![1, 2, 3]],
            seqw: vec![0.5, 0.5],
            nseq: 2,
            npos: 3,
            ats: vec![Some("1".into()), None, Some("2".into())],
            effseqs: 1.0,
            limitseqs: false,
            nseq_prelimit: 2,
            effseqs_prelimit: 1,
            pdbid: Some("1ABC".into()),
            pdb_chain: Some('A'),
            distmat: Some(vec![vec![0.0, 1000.0, 4.2], vec![1000.0, 0.0, 1000.0], vec![4.2, 1000.0, 0.0]]),
            refseq: None,
            refpos: None,
            i_ref: 0,
            i_ref_processed: Some(0),
            trim_parameters: [0.2, 0.2, 0.2, 0.8],
            truncate_flag: false,
            strategy: ReferenceStrategy::Pdb,
        }
    }

    #[test]
    fn test_alignment_stem() {
        assert_eq!(alignment_stem(Path::new("Inputs/PF00071_full.an")), "PF00071_full");
        assert_eq!(alignment_stem(Path::new("aln.tar.fasta")), "aln");
    }

    #[test]
    fn test_write_outputs_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let options = OutputOptions {
            dir: dir.path().join("Outputs"),
            name: Some("run1".into()),
            workspace_export: true,
        };
        let paths = write_outputs(&bundle(), Path::new("Inputs/family.fasta"), &options).unwrap();
        assert!(paths.fasta.ends_with("familyprocessed.fasta"));
        assert!(paths.database.ends_with("run1.db.json"));

        let database = read_database(&paths.database).unwrap();
        assert_eq!(database.sequence, bundle());

        let workspace = paths.workspace.unwrap();
        let ats = fs::read_to_string(workspace.join("ats.csv")).unwrap();
        assert_eq!(ats, "column,position\n1,1\n2,-\n3,2\n");
        let msa = fs::read_to_string(workspace.join("msa_num.csv")).unwrap();
        assert_eq!(msa, "1,2,0\n1,2,3\n");
        assert!(workspace.join("distmat.csv").is_file());
    }
}
