use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use log::info;
use msa_tools::lib_utils::bundle::write_fasta_file;
use msa_tools::lib_utils::headers::parse_gis;
use msa_tools::lib_utils::length_filter::filter_seq_size;
use msa_tools::{read_alignment, ScaError, ScaResult};

pub fn filter_size(alignment: &Path, tolerance: usize, output: &Path) -> ScaResult<usize> {
    let loaded = read_alignment(alignment)?;
    let (filtered, report) = filter_seq_size(&loaded, tolerance)?;
    info!(
        "Keeping {} of {} sequences (mean length {:.0}, min {}, max {})",
        report.kept, report.total, report.mean.round(), report.min, report.max
    );
    write_fasta_file(&filtered, output)?;
    Ok(report.kept)
}

pub fn parse_gi(alignment: &Path, output: &Path) -> ScaResult<usize> {
    let loaded = read_alignment(alignment)?;
    let gis = parse_gis(&loaded)?;
    let file = File::create(output).map_err(|e| ScaError::io(output, e))?;
    let mut writer = BufWriter::new(file);
    for gi in &gis {
        writeln!(writer, "{gi}").map_err(|e| ScaError::io(output, e))?;
    }
    writer.flush().map_err(|e| ScaError::io(output, e))?;
    info!("Wrote {} GI numbers to {:?}", gis.len(), output);
    Ok(gis.len())
}
