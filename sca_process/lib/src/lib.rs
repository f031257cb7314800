/*
    Open the file
    Read the alignment in fasta format
        Look for ">"
            Header is the rest of the line
        Concatenate the lines after ">" and before the next ">" into the sequence
            Blank lines are skipped
            Sequences before any header, or headers without sequence are errors
    Hand the records to the preprocessing stages in lib_utils
*/


use std::io::BufRead;
use std::path::{Path, PathBuf};
use log::{debug, info, trace};
pub mod lib_utils;
use lib_utils::struct_helper::FileBufferHelper;

pub use lib_utils::alignment::Alignment;
pub use lib_utils::errors::{ResolutionFailure, ScaError, ScaResult};

pub fn read_alignment(infile: &Path) -> ScaResult<Alignment> {
    let mut alignment_file = FileBufferHelper::new(infile)?;
    info!("File opened successfully - {:?}", infile);
    parse_alignment(&mut alignment_file)
}

pub fn parse_alignment<R: BufRead>(alignment_file: &mut FileBufferHelper<R>) -> ScaResult<Alignment> {
    let mut headers: Vec<String> = Vec::new();
    let mut sequences: Vec<String> = Vec::new();
    let mut sequence = String::new();
    let mut found_header = false;

    while alignment_file.read_next()? {
        let line = alignment_file.line.trim_end();
        match line.as_bytes().first() {
            // match header
            Some(b'>') => {
                if found_header {
                    if sequence.is_empty() {
                        return Err(ScaError::input(format!(
                            "No sequence encountered after header {} in {:?}",
                            headers.last().map(String::as_str).unwrap_or(""),
                            alignment_file.path
                        )));
                    }
                    sequences.push(std::mem::take(&mut sequence));
                }
                trace!("Processing {}", line);
                headers.push(line[1..].to_string());
                found_header = true;
            },
            // blank line between records
            None => continue,
            Some(_) => {
                if !found_header {
                    return Err(ScaError::input(format!(
                        "Encountered sequence before header in {:?}", alignment_file.path
                    )));
                }
                sequence.push_str(&line.trim().to_ascii_uppercase());
            }
        }
    }
    if found_header {
        if sequence.is_empty() {
            return Err(ScaError::input(format!(
                "No sequence encountered after the last header in {:?}", alignment_file.path
            )));
        }
        sequences.push(sequence);
    }
    if headers.is_empty() {
        return Err(ScaError::input(format!("No records found in {:?}", alignment_file.path)));
    }
    debug!("Parsed {} records from {:?}", headers.len(), alignment_file.path);
    Alignment::new(headers, sequences)
}

/// Parse an in-memory fasta string; `label` names the source in error messages
pub fn parse_alignment_str(contents: &str, label: impl Into<PathBuf>) -> ScaResult<Alignment> {
    let mut buffer = FileBufferHelper::from_reader(contents.as_bytes(), label);
    parse_alignment(&mut buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiline_records() {
        let aln = parse_alignment_str(">seq1 Homo sapiens\nAC-\ndy\n\n>seq2\nAAAA\n", "mem").unwrap();
        assert_eq!(aln.headers(), &["seq1 Homo sapiens", "seq2"]);
        assert_eq!(aln.sequences(), &["AC-DY", "AAAA"]);
    }

    #[test]
    fn test_parse_rejects_sequence_before_header() {
        let err = parse_alignment_str("ACDE\n>seq1\nACDE\n", "mem").unwrap_err();
        assert!(matches!(err, ScaError::Input(_)));
    }

    #[test]
    fn test_parse_rejects_header_without_sequence() {
        assert!(parse_alignment_str(">a\n>b\nACD\n", "mem").is_err());
        assert!(parse_alignment_str(">a\nACD\n>b\n", "mem").is_err());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(parse_alignment_str("\n\n", "mem"), Err(ScaError::Input(_))));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_alignment(Path::new("/nonexistent/alignment.fasta")).unwrap_err();
        assert!(matches!(err, ScaError::Io { .. }));
    }
}
