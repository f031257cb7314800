
// struct to handle file buffers


use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use log::debug;
use super::errors::{ScaError, ScaResult};

pub struct FileBufferHelper<R: BufRead> {
    pub path: PathBuf,
    pub buffer_reader: R,
    pub line: String
}

impl FileBufferHelper<BufReader<File>> {
    pub fn new(file: &Path) -> ScaResult<Self> {
        // initialise instance of FileBufferHelper over a file on disk
        let file_open = File::open(file).map_err(|e| ScaError::io(file, e))?;
        debug!("FileHelper created for: {:?}", file);
        Ok(Self::from_reader(BufReader::new(file_open), file))
    }
}

impl<R: BufRead> FileBufferHelper<R> {
    pub fn from_reader(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            buffer_reader: reader,
            line: String::new(),
        }
    }

    /// Replace `line` with the next line of the buffer. Returns false at end of input.
    pub fn read_next(&mut self) -> ScaResult<bool> {
        self.line.clear();
        let read = self.buffer_reader
            .read_line(&mut self.line)
            .map_err(|e| ScaError::io(&self.path, e))?;
        Ok(read > 0)
    }
}
