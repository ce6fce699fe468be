//! Workload construction: synthetic plaintext or a file-sourced record.
mod file;
mod generate;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use rand::Rng;

use crate::args::{CharacterSet, FileEncoding, StressArgs};
use crate::error::WorkloadError;

pub use file::{FilePayload, ascii_only, decode_revealed, read_source};
pub use generate::{CARD_NUMBER_PATTERN, PayloadGenerator};

/// What to generate. Built once from the CLI and never changed afterwards.
#[derive(Debug, Clone)]
pub struct WorkloadSpec {
    pub character_set: CharacterSet,
    pub length: usize,
    pub batch_count: usize,
    pub source_file: Option<PathBuf>,
    pub file_encoding: FileEncoding,
    /// Generate every record independently instead of repeating one payload.
    pub fresh: bool,
}

impl WorkloadSpec {
    #[must_use]
    pub fn from_args(args: &StressArgs) -> Self {
        Self {
            character_set: args.charset,
            length: args.length.get(),
            batch_count: args.batch.get(),
            source_file: args.file.as_ref().map(PathBuf::from),
            file_encoding: args.file_encoding,
            fresh: args.fresh,
        }
    }
}

/// Where the records came from.
#[derive(Debug, Clone)]
pub enum WorkloadSource {
    Generated(CharacterSet),
    File(FilePayload),
}

/// Materialised plaintext records ready to submit.
#[derive(Debug, Clone)]
pub struct Workload {
    pub records: Vec<String>,
    pub byte_count: u64,
    pub source: WorkloadSource,
}

impl Workload {
    /// Builds the records described by `spec`.
    ///
    /// A source file always yields exactly one record and ignores
    /// `batch_count`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source file cannot be read or the generator
    /// cannot be built.
    pub fn build<R: Rng + ?Sized>(spec: &WorkloadSpec, rng: &mut R) -> Result<Self, WorkloadError> {
        if let Some(path) = spec.source_file.as_deref() {
            let payload = read_source(path, spec.file_encoding)?;
            return Ok(Self {
                records: vec![payload.record.clone()],
                byte_count: payload.byte_count,
                source: WorkloadSource::File(payload),
            });
        }

        let generator = PayloadGenerator::new(spec.character_set, spec.length)?;
        let records: Vec<String> = if spec.fresh {
            (0..spec.batch_count)
                .map(|_| generator.generate(rng))
                .collect()
        } else {
            vec![generator.generate(rng); spec.batch_count]
        };
        let byte_count = records.iter().map(|record| record.len() as u64).sum();

        Ok(Self {
            records,
            byte_count,
            source: WorkloadSource::Generated(spec.character_set),
        })
    }

    #[must_use]
    pub const fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Checks revealed records against what was submitted.
    ///
    /// Base64 file workloads compare decoded bytes with the raw file;
    /// everything else compares text.
    ///
    /// # Errors
    ///
    /// Returns an error if a base64 record cannot be decoded.
    pub fn matches_revealed(&self, revealed: &[String]) -> Result<bool, WorkloadError> {
        if let WorkloadSource::File(payload) = &self.source
            && let Some(raw) = payload.raw.as_deref()
        {
            let Some(first) = revealed.first() else {
                return Ok(false);
            };
            return Ok(revealed.len() == 1 && decode_revealed(first)? == raw);
        }
        Ok(self.records.as_slice() == revealed)
    }
}
