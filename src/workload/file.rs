use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};

use crate::args::FileEncoding;
use crate::error::WorkloadError;

/// A file turned into a single JSON-safe record.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub path: PathBuf,
    pub encoding: FileEncoding,
    pub record: String,
    /// Bytes counted toward throughput: the ASCII text length, or the raw
    /// file size for base64.
    pub byte_count: u64,
    /// Raw file bytes, kept for base64 so the revealed text can be decoded
    /// and compared.
    pub raw: Option<Vec<u8>>,
}

/// Reads `path` fully and encodes it. The file handle is closed on return.
///
/// # Errors
///
/// Returns an error if the file cannot be read or yields an empty payload.
pub fn read_source(path: &Path, encoding: FileEncoding) -> Result<FilePayload, WorkloadError> {
    let bytes = std::fs::read(path).map_err(|err| WorkloadError::ReadSource {
        path: path.to_path_buf(),
        source: err,
    })?;
    let payload = encode_source(path, &bytes, encoding);
    if payload.record.is_empty() {
        return Err(WorkloadError::EmptySource {
            path: path.to_path_buf(),
        });
    }
    Ok(payload)
}

fn encode_source(path: &Path, bytes: &[u8], encoding: FileEncoding) -> FilePayload {
    match encoding {
        FileEncoding::Ascii => {
            let record = ascii_only(bytes);
            FilePayload {
                path: path.to_path_buf(),
                encoding,
                byte_count: record.len() as u64,
                record,
                raw: None,
            }
        }
        FileEncoding::Base64 => FilePayload {
            path: path.to_path_buf(),
            encoding,
            record: B64.encode(bytes),
            byte_count: bytes.len() as u64,
            raw: Some(bytes.to_vec()),
        },
    }
}

/// Keeps ASCII bytes and drops everything else.
#[must_use]
pub fn ascii_only(bytes: &[u8]) -> String {
    bytes
        .iter()
        .filter(|byte| byte.is_ascii())
        .map(|&byte| char::from(byte))
        .collect()
}

/// Decodes a revealed base64 record back into bytes.
///
/// # Errors
///
/// Returns an error if the revealed text is not valid base64.
pub fn decode_revealed(revealed: &str) -> Result<Vec<u8>, WorkloadError> {
    B64.decode(revealed.trim())
        .map_err(|err| WorkloadError::DecodeRevealed { source: err })
}
