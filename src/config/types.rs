use serde::Deserialize;

use crate::args::{CharacterSet, FileEncoding};

/// On-disk run configuration. Every field is optional; flags given on the
/// command line (or through their environment variables) take precedence.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(alias = "host")]
    pub endpoint: Option<String>,
    #[serde(alias = "protection_policy")]
    pub policy: Option<String>,
    #[serde(alias = "batch_size")]
    pub batch: Option<usize>,
    pub username: Option<String>,
    pub bulk: Option<bool>,
    pub file: Option<String>,
    pub file_encoding: Option<FileEncoding>,
    pub charset: Option<CharacterSet>,
    pub length: Option<usize>,
    pub fresh: Option<bool>,
    pub export_json: Option<String>,
}
