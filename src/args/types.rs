use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use crate::error::ValidationError;

/// Character set used when generating synthetic plaintext.
#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CharacterSet {
    /// Letters and digits, fixed length.
    #[default]
    Alphanumeric,
    /// Card-number shaped `dddd-dddd-dddd-dddd`; length is ignored.
    Digits,
    /// Printable ASCII, space through tilde.
    Printable,
}

impl CharacterSet {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CharacterSet::Alphanumeric => "alphanumeric",
            CharacterSet::Digits => "digits",
            CharacterSet::Printable => "printable",
        }
    }
}

/// How a source file is turned into a JSON-safe payload.
#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileEncoding {
    /// Keep ASCII bytes only; everything else is dropped.
    #[default]
    Ascii,
    /// Base64-encode the raw bytes; revealed text is decoded back.
    Base64,
}

impl FileEncoding {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FileEncoding::Ascii => "ascii",
            FileEncoding::Base64 => "base64",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveUsize(NonZeroUsize);

impl PositiveUsize {
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for PositiveUsize {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(value)
            .map(PositiveUsize)
            .ok_or_else(|| ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveUsize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: usize = s
            .trim()
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveUsize::try_from(value)
    }
}

impl From<PositiveUsize> for usize {
    fn from(value: PositiveUsize) -> Self {
        value.get()
    }
}
