use rand::Rng;
use rand::distributions::{Alphanumeric, Distribution, Uniform};

use crate::args::CharacterSet;
use crate::error::WorkloadError;

/// Card-number shape. ASCII classes only: `\d` would also match non-ASCII digits.
pub const CARD_NUMBER_PATTERN: &str = "[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{4}";

const PRINTABLE_FIRST: u8 = b' ';
const PRINTABLE_LAST: u8 = b'~';

/// Produces synthetic plaintext for one character set.
#[derive(Debug)]
pub struct PayloadGenerator {
    source: Source,
    length: usize,
}

#[derive(Debug)]
enum Source {
    Alphanumeric,
    CardNumber(Box<rand_regex::Regex>),
    Printable,
}

impl PayloadGenerator {
    /// # Errors
    ///
    /// Returns an error if the card-number pattern fails to compile.
    pub fn new(charset: CharacterSet, length: usize) -> Result<Self, WorkloadError> {
        let source = match charset {
            CharacterSet::Alphanumeric => Source::Alphanumeric,
            CharacterSet::Digits => {
                let card = rand_regex::Regex::compile(CARD_NUMBER_PATTERN, 0).map_err(|err| {
                    WorkloadError::InvalidPattern {
                        pattern: CARD_NUMBER_PATTERN,
                        source: err,
                    }
                })?;
                Source::CardNumber(Box::new(card))
            }
            CharacterSet::Printable => Source::Printable,
        };
        Ok(Self { source, length })
    }

    /// One plaintext record. Card numbers have a fixed shape and ignore the
    /// configured length.
    #[must_use]
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match &self.source {
            Source::Alphanumeric => Alphanumeric
                .sample_iter(rng)
                .take(self.length)
                .map(char::from)
                .collect(),
            Source::CardNumber(card) => card.sample(rng),
            Source::Printable => {
                let range = Uniform::new_inclusive(PRINTABLE_FIRST, PRINTABLE_LAST);
                range
                    .sample_iter(rng)
                    .take(self.length)
                    .map(char::from)
                    .collect()
            }
        }
    }
}
