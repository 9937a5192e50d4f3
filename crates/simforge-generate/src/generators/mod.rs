pub mod contact;
pub mod invalid;
pub mod number;

use rand::Rng;

use simforge_core::{NumberFormat, Record, RecordKind};

use crate::allocator::PrefixPick;
use crate::faker_rs::ContactFaker;

pub use contact::{DEPARTMENTS, generate_contact};
pub use invalid::{
    MalformationKind, check_palette, generate_invalid_number, generate_invalid_numbers,
    generate_unique_invalid_numbers,
};
pub use number::{generate_valid_number, is_valid_number, prefix_of, random_digits};

/// Builds unique-segment records from prefix picks.
#[derive(Debug, Clone, Copy)]
pub struct RecordFactory {
    kind: RecordKind,
    format: NumberFormat,
    faker: ContactFaker,
}

impl RecordFactory {
    pub fn new(kind: RecordKind, format: NumberFormat, faker: ContactFaker) -> Self {
        Self {
            kind,
            format,
            faker,
        }
    }

    pub fn format(&self) -> NumberFormat {
        self.format
    }

    pub fn generate<R: Rng + ?Sized>(&self, prefix: &str, rng: &mut R) -> Record {
        match self.kind {
            RecordKind::Number => Record::Number(generate_valid_number(prefix, self.format, rng)),
            RecordKind::Contact => {
                Record::Contact(generate_contact(prefix, self.format, &self.faker, rng))
            }
        }
    }

    /// One record per pick, in pick order.
    pub fn generate_all<R: Rng + ?Sized>(&self, picks: &[PrefixPick], rng: &mut R) -> Vec<Record> {
        picks
            .iter()
            .map(|pick| self.generate(&pick.prefix, rng))
            .collect()
    }
}
