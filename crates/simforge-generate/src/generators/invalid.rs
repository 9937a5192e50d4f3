use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use simforge_core::{NetworkTable, NumberFormat};

use crate::errors::GenerationError;
use crate::generators::number::{is_valid_number, push_digits, random_digits};

const FILLER_PREFIXES: &[&str] = &["000", "111", "222"];
const UNASSIGNED_PREFIXES: &[&str] = &["000", "123", "555"];
const CONTAMINATED_PREFIXES: &[&str] = &["81", "90", "91"];
const CONTAMINATION_CHARSET: &[u8] = b"abcdefghijABCDEFGHIJ!@#$%^&*()";
const SUFFIX_CHARSET: &[u8] = b"ABCD!@#$";
const RANDOM_DIGIT_LENGTHS: &[usize] = &[8, 9, 10, 13, 14, 15];
const MAX_DRAWS_PER_NUMBER: usize = 32;
const MIN_UNIQUE_ATTEMPTS: usize = 1000;

/// One way of breaking the valid-number shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformationKind {
    /// `6` followed by 0-5 and nine digits.
    WrongCountryCode,
    /// `63`, one digit 1-9 and eight digits.
    WrongLength,
    /// Placeholder prefixes such as `111`.
    FillerPrefix,
    /// Prefixes no carrier owns, such as `555`.
    UnassignedPrefix,
    /// Digits only, at a length no format uses.
    RandomDigits,
    /// Two-digit prefix followed by letters and symbols.
    SymbolContamination,
    /// Real carrier prefix followed by non-digit characters.
    NonDigitSuffix,
}

impl MalformationKind {
    pub const ALL: [MalformationKind; 7] = [
        MalformationKind::WrongCountryCode,
        MalformationKind::WrongLength,
        MalformationKind::FillerPrefix,
        MalformationKind::UnassignedPrefix,
        MalformationKind::RandomDigits,
        MalformationKind::SymbolContamination,
        MalformationKind::NonDigitSuffix,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MalformationKind::WrongCountryCode => "wrong_country_code",
            MalformationKind::WrongLength => "wrong_length",
            MalformationKind::FillerPrefix => "filler_prefix",
            MalformationKind::UnassignedPrefix => "unassigned_prefix",
            MalformationKind::RandomDigits => "random_digits",
            MalformationKind::SymbolContamination => "symbol_contamination",
            MalformationKind::NonDigitSuffix => "non_digit_suffix",
        }
    }

    /// False when `table` owns every candidate prefix of this kind, so
    /// its output would pass the shape check.
    pub fn usable_with(self, table: &NetworkTable) -> bool {
        match self {
            MalformationKind::FillerPrefix => has_unowned(FILLER_PREFIXES, table),
            MalformationKind::UnassignedPrefix => has_unowned(UNASSIGNED_PREFIXES, table),
            _ => true,
        }
    }

    pub fn generate<R: Rng + ?Sized>(self, table: &NetworkTable, rng: &mut R) -> String {
        match self {
            MalformationKind::WrongCountryCode => wrong_country_code(rng),
            MalformationKind::WrongLength => wrong_length(rng),
            MalformationKind::FillerPrefix => blacklisted_prefix(FILLER_PREFIXES, table, rng),
            MalformationKind::UnassignedPrefix => {
                blacklisted_prefix(UNASSIGNED_PREFIXES, table, rng)
            }
            MalformationKind::RandomDigits => {
                let len = RANDOM_DIGIT_LENGTHS.choose(rng).copied().unwrap_or(8);
                random_digits(len, rng)
            }
            MalformationKind::SymbolContamination => symbol_contamination(rng),
            MalformationKind::NonDigitSuffix => non_digit_suffix(table, rng),
        }
    }
}

impl fmt::Display for MalformationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MalformationKind {
    type Err = GenerationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().replace('-', "_");
        MalformationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                GenerationError::InvalidConfig(format!("unknown malformation kind '{value}'"))
            })
    }
}

fn wrong_country_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut value = String::with_capacity(11);
    value.push('6');
    value.push(char::from(b'0' + rng.random_range(0..=5u8)));
    push_digits(&mut value, 9, rng);
    value
}

fn wrong_length<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut value = String::with_capacity(11);
    value.push_str("63");
    value.push(char::from(b'0' + rng.random_range(1..=9u8)));
    push_digits(&mut value, 8, rng);
    value
}

fn has_unowned(candidates: &[&str], table: &NetworkTable) -> bool {
    candidates.iter().any(|prefix| !table.contains_prefix(prefix))
}

fn blacklisted_prefix<R: Rng + ?Sized>(
    candidates: &[&'static str],
    table: &NetworkTable,
    rng: &mut R,
) -> String {
    let unowned: Vec<&str> = candidates
        .iter()
        .copied()
        .filter(|prefix| !table.contains_prefix(prefix))
        .collect();
    let pool: &[&str] = if unowned.is_empty() { candidates } else { &unowned };
    let prefix = pool.choose(rng).copied().unwrap_or("000");

    let mut value = String::with_capacity(12);
    value.push_str("63");
    value.push_str(prefix);
    push_digits(&mut value, NumberFormat::SUBSCRIBER_DIGITS, rng);
    value
}

fn symbol_contamination<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut value = String::with_capacity(11);
    value.push_str("63");
    value.push_str(CONTAMINATED_PREFIXES.choose(rng).copied().unwrap_or("90"));
    push_charset(&mut value, CONTAMINATION_CHARSET, 7, rng);
    value
}

fn non_digit_suffix<R: Rng + ?Sized>(table: &NetworkTable, rng: &mut R) -> String {
    let prefixes = table.flattened();
    let mut value = String::with_capacity(12);
    value.push_str("63");
    match prefixes.choose(rng) {
        Some((_, prefix)) => value.push_str(prefix),
        None => push_digits(&mut value, 3, rng),
    }
    push_charset(&mut value, SUFFIX_CHARSET, 7, rng);
    value
}

fn push_charset<R: Rng + ?Sized>(value: &mut String, charset: &[u8], len: usize, rng: &mut R) {
    for _ in 0..len {
        let idx = rng.random_range(0..charset.len());
        value.push(char::from(charset[idx]));
    }
}

/// Reject a palette holding a kind that cannot break the shape check
/// for `table`. An empty palette stands for every usable kind.
pub fn check_palette(
    palette: &[MalformationKind],
    table: &NetworkTable,
) -> Result<(), GenerationError> {
    if let Some(kind) = palette.iter().find(|kind| !kind.usable_with(table)) {
        return Err(GenerationError::InvalidConfig(format!(
            "malformation kind '{kind}' cannot produce invalid numbers: \
             the network table owns all of its prefixes"
        )));
    }
    if effective_palette(palette, table).is_empty() {
        return Err(GenerationError::InvalidConfig(
            "no malformation kind can produce invalid numbers for this table".to_string(),
        ));
    }
    Ok(())
}

fn effective_palette<'a>(
    palette: &'a [MalformationKind],
    table: &NetworkTable,
) -> Cow<'a, [MalformationKind]> {
    if !palette.is_empty() {
        return Cow::Borrowed(palette);
    }
    if MalformationKind::ALL.iter().all(|kind| kind.usable_with(table)) {
        return Cow::Borrowed(&MalformationKind::ALL);
    }
    Cow::Owned(
        MalformationKind::ALL
            .into_iter()
            .filter(|kind| kind.usable_with(table))
            .collect(),
    )
}

/// Draw one malformed number from `palette` (every usable kind when
/// empty).
///
/// A draw that happens to satisfy either valid format is discarded.
pub fn generate_invalid_number<R: Rng + ?Sized>(
    palette: &[MalformationKind],
    table: &NetworkTable,
    rng: &mut R,
) -> Result<(MalformationKind, String), GenerationError> {
    let palette = effective_palette(palette, table);

    for _ in 0..MAX_DRAWS_PER_NUMBER {
        let kind = palette.choose(rng).copied().ok_or_else(|| {
            GenerationError::InvalidConfig("malformation palette is empty".to_string())
        })?;
        let value = kind.generate(table, rng);
        let valid = [NumberFormat::International, NumberFormat::Trunk]
            .into_iter()
            .any(|format| is_valid_number(table, format, &value));
        if !valid {
            return Ok((kind, value));
        }
    }

    Err(GenerationError::InvalidConfig(
        "malformation palette keeps producing valid numbers for this table".to_string(),
    ))
}

/// `count` malformed numbers, in draw order.
pub fn generate_invalid_numbers<R: Rng + ?Sized>(
    count: usize,
    palette: &[MalformationKind],
    table: &NetworkTable,
    rng: &mut R,
) -> Result<Vec<String>, GenerationError> {
    (0..count)
        .map(|_| generate_invalid_number(palette, table, rng).map(|(_, value)| value))
        .collect()
}

/// `count` distinct malformed numbers, in first-draw order.
pub fn generate_unique_invalid_numbers<R: Rng + ?Sized>(
    count: usize,
    palette: &[MalformationKind],
    table: &NetworkTable,
    rng: &mut R,
) -> Result<Vec<String>, GenerationError> {
    let max_attempts = count.saturating_mul(100).max(MIN_UNIQUE_ATTEMPTS);
    let mut seen = HashSet::with_capacity(count);
    let mut values = Vec::with_capacity(count);

    for _ in 0..max_attempts {
        if values.len() == count {
            break;
        }
        let (_, value) = generate_invalid_number(palette, table, rng)?;
        if seen.insert(value.clone()) {
            values.push(value);
        }
    }

    if values.len() < count {
        return Err(GenerationError::InvalidConfig(format!(
            "could only draw {} distinct invalid numbers out of {count}",
            values.len()
        )));
    }
    Ok(values)
}
