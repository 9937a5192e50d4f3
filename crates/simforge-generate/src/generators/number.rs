use rand::Rng;

use simforge_core::{NetworkTable, NumberFormat, PREFIX_LEN};

/// `<lead><prefix><7 random digits>`.
pub fn generate_valid_number<R: Rng + ?Sized>(
    prefix: &str,
    format: NumberFormat,
    rng: &mut R,
) -> String {
    let mut value = String::with_capacity(format.width());
    value.push_str(format.lead());
    value.push_str(prefix);
    push_digits(&mut value, NumberFormat::SUBSCRIBER_DIGITS, rng);
    value
}

/// `len` independent uniform decimal digits.
pub fn random_digits<R: Rng + ?Sized>(len: usize, rng: &mut R) -> String {
    let mut value = String::with_capacity(len);
    push_digits(&mut value, len, rng);
    value
}

pub(crate) fn push_digits<R: Rng + ?Sized>(value: &mut String, len: usize, rng: &mut R) {
    for _ in 0..len {
        value.push(char::from(b'0' + rng.random_range(0..10u8)));
    }
}

/// Shape check only: lead digits, a prefix present in `table`, then
/// subscriber digits, at the exact width of `format`.
pub fn is_valid_number(table: &NetworkTable, format: NumberFormat, value: &str) -> bool {
    if value.len() != format.width() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let Some(rest) = value.strip_prefix(format.lead()) else {
        return false;
    };
    table.contains_prefix(&rest[..PREFIX_LEN])
}

/// Carrier prefix of a well-formed number, if any.
pub fn prefix_of<'a>(format: NumberFormat, value: &'a str) -> Option<&'a str> {
    value
        .strip_prefix(format.lead())
        .and_then(|rest| rest.get(..PREFIX_LEN))
}
