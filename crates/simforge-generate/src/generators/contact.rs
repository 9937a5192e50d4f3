use rand::Rng;
use rand::seq::IndexedRandom;

use simforge_core::{CONTACT_DELIMITER, ContactRecord, NumberFormat};

use crate::faker_rs::ContactFaker;
use crate::generators::number::generate_valid_number;

pub const DEPARTMENTS: &[&str] = &[
    "Sales",
    "Marketing",
    "IT",
    "HR",
    "Finance",
    "Operations",
    "R&D",
    "Logistics",
    "Admin",
    "Support",
    "Legal",
    "Strategy",
    "Management",
    "Production",
    "Creative",
    "Research",
    "Development",
];

/// Build one contact row around a freshly generated number.
pub fn generate_contact<R: Rng + ?Sized>(
    prefix: &str,
    format: NumberFormat,
    faker: &ContactFaker,
    rng: &mut R,
) -> ContactRecord {
    let first_name = strip_delimiters(&faker.first_name(rng));
    let middle_initial = char::from(rng.random_range(b'A'..=b'Z')).to_string();
    let last_name = strip_delimiters(&faker.last_name(rng));
    let number = generate_valid_number(prefix, format, rng);
    let company = strip_delimiters(&faker.company(rng));
    let job_title = strip_delimiters(&faker.job_title(rng));
    let department = DEPARTMENTS.choose(rng).copied().unwrap_or("Admin").to_string();
    let email = email_for(&first_name, &last_name, &company);
    let house_number = rng.random_range(1..=999);
    let street = strip_delimiters(&faker.street_name(rng));
    let city = strip_delimiters(&faker.city(rng));
    let address = format!("{house_number} {street}, {city}");

    ContactRecord {
        first_name,
        middle_initial,
        last_name,
        number,
        company,
        job_title,
        department,
        email,
        address,
    }
}

/// Remove commas, the field delimiter and line breaks from free text.
pub fn strip_delimiters(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ',' | '\r' | '\n') && *c != CONTACT_DELIMITER)
        .collect::<String>()
        .trim()
        .to_string()
}

/// `first.last@company.com`, lowercase, company without spaces.
pub fn email_for(first_name: &str, last_name: &str, company: &str) -> String {
    let domain: String = company.chars().filter(|c| !c.is_whitespace()).collect();
    format!(
        "{}.{}@{}.com",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        domain.to_lowercase()
    )
}
