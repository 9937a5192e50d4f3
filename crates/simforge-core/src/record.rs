use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Field separator used by contact records.
pub const CONTACT_DELIMITER: char = '|';

/// Number of fields in a contact record.
pub const CONTACT_FIELD_COUNT: usize = 9;

/// A single generated output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Record {
    /// Bare number string, well-formed or intentionally malformed.
    Number(String),
    /// Nine-field contact row.
    Contact(ContactRecord),
}

impl Record {
    pub fn shape(&self) -> RecordShape {
        match self {
            Record::Number(_) => RecordShape::Number,
            Record::Contact(_) => RecordShape::Contact,
        }
    }

    /// The phone number carried by the record.
    pub fn number(&self) -> &str {
        match self {
            Record::Number(value) => value,
            Record::Contact(contact) => &contact.number,
        }
    }

    /// Fields in output order.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Record::Number(value) => vec![value.as_str()],
            Record::Contact(contact) => contact.fields().to_vec(),
        }
    }

    /// Rebuild a record from the fields of one output line.
    pub fn from_fields(shape: RecordShape, fields: Vec<String>) -> Result<Self> {
        match shape {
            RecordShape::Number => {
                let mut fields = fields.into_iter();
                match (fields.next(), fields.next()) {
                    (Some(value), None) => Ok(Record::Number(value)),
                    _ => Err(Error::InvalidConfig(
                        "number records carry exactly one field".to_string(),
                    )),
                }
            }
            RecordShape::Contact => ContactRecord::from_fields(fields).map(Record::Contact),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Number(value) => f.write_str(value),
            Record::Contact(contact) => write!(f, "{contact}"),
        }
    }
}

/// Line layout of an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordShape {
    Number,
    Contact,
}

/// Contact row in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub first_name: String,
    pub middle_initial: String,
    pub last_name: String,
    pub number: String,
    pub company: String,
    pub job_title: String,
    pub department: String,
    pub email: String,
    pub address: String,
}

impl ContactRecord {
    pub fn fields(&self) -> [&str; CONTACT_FIELD_COUNT] {
        [
            &self.first_name,
            &self.middle_initial,
            &self.last_name,
            &self.number,
            &self.company,
            &self.job_title,
            &self.department,
            &self.email,
            &self.address,
        ]
    }

    pub fn from_fields(fields: Vec<String>) -> Result<Self> {
        let count = fields.len();
        let Ok(
            [
                first_name,
                middle_initial,
                last_name,
                number,
                company,
                job_title,
                department,
                email,
                address,
            ],
        ) = <[String; CONTACT_FIELD_COUNT]>::try_from(fields)
        else {
            return Err(Error::InvalidConfig(format!(
                "contact records carry {CONTACT_FIELD_COUNT} fields, found {count}"
            )));
        };
        Ok(Self {
            first_name,
            middle_initial,
            last_name,
            number,
            company,
            job_title,
            department,
            email,
            address,
        })
    }
}

impl fmt::Display for ContactRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, field) in self.fields().iter().enumerate() {
            if idx > 0 {
                write!(f, "{CONTACT_DELIMITER}")?;
            }
            f.write_str(field)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_contact() -> ContactRecord {
        ContactRecord {
            first_name: "Maria".to_string(),
            middle_initial: "Q".to_string(),
            last_name: "Santos".to_string(),
            number: "09171234567".to_string(),
            company: "Acme Corp".to_string(),
            job_title: "Engineer".to_string(),
            department: "IT".to_string(),
            email: "maria.santos@acmecorp.com".to_string(),
            address: "12 Rizal Street, Manila".to_string(),
        }
    }

    #[test]
    fn contact_displays_pipe_delimited_in_field_order() {
        let line = sample_contact().to_string();
        assert_eq!(
            line,
            "Maria|Q|Santos|09171234567|Acme Corp|Engineer|IT|maria.santos@acmecorp.com|12 Rizal Street, Manila"
        );
    }

    #[test]
    fn contact_from_fields_rejects_short_rows() {
        let fields = vec!["only".to_string(), "two".to_string()];
        assert!(matches!(
            ContactRecord::from_fields(fields),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn number_record_exposes_single_field() {
        let record = Record::Number("639171234567".to_string());
        assert_eq!(record.fields(), vec!["639171234567"]);
        assert_eq!(record.shape(), RecordShape::Number);
    }
}
