//! Core contracts for simforge.
//!
//! This crate defines the carrier prefix table, the generation request
//! model, the record types and the configuration checks shared by the
//! generator and the CLI.

pub mod error;
pub mod network;
pub mod record;
pub mod request;
pub mod validation;

pub use error::{Error, Result};
pub use network::{Network, NetworkTable, PREFIX_LEN};
pub use record::{CONTACT_DELIMITER, CONTACT_FIELD_COUNT, ContactRecord, Record, RecordShape};
pub use request::{
    Allocation, FillStrategy, GenerationRequest, NetworkCount, NumberFormat, RecordKind,
};
pub use validation::validate_request;
