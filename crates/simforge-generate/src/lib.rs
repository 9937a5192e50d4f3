//! Rule-based number and contact generation for simforge.
//!
//! This crate turns a `GenerationRequest` into prefix allocations,
//! generated records and an ordered output sequence, then writes that
//! sequence to a delimited flat file.

pub mod allocator;
pub mod assembler;
pub mod engine;
pub mod errors;
pub mod faker_rs;
pub mod generators;
pub mod model;
pub mod output;

pub use allocator::{PrefixPick, allocate};
pub use assembler::{OutputSequence, assemble};
pub use engine::{GeneratedSequence, GenerationEngine, GenerationResult, generate_sequence};
pub use errors::{GenerationError, WriteFailure};
pub use generators::{MalformationKind, is_valid_number};
pub use model::{FileReport, GenerateOptions, GenerationReport, NetworkTally};
pub use output::{WriteSummary, read_sequence, write_sequence};
