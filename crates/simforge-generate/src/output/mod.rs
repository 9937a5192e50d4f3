pub mod csv;

pub use self::csv::{WriteSummary, read_sequence, write_sequence};
