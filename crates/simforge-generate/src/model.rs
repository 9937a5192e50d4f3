use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use simforge_core::{NumberFormat, RecordKind};

use crate::faker_rs::LocaleKey;
use crate::generators::MalformationKind;

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where output files are written.
    pub out_dir: PathBuf,
    /// Output file name; numbered `<stem>_<n>.<ext>` when `files > 1`.
    pub file_name: String,
    /// Number of files to generate from the same request.
    pub files: usize,
    /// Run seed; drawn from OS entropy when absent.
    pub seed: Option<u64>,
    /// Locale for contact fields.
    pub locale: LocaleKey,
    /// Malformation kinds to draw from; every kind when empty.
    pub malformations: Vec<MalformationKind>,
    /// Write `generation_report.json` next to the outputs.
    pub write_report: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            file_name: "Output.csv".to_string(),
            files: 1,
            seed: None,
            locale: LocaleKey::default(),
            malformations: Vec::new(),
            write_report: false,
        }
    }
}

/// Unique records allocated to one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkTally {
    pub network: String,
    pub count: u64,
}

/// Summary of one written file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub seed: u64,
    pub records_total: u64,
    pub unique_records: u64,
    pub duplicate_records: u64,
    pub invalid_records: u64,
    /// Distinct numbers across the whole file.
    pub distinct_numbers: u64,
    pub bytes_written: u64,
    pub network_distribution: Vec<NetworkTally>,
    pub first_samples: Vec<String>,
    pub last_samples: Vec<String>,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub generated_at: String,
    pub seed: u64,
    pub mode: String,
    pub record_kind: RecordKind,
    pub number_format: NumberFormat,
    pub duration_ms: u64,
    pub files: Vec<FileReport>,
}

impl GenerationReport {
    pub fn records_total(&self) -> u64 {
        self.files.iter().map(|file| file.records_total).sum()
    }
}
