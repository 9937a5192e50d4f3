use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use simforge_core::{GenerationRequest, NetworkTable, Record, validate_request};

use crate::allocator::{PrefixPick, allocate};
use crate::assembler::{OutputSequence, assemble};
use crate::errors::{GenerationError, WriteFailure, absolute_path};
use crate::faker_rs::ContactFaker;
use crate::generators::{
    MalformationKind, RecordFactory, check_palette, generate_invalid_numbers,
    generate_unique_invalid_numbers,
};
use crate::model::{FileReport, GenerateOptions, GenerationReport, NetworkTally};
use crate::output::write_sequence;

const SAMPLE_SIZE: usize = 3;
const REPORT_FILE_NAME: &str = "generation_report.json";

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub report: GenerationReport,
    pub report_path: Option<PathBuf>,
}

/// Sequence built in memory together with the picks behind its uniques.
#[derive(Debug, Clone)]
pub struct GeneratedSequence {
    pub sequence: OutputSequence,
    pub picks: Vec<PrefixPick>,
}

/// Entry point for generating files from a network table and a request.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    table: NetworkTable,
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(table: NetworkTable, options: GenerateOptions) -> Self {
        Self { table, options }
    }

    pub fn table(&self) -> &NetworkTable {
        &self.table
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Validate, generate and write every requested file.
    pub fn run(&self, request: &GenerationRequest) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        self.validate(request)?;
        let unique = request.unique_count()?;

        let run_id = uuid::Uuid::new_v4().to_string();
        let seed = self
            .options
            .seed
            .unwrap_or_else(|| rand::rng().random::<u64>());

        info!(
            event = "generation_started",
            run_id = %run_id,
            mode = request.allocation.mode(),
            unique,
            duplicates = request.duplicates,
            invalids = request.invalids,
            files = self.options.files,
            seed
        );

        let mut files = Vec::with_capacity(self.options.files);
        for index in 0..self.options.files {
            let file_seed = file_seed(seed, index, self.options.files);
            let path = self.output_path(index);
            let mut rng = ChaCha8Rng::seed_from_u64(file_seed);
            let generated = self.generate(request, &mut rng)?;
            let summary = write_sequence(&path, generated.sequence.records())?;

            info!(
                event = "file_written",
                path = %summary.path.display(),
                records = summary.records,
                bytes = summary.bytes
            );

            files.push(file_report(
                &generated,
                summary.path,
                summary.bytes,
                file_seed,
                &self.table,
            ));
        }

        let report = GenerationReport {
            run_id: run_id.clone(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            seed,
            mode: request.allocation.mode().to_string(),
            record_kind: request.record_kind,
            number_format: request.number_format(),
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            files,
        };

        let report_path = if self.options.write_report {
            Some(self.write_report(&report)?)
        } else {
            None
        };

        info!(
            event = "generation_finished",
            run_id = %run_id,
            records = report.records_total(),
            duration_ms = report.duration_ms
        );

        Ok(GenerationResult {
            report,
            report_path,
        })
    }

    /// Build one output sequence in memory; no filesystem access.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        request: &GenerationRequest,
        rng: &mut R,
    ) -> Result<GeneratedSequence, GenerationError> {
        self.validate(request)?;
        let faker = ContactFaker::new(self.options.locale);
        generate_sequence(
            &self.table,
            request,
            &self.options.malformations,
            faker,
            rng,
        )
    }

    fn validate(&self, request: &GenerationRequest) -> Result<(), GenerationError> {
        validate_request(&self.table, request)?;
        if request.invalids > 0 {
            check_palette(&self.options.malformations, &self.table)?;
        }
        if self.options.files == 0 {
            return Err(GenerationError::InvalidConfig(
                "file count must be at least 1".to_string(),
            ));
        }
        if self.options.file_name.trim().is_empty() {
            return Err(GenerationError::InvalidConfig(
                "output file name is empty".to_string(),
            ));
        }
        Ok(())
    }

    fn output_path(&self, index: usize) -> PathBuf {
        let name = numbered_file_name(&self.options.file_name, index, self.options.files);
        self.options.out_dir.join(name)
    }

    fn write_report(&self, report: &GenerationReport) -> Result<PathBuf, GenerationError> {
        let path = self.options.out_dir.join(REPORT_FILE_NAME);
        let bytes = serde_json::to_vec_pretty(report)?;
        std::fs::create_dir_all(&self.options.out_dir)
            .and_then(|_| std::fs::write(&path, bytes))
            .map_err(|err| WriteFailure::from_io(&err, &path))?;
        Ok(absolute_path(&path))
    }
}

/// Allocate, generate and assemble one sequence.
pub fn generate_sequence<R: Rng + ?Sized>(
    table: &NetworkTable,
    request: &GenerationRequest,
    malformations: &[MalformationKind],
    faker: ContactFaker,
    rng: &mut R,
) -> Result<GeneratedSequence, GenerationError> {
    let picks = allocate(table, &request.allocation, rng)?;
    info!(
        event = "allocation_finished",
        mode = request.allocation.mode(),
        picks = picks.len()
    );
    let factory = RecordFactory::new(request.record_kind, request.number_format(), faker);
    let uniques = factory.generate_all(&picks, rng);

    let invalid_values = if request.unique_invalids {
        generate_unique_invalid_numbers(request.invalids, malformations, table, rng)?
    } else {
        generate_invalid_numbers(request.invalids, malformations, table, rng)?
    };
    let invalids = invalid_values.into_iter().map(Record::Number).collect();

    let sequence = assemble(uniques, request.duplicates, invalids)?;
    debug!(
        event = "sequence_assembled",
        unique = sequence.unique_count(),
        duplicates = sequence.duplicate_count(),
        invalids = sequence.invalid_count()
    );
    Ok(GeneratedSequence { sequence, picks })
}

/// `<stem>_<n>.<ext>` (1-based) when more than one file is requested.
pub fn numbered_file_name(file_name: &str, index: usize, files: usize) -> String {
    if files <= 1 {
        return file_name.to_string();
    }
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    match path.extension() {
        Some(ext) => format!("{stem}_{}.{}", index + 1, ext.to_string_lossy()),
        None => format!("{stem}_{}", index + 1),
    }
}

fn file_seed(seed: u64, index: usize, files: usize) -> u64 {
    if files <= 1 {
        return seed;
    }
    hash_seed(seed, &format!("file_{index}"))
}

fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn file_report(
    generated: &GeneratedSequence,
    path: PathBuf,
    bytes_written: u64,
    seed: u64,
    table: &NetworkTable,
) -> FileReport {
    let sequence = &generated.sequence;
    let numbers: Vec<&str> = sequence.records().iter().map(Record::number).collect();
    let distinct: HashSet<&str> = numbers.iter().copied().collect();
    let last_start = numbers.len().saturating_sub(SAMPLE_SIZE);

    FileReport {
        path,
        seed,
        records_total: sequence.len() as u64,
        unique_records: sequence.unique_count() as u64,
        duplicate_records: sequence.duplicate_count() as u64,
        invalid_records: sequence.invalid_count() as u64,
        distinct_numbers: distinct.len() as u64,
        bytes_written,
        network_distribution: network_distribution(table, &generated.picks),
        first_samples: numbers.iter().take(SAMPLE_SIZE).map(|n| n.to_string()).collect(),
        last_samples: numbers[last_start..].iter().map(|n| n.to_string()).collect(),
    }
}

/// Unique records per network, in table order; networks without picks
/// are listed with zero.
pub fn network_distribution(table: &NetworkTable, picks: &[PrefixPick]) -> Vec<NetworkTally> {
    table
        .networks()
        .iter()
        .map(|network| NetworkTally {
            network: network.name.clone(),
            count: picks
                .iter()
                .filter(|pick| pick.network == network.name)
                .count() as u64,
        })
        .collect()
}
