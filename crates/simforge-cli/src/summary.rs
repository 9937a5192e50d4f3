use std::fmt::Write as _;

use simforge_generate::{FileReport, GenerationResult};

/// Human-readable run summary printed to stdout after a successful run.
pub fn render_summary(result: &GenerationResult) -> String {
    let report = &result.report;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Generated {} file(s), {} records, seed {} ({} ms)",
        report.files.len(),
        report.records_total(),
        report.seed,
        report.duration_ms
    );
    for file in &report.files {
        render_file(&mut out, file);
    }
    if let Some(path) = &result.report_path {
        let _ = writeln!(out, "\nReport: {}", path.display());
    }
    out
}

fn render_file(out: &mut String, file: &FileReport) {
    let _ = writeln!(out, "\nCreated: {}", file.path.display());
    let _ = writeln!(
        out,
        "  records: {} (unique {}, duplicates {}, invalid {})",
        file.records_total, file.unique_records, file.duplicate_records, file.invalid_records
    );
    let _ = writeln!(out, "  distinct values: {}", file.distinct_numbers);
    let _ = writeln!(out, "  first: {}", file.first_samples.join(", "));
    let _ = writeln!(out, "  last:  {}", file.last_samples.join(", "));

    if file.network_distribution.iter().any(|tally| tally.count > 0) {
        let _ = writeln!(out, "  network distribution (unique records):");
        for tally in &file.network_distribution {
            let _ = writeln!(out, "    {}: {}", tally.network, tally.count);
        }
    }
}
