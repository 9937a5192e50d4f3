use std::fs;
use std::path::PathBuf;

use simforge_core::{
    GenerationRequest, Network, NetworkCount, NetworkTable, RecordKind, RecordShape,
};
use simforge_generate::{
    GenerateOptions, GenerationEngine, GenerationError, MalformationKind, read_sequence,
};

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("simforge_generate_{label}_{}", uuid::Uuid::new_v4()));
    dir
}

fn engine(out_dir: PathBuf, file_name: &str, seed: u64) -> GenerationEngine {
    let options = GenerateOptions {
        out_dir,
        file_name: file_name.to_string(),
        seed: Some(seed),
        ..GenerateOptions::default()
    };
    GenerationEngine::new(NetworkTable::philippines(), options)
}

#[test]
fn generate_is_deterministic() {
    let request = GenerationRequest::priority(500, 500);

    let result_a = engine(temp_out_dir("run_a"), "Schedule_1.csv", 17)
        .run(&request)
        .expect("run generation A");
    let result_b = engine(temp_out_dir("run_b"), "Schedule_1.csv", 17)
        .run(&request)
        .expect("run generation B");

    let contents_a = fs::read_to_string(&result_a.report.files[0].path).expect("read A");
    let contents_b = fs::read_to_string(&result_b.report.files[0].path).expect("read B");
    assert_eq!(contents_a, contents_b, "output should be deterministic");
}

#[test]
fn generate_respects_record_counts() {
    let request = GenerationRequest::priority(50, 50);
    let result = engine(temp_out_dir("counts"), "Schedule_1.csv", 3)
        .run(&request)
        .expect("run generation");

    let file = &result.report.files[0];
    assert_eq!(file.records_total, 100);
    assert_eq!(file.unique_records, 50);
    assert_eq!(file.duplicate_records, 50);
    assert_eq!(file.invalid_records, 0);

    let contents = fs::read_to_string(&file.path).expect("read output");
    assert_eq!(contents.lines().count(), 100);
    let lines: Vec<String> = contents.lines().map(str::to_string).collect();
    assert_eq!(file.first_samples, lines[..3].to_vec());
    assert_eq!(file.last_samples, lines[97..].to_vec());
    // the duplicate slice repeats the head of the file
    assert_eq!(lines[50..53], lines[..3]);
}

#[test]
fn written_numbers_read_back_in_order() {
    let out_dir = temp_out_dir("roundtrip_numbers");
    let engine = engine(out_dir, "Mixed.csv", 8);
    let request = GenerationRequest::uniform(40).with_invalids(40);

    let mut rng = <rand_chacha::ChaCha8Rng as rand::SeedableRng>::seed_from_u64(8);
    let expected = engine.generate(&request, &mut rng).expect("generate in memory");
    let result = engine.run(&request).expect("run generation");

    let read_back = read_sequence(&result.report.files[0].path, RecordShape::Number)
        .expect("read sequence");
    assert_eq!(read_back.as_slice(), expected.sequence.records());
}

#[test]
fn written_contacts_read_back_in_order() {
    let out_dir = temp_out_dir("roundtrip_contacts");
    let engine = engine(out_dir, "Contacts.csv", 9);
    let request = GenerationRequest::explicit(
        vec![
            NetworkCount::new("Globe/TM", 2),
            NetworkCount::new("Smart", 2),
            NetworkCount::new("TNT", 2),
            NetworkCount::new("Smart/TNT", 2),
            NetworkCount::new("Sun", 2),
        ],
        5,
    )
    .with_record_kind(RecordKind::Contact);

    let mut rng = <rand_chacha::ChaCha8Rng as rand::SeedableRng>::seed_from_u64(9);
    let expected = engine.generate(&request, &mut rng).expect("generate in memory");
    let result = engine.run(&request).expect("run generation");
    let path = &result.report.files[0].path;

    let contents = fs::read_to_string(path).expect("read output");
    for line in contents.lines() {
        assert_eq!(line.split('|').count(), 9, "{line}");
    }

    let read_back = read_sequence(path, RecordShape::Contact).expect("read sequence");
    assert_eq!(read_back.as_slice(), expected.sequence.records());
    assert_eq!(read_back.len(), 15);
}

#[test]
fn multiple_files_get_numbered_names_and_distinct_contents() {
    let out_dir = temp_out_dir("multi");
    let options = GenerateOptions {
        out_dir: out_dir.clone(),
        file_name: "Valid.csv".to_string(),
        files: 3,
        seed: Some(5),
        write_report: true,
        ..GenerateOptions::default()
    };
    let engine = GenerationEngine::new(NetworkTable::philippines(), options);

    let result = engine
        .run(&GenerationRequest::uniform(20))
        .expect("run generation");

    assert_eq!(result.report.files.len(), 3);
    for n in 1..=3 {
        assert!(out_dir.join(format!("Valid_{n}.csv")).exists());
    }
    let first = fs::read_to_string(out_dir.join("Valid_1.csv")).expect("read first");
    let second = fs::read_to_string(out_dir.join("Valid_2.csv")).expect("read second");
    assert_ne!(first, second);

    let report_path = result.report_path.expect("report path");
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(report_path).expect("read report"))
            .expect("parse report");
    assert_eq!(report["seed"], serde_json::json!(5));
    assert_eq!(
        report["files"].as_array().map(|files| files.len()),
        Some(3)
    );
}

#[test]
fn unique_invalid_run_writes_distinct_values() {
    let options = GenerateOptions {
        out_dir: temp_out_dir("invalid"),
        file_name: "Invalid_25.csv".to_string(),
        seed: Some(25),
        malformations: vec![
            MalformationKind::WrongLength,
            MalformationKind::SymbolContamination,
        ],
        ..GenerateOptions::default()
    };
    let engine = GenerationEngine::new(NetworkTable::philippines(), options);

    let result = engine
        .run(&GenerationRequest::invalid_only(25))
        .expect("run generation");

    let file = &result.report.files[0];
    assert_eq!(file.records_total, 25);
    assert_eq!(file.invalid_records, 25);
    assert_eq!(file.distinct_numbers, 25);
}

#[test]
fn configuration_errors_do_not_touch_the_filesystem() {
    let out_dir = temp_out_dir("bad_config");
    let engine = engine(out_dir.clone(), "Bad.csv", 1);

    let result = engine.run(&GenerationRequest::priority(2, 5));

    assert!(matches!(
        result,
        Err(GenerationError::Core(simforge_core::Error::InvalidConfig(_)))
    ));
    assert!(!out_dir.exists());
}

#[test]
fn unknown_network_fails_before_any_file_is_written() {
    let out_dir = temp_out_dir("unknown_network");
    let engine = engine(out_dir.clone(), "Dito_1_dup_0.csv", 1);
    let request = GenerationRequest::explicit(vec![NetworkCount::new("Dito", 1)], 0);

    let result = engine.run(&request);

    assert!(matches!(
        result,
        Err(GenerationError::Core(simforge_core::Error::InvalidConfig(message)))
            if message.contains("Dito")
    ));
    assert!(!out_dir.exists());
}

#[test]
fn palette_unusable_for_table_fails_before_any_file_is_written() {
    let out_dir = temp_out_dir("unusable_palette");
    let table = NetworkTable::new(vec![Network::new("Odd", &["000", "111", "222"])])
        .expect("valid table");
    let options = GenerateOptions {
        out_dir: out_dir.clone(),
        file_name: "Mixed.csv".to_string(),
        files: 3,
        seed: Some(2),
        malformations: vec![MalformationKind::FillerPrefix],
        ..GenerateOptions::default()
    };
    let engine = GenerationEngine::new(table, options);

    let result = engine.run(&GenerationRequest::uniform(5).with_invalids(5));

    assert!(matches!(result, Err(GenerationError::InvalidConfig(_))));
    assert!(!out_dir.exists());
}
