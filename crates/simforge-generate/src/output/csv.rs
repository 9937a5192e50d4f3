use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::Terminator;
use serde::Serialize;

use simforge_core::{CONTACT_DELIMITER, Record, RecordShape};

use crate::errors::{GenerationError, WriteFailure, absolute_path};

/// What a successful write produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    /// Absolute path of the written file.
    pub path: PathBuf,
    pub records: usize,
    pub bytes: u64,
}

/// Write records as newline-delimited rows without a header.
///
/// Rows go to a sibling `.tmp` file that is renamed into place once fully
/// flushed, so a failure never leaves a partial output behind.
pub fn write_sequence(path: &Path, records: &[Record]) -> Result<WriteSummary, WriteFailure> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).map_err(|err| WriteFailure::from_io(&err, path))?;
    }

    let tmp_path = temp_path(path)?;
    let bytes = match write_rows(&tmp_path, records) {
        Ok(bytes) => bytes,
        Err(err) => {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(WriteFailure::from_io(&err, path));
        }
    };

    if let Err(err) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(WriteFailure::from_io(&err, path));
    }

    if !path.exists() {
        return Err(WriteFailure::new(
            io::ErrorKind::NotFound,
            "file creation failed silently",
            path,
        ));
    }

    Ok(WriteSummary {
        path: absolute_path(path),
        records: records.len(),
        bytes,
    })
}

/// Parse a written file back into records of the given shape.
pub fn read_sequence(path: &Path, shape: RecordShape) -> Result<Vec<Record>, GenerationError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(CONTACT_DELIMITER as u8)
        .flexible(true)
        .from_path(path)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let fields = row.iter().map(str::to_string).collect();
        records.push(Record::from_fields(shape, fields)?);
    }
    Ok(records)
}

fn write_rows(path: &Path, records: &[Record]) -> io::Result<u64> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    let counting = CountingWriter::new(BufWriter::new(file));
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(CONTACT_DELIMITER as u8)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(counting);

    for record in records {
        writer.write_record(record.fields())?;
    }

    writer.flush()?;
    let counting = writer
        .into_inner()
        .map_err(|err| io::Error::other(err.error().to_string()))?;
    let bytes = counting.bytes_written();
    let file: File = counting
        .into_inner()
        .into_inner()
        .map_err(|err| io::Error::other(err.error().to_string()))?;
    file.sync_all()?;
    Ok(bytes)
}

fn temp_path(path: &Path) -> Result<PathBuf, WriteFailure> {
    let file_name = path.file_name().ok_or_else(|| {
        WriteFailure::new(
            io::ErrorKind::InvalidInput,
            "output path has no file name",
            path,
        )
    })?;
    let tmp_name = format!("{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }

    fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("simforge_output_{label}_{}", uuid::Uuid::new_v4()));
        dir
    }

    #[test]
    fn writes_one_number_per_line_without_header() {
        let dir = temp_dir("numbers");
        let path = dir.join("nested").join("numbers.csv");
        let records = vec![
            Record::Number("639171234567".to_string()),
            Record::Number("63917@#AB!$C".to_string()),
        ];

        let summary = write_sequence(&path, &records).expect("write sequence");
        let contents = std::fs::read_to_string(&path).expect("read output");

        assert_eq!(contents, "639171234567\n63917@#AB!$C\n");
        assert_eq!(summary.records, 2);
        assert_eq!(summary.bytes, contents.len() as u64);
        assert!(summary.path.is_absolute());
        assert!(!path.with_file_name("numbers.csv.tmp").exists());
    }

    #[test]
    fn write_failure_reports_absolute_path() {
        let dir = temp_dir("blocked");
        std::fs::create_dir_all(&dir).expect("create dir");
        let blocker = dir.join("blocker");
        std::fs::write(&blocker, b"file, not a directory").expect("write blocker");
        let path = blocker.join("out.csv");

        let failure = write_sequence(&path, &[Record::Number("1".to_string())])
            .expect_err("parent is a file");

        assert!(failure.path.is_absolute());
        assert!(failure.path.ends_with("blocker/out.csv"));
        assert!(!failure.message.is_empty());
    }
}
