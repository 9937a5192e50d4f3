use serde::Serialize;

use simforge_core::Record;

use crate::errors::GenerationError;

/// Final ordered records handed to the writer.
///
/// Layout: uniques, then a verbatim copy of the first `duplicates`
/// uniques, then the invalid segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSequence {
    records: Vec<Record>,
    unique: usize,
    duplicates: usize,
    invalids: usize,
}

impl OutputSequence {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn uniques(&self) -> &[Record] {
        &self.records[..self.unique]
    }

    pub fn duplicate_segment(&self) -> &[Record] {
        &self.records[self.unique..self.unique + self.duplicates]
    }

    pub fn invalid_segment(&self) -> &[Record] {
        &self.records[self.unique + self.duplicates..]
    }

    pub fn unique_count(&self) -> usize {
        self.unique
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    pub fn invalid_count(&self) -> usize {
        self.invalids
    }
}

/// Concatenate uniques, the duplicate slice and the invalid segment.
pub fn assemble(
    uniques: Vec<Record>,
    duplicates: usize,
    invalids: Vec<Record>,
) -> Result<OutputSequence, GenerationError> {
    if duplicates > uniques.len() {
        return Err(GenerationError::InvalidConfig(format!(
            "duplicate count {} exceeds unique count {}",
            duplicates,
            uniques.len()
        )));
    }

    let unique = uniques.len();
    let invalid_count = invalids.len();
    let mut records = uniques;
    records.reserve(duplicates + invalid_count);
    records.extend_from_within(..duplicates);
    records.extend(invalids);

    Ok(OutputSequence {
        records,
        unique,
        duplicates,
        invalids: invalid_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[&str]) -> Vec<Record> {
        values
            .iter()
            .map(|value| Record::Number(value.to_string()))
            .collect()
    }

    #[test]
    fn duplicates_repeat_the_head_in_order() {
        let sequence = assemble(numbers(&["a", "b", "c", "d"]), 3, Vec::new()).expect("assemble");
        assert_eq!(sequence.len(), 7);
        assert_eq!(sequence.duplicate_segment(), &sequence.records()[..3]);
        assert!(sequence.invalid_segment().is_empty());
    }

    #[test]
    fn invalids_come_last() {
        let sequence =
            assemble(numbers(&["a", "b"]), 1, numbers(&["x", "y"])).expect("assemble");
        assert_eq!(sequence.records(), numbers(&["a", "b", "a", "x", "y"]).as_slice());
        assert_eq!(sequence.invalid_segment(), numbers(&["x", "y"]).as_slice());
    }

    #[test]
    fn zero_duplicates_and_no_invalids_is_identity() {
        let uniques = numbers(&["a", "b"]);
        let sequence = assemble(uniques.clone(), 0, Vec::new()).expect("assemble");
        assert_eq!(sequence.into_records(), uniques);
    }

    #[test]
    fn too_many_duplicates_is_rejected() {
        let result = assemble(numbers(&["a"]), 2, Vec::new());
        assert!(matches!(result, Err(GenerationError::InvalidConfig(_))));
    }
}
