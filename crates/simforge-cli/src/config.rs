use std::path::{Path, PathBuf};

use serde::Deserialize;
use simforge_core::{FillStrategy, NetworkCount, NetworkTable};
use simforge_generate::MalformationKind;

use crate::CliError;
use crate::logging::LogFormat;

/// Values read from a `--config` TOML file. Every field is optional;
/// command-line flags take precedence over anything set here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub out_dir: Option<PathBuf>,
    pub file_name: Option<String>,
    pub files: Option<usize>,
    pub seed: Option<u64>,
    pub report: Option<bool>,
    pub log_format: Option<LogFormat>,
    pub locale: Option<String>,
    pub malformations: Option<Vec<MalformationKind>>,
    /// Replaces the built-in prefix table.
    pub networks: Option<NetworkTable>,
    pub priority: PrioritySection,
    pub distribution: CountsSection,
    pub contacts: CountsSection,
    pub uniform: UniformSection,
    pub invalid: InvalidSection,
    pub mixed: MixedSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrioritySection {
    pub unique: Option<usize>,
    pub duplicates: Option<usize>,
    pub order: Option<Vec<String>>,
    pub fill: Option<FillStrategy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CountsSection {
    pub networks: Option<Vec<NetworkCount>>,
    pub duplicates: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UniformSection {
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InvalidSection {
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MixedSection {
    pub total: Option<usize>,
    pub invalid: Option<usize>,
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfig, CliError> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let content = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config: FileConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: FileConfig = toml::from_str("").expect("decode");
        assert!(config.out_dir.is_none());
        assert!(config.networks.is_none());
        assert!(config.priority.unique.is_none());
    }

    #[test]
    fn decodes_sections_and_custom_table() {
        let content = r#"
out_dir = "fixtures"
seed = 42
log_format = "json"
malformations = ["wrong_length", "non_digit_suffix"]

[[networks]]
name = "Alpha"
prefixes = ["901", "902"]

[[networks]]
name = "Beta"
prefixes = ["911"]

[priority]
unique = 10
fill = "all-networks"

[distribution]
duplicates = 2
networks = [
  { network = "Alpha", count = 3 },
  { network = "Beta", count = 1 },
]

[mixed]
total = 40
invalid = 10
"#;
        let config: FileConfig = toml::from_str(content).expect("decode");

        assert_eq!(config.out_dir, Some(PathBuf::from("fixtures")));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.log_format, Some(LogFormat::Json));
        assert_eq!(
            config.malformations,
            Some(vec![MalformationKind::WrongLength, MalformationKind::NonDigitSuffix])
        );
        let table = config.networks.expect("table");
        assert_eq!(table.names(), vec!["Alpha", "Beta"]);
        assert_eq!(config.priority.unique, Some(10));
        assert_eq!(config.priority.fill, Some(FillStrategy::AllNetworks));
        assert_eq!(
            config.distribution.networks,
            Some(vec![NetworkCount::new("Alpha", 3), NetworkCount::new("Beta", 1)])
        );
        assert_eq!(config.mixed.invalid, Some(10));
    }

    #[test]
    fn rejects_unknown_keys() {
        let result: Result<FileConfig, _> = toml::from_str("out_directory = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn rejects_bad_prefix_in_table() {
        let content = r#"
[[networks]]
name = "Alpha"
prefixes = ["9x1"]
"#;
        let result: Result<FileConfig, _> = toml::from_str(content);
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let path = std::env::temp_dir().join("simforge-missing-config.toml");
        let err = load_config(Some(&path)).expect_err("missing file");
        assert!(matches!(err, CliError::ConfigRead { .. }));
        assert!(err.to_string().contains("simforge-missing-config.toml"));
    }
}
