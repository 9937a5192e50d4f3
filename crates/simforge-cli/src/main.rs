mod config;
mod logging;
mod summary;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use simforge_core::{
    Allocation, FillStrategy, GenerationRequest, NetworkCount, NetworkTable, RecordKind,
};
use simforge_generate::faker_rs::ContactFaker;
use simforge_generate::{GenerateOptions, GenerationEngine, GenerationError, MalformationKind};
use thiserror::Error;

use config::{FileConfig, load_config};
use logging::{LogFormat, init_logging};

const DEFAULT_OUT_DIR: &str = "output";

/// Per-network count and duplicates used when no counts are given.
const DISTRIBUTION_DEFAULTS: CountDefaults = CountDefaults {
    per_network: 200,
    duplicates: 500,
};
const CONTACT_DEFAULTS: CountDefaults = CountDefaults {
    per_network: 2,
    duplicates: 5,
};

#[derive(Debug, Clone, Copy)]
struct CountDefaults {
    per_network: usize,
    duplicates: usize,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "simforge",
    version,
    about = "Synthetic Philippine mobile numbers and contacts for test fixtures"
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Output directory.
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,
    /// Output file name; defaults depend on the command.
    #[arg(long, global = true)]
    file_name: Option<String>,
    /// Number of files to generate.
    #[arg(long, global = true)]
    files: Option<usize>,
    /// Seed for reproducible output.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// TOML file with default values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Write generation_report.json next to the outputs.
    #[arg(long, global = true, default_value_t = false)]
    report: bool,
    /// Log output format.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Unique numbers over networks in priority order, then duplicates.
    Priority(PriorityArgs),
    /// Exact count per network, then duplicates.
    Distribution(CountsArgs),
    /// Contact rows with an exact count per network, then duplicates.
    Contacts(ContactsArgs),
    /// Numbers drawn uniformly over every prefix.
    Uniform(UniformArgs),
    /// Distinct invalid numbers only.
    Invalid(InvalidArgs),
    /// Valid numbers first, invalid numbers last.
    Mixed(MixedArgs),
}

#[derive(Args, Debug)]
struct PriorityArgs {
    /// Unique numbers to generate.
    #[arg(long)]
    unique: Option<usize>,
    /// Copies of the first unique numbers appended at the end.
    #[arg(long)]
    duplicates: Option<usize>,
    /// Network priority; repeat the flag. Table order when omitted.
    #[arg(long = "order", value_name = "NETWORK")]
    order: Vec<String>,
    /// Pool used once every prefix is covered.
    #[arg(long, value_parser = parse_fill)]
    fill: Option<FillStrategy>,
}

#[derive(Args, Debug)]
struct CountsArgs {
    /// Count for one network; repeat the flag.
    #[arg(long = "network", value_name = "NAME=COUNT", value_parser = parse_network_count)]
    networks: Vec<NetworkCount>,
    /// Copies of the first unique records appended at the end.
    #[arg(long)]
    duplicates: Option<usize>,
}

#[derive(Args, Debug)]
struct ContactsArgs {
    #[command(flatten)]
    counts: CountsArgs,
    /// Locale for names and addresses (en_US, pt_BR).
    #[arg(long)]
    locale: Option<String>,
}

#[derive(Args, Debug)]
struct UniformArgs {
    /// Numbers to generate.
    #[arg(long)]
    count: Option<usize>,
}

#[derive(Args, Debug)]
struct InvalidArgs {
    /// Invalid numbers to generate.
    #[arg(long)]
    count: Option<usize>,
    /// Malformation kind to draw from; repeat the flag. All kinds when omitted.
    #[arg(long = "kind", value_name = "KIND", value_parser = parse_kind)]
    kinds: Vec<MalformationKind>,
}

#[derive(Args, Debug)]
struct MixedArgs {
    /// Records per file.
    #[arg(long)]
    total: Option<usize>,
    /// Invalid records at the end of each file.
    #[arg(long)]
    invalid: Option<usize>,
    /// Malformation kind to draw from; repeat the flag.
    #[arg(long = "kind", value_name = "KIND", value_parser = parse_kind)]
    kinds: Vec<MalformationKind>,
}

/// A request plus the command-specific pieces of the engine options.
#[derive(Debug)]
struct Plan {
    request: GenerationRequest,
    default_file_name: String,
    malformations: Option<Vec<MalformationKind>>,
    locale: Option<String>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = load_config(cli.common.config.as_deref())?;

    let log_format = cli
        .common
        .log_format
        .or(config.log_format)
        .unwrap_or_default();
    init_logging(log_format)?;

    let table = config.networks.clone().unwrap_or_default();
    let plan = build_plan(&cli.command, &config, &table)?;
    let options = generate_options(&cli.common, &config, &plan)?;

    let engine = GenerationEngine::new(table, options);
    let result = engine.run(&plan.request)?;

    print!("{}", summary::render_summary(&result));
    Ok(())
}

fn build_plan(
    command: &Command,
    config: &FileConfig,
    table: &NetworkTable,
) -> Result<Plan, CliError> {
    let plan = match command {
        Command::Priority(args) => {
            let section = &config.priority;
            let unique = args.unique.or(section.unique).unwrap_or(50);
            let duplicates = args.duplicates.or(section.duplicates).unwrap_or(50);
            let order = if args.order.is_empty() {
                section.order.clone()
            } else {
                Some(args.order.clone())
            };
            let fill = args.fill.or(section.fill).unwrap_or_default();
            let request = GenerationRequest::new(Allocation::Priority {
                unique,
                order,
                fill,
            })
            .with_duplicates(duplicates);
            Plan::new(request, "Schedule_1.csv".to_string())
        }
        Command::Distribution(args) => {
            let (networks, duplicates) =
                counts(args, &config.distribution, table, DISTRIBUTION_DEFAULTS);
            let file_name = distribution_file_name(&networks, duplicates);
            Plan::new(GenerationRequest::explicit(networks, duplicates), file_name)
        }
        Command::Contacts(args) => {
            let (networks, duplicates) =
                counts(&args.counts, &config.contacts, table, CONTACT_DEFAULTS);
            let request = GenerationRequest::explicit(networks, duplicates)
                .with_record_kind(RecordKind::Contact);
            let mut plan = Plan::new(request, "Contacts.csv".to_string());
            plan.locale = args.locale.clone();
            plan
        }
        Command::Uniform(args) => {
            let count = args.count.or(config.uniform.count).unwrap_or(20);
            Plan::new(GenerationRequest::uniform(count), "Valid.csv".to_string())
        }
        Command::Invalid(args) => {
            let count = args.count.or(config.invalid.count).unwrap_or(25);
            let mut plan = Plan::new(
                GenerationRequest::invalid_only(count),
                format!("Invalid_Numbers_{count}.csv"),
            );
            plan.malformations = non_empty(&args.kinds);
            plan
        }
        Command::Mixed(args) => {
            let total = args.total.or(config.mixed.total).unwrap_or(100);
            let invalid = args.invalid.or(config.mixed.invalid).unwrap_or(50);
            let valid = total.checked_sub(invalid).ok_or_else(|| {
                CliError::InvalidConfig(format!(
                    "invalid count {invalid} exceeds total {total}"
                ))
            })?;
            let mut plan = Plan::new(
                GenerationRequest::uniform(valid).with_invalids(invalid),
                "ValidFirst_InvalidLast.csv".to_string(),
            );
            plan.malformations = non_empty(&args.kinds);
            plan
        }
    };
    Ok(plan)
}

impl Plan {
    fn new(request: GenerationRequest, default_file_name: String) -> Self {
        Self {
            request,
            default_file_name,
            malformations: None,
            locale: None,
        }
    }
}

fn generate_options(
    common: &CommonArgs,
    config: &FileConfig,
    plan: &Plan,
) -> Result<GenerateOptions, CliError> {
    let locale = ContactFaker::resolve(plan.locale.as_deref().or(config.locale.as_deref()))?
        .locale();

    Ok(GenerateOptions {
        out_dir: common
            .out_dir
            .clone()
            .or_else(|| config.out_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
        file_name: common
            .file_name
            .clone()
            .or_else(|| config.file_name.clone())
            .unwrap_or_else(|| plan.default_file_name.clone()),
        files: common.files.or(config.files).unwrap_or(1),
        seed: common.seed.or(config.seed),
        locale,
        malformations: plan
            .malformations
            .clone()
            .or_else(|| config.malformations.clone())
            .unwrap_or_default(),
        write_report: common.report || config.report.unwrap_or(false),
    })
}

/// Counts from the flags, else the config section, else `defaults` for
/// every network in the table. Duplicates only fall back to the default
/// count together with the default networks.
fn counts(
    args: &CountsArgs,
    section: &config::CountsSection,
    table: &NetworkTable,
    defaults: CountDefaults,
) -> (Vec<NetworkCount>, usize) {
    let explicit = if args.networks.is_empty() {
        section.networks.clone()
    } else {
        Some(args.networks.clone())
    };
    let (networks, default_duplicates) = match explicit {
        Some(networks) => (networks, 0),
        None => (
            table
                .names()
                .into_iter()
                .map(|name| NetworkCount::new(name, defaults.per_network))
                .collect(),
            defaults.duplicates,
        ),
    };
    let duplicates = args
        .duplicates
        .or(section.duplicates)
        .unwrap_or(default_duplicates);
    (networks, duplicates)
}

/// `<network>_<count>_..._dup_<d>.csv`, with `/` in names replaced by `-`.
fn distribution_file_name(networks: &[NetworkCount], duplicates: usize) -> String {
    let mut parts: Vec<String> = networks
        .iter()
        .map(|entry| format!("{}_{}", entry.network.replace('/', "-"), entry.count))
        .collect();
    parts.push(format!("dup_{duplicates}.csv"));
    parts.join("_")
}

fn non_empty(kinds: &[MalformationKind]) -> Option<Vec<MalformationKind>> {
    if kinds.is_empty() {
        None
    } else {
        Some(kinds.to_vec())
    }
}

fn parse_network_count(value: &str) -> Result<NetworkCount, String> {
    value.parse::<NetworkCount>().map_err(|err| err.to_string())
}

fn parse_kind(value: &str) -> Result<MalformationKind, String> {
    value.parse::<MalformationKind>().map_err(|err| err.to_string())
}

fn parse_fill(value: &str) -> Result<FillStrategy, String> {
    match value {
        "highest-priority" => Ok(FillStrategy::HighestPriority),
        "all-networks" => Ok(FillStrategy::AllNetworks),
        other => Err(format!(
            "unknown fill strategy '{other}' (expected highest-priority or all-networks)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("parse arguments")
    }

    fn plan_for(cli: &Cli, config: &FileConfig) -> Result<Plan, CliError> {
        build_plan(&cli.command, config, &NetworkTable::philippines())
    }

    #[test]
    fn priority_defaults_match_schedule_file() {
        let cli = parse(&["simforge", "priority"]);
        let plan = plan_for(&cli, &FileConfig::default()).expect("plan");

        assert_eq!(plan.default_file_name, "Schedule_1.csv");
        assert_eq!(plan.request.unique_count().expect("unique count"), 50);
        assert_eq!(plan.request.duplicates, 50);
        assert!(matches!(
            plan.request.allocation,
            Allocation::Priority {
                order: None,
                fill: FillStrategy::HighestPriority,
                ..
            }
        ));
    }

    #[test]
    fn distribution_names_file_from_counts() {
        let cli = parse(&[
            "simforge",
            "distribution",
            "--network",
            "Globe/TM=200",
            "--network",
            "Sun=100",
            "--duplicates",
            "50",
        ]);
        let plan = plan_for(&cli, &FileConfig::default()).expect("plan");

        assert_eq!(plan.default_file_name, "Globe-TM_200_Sun_100_dup_50.csv");
        assert_eq!(plan.request.unique_count().expect("unique count"), 300);
    }

    #[test]
    fn command_line_overrides_config_file() {
        let config: FileConfig = toml::from_str(
            r#"
out_dir = "from-config"
seed = 1
files = 2

[uniform]
count = 500
"#,
        )
        .expect("decode");
        let cli = parse(&["simforge", "uniform", "--seed", "9", "--file-name", "x.csv"]);
        let plan = plan_for(&cli, &config).expect("plan");
        let options = generate_options(&cli.common, &config, &plan).expect("options");

        assert_eq!(plan.request.unique_count().expect("unique count"), 500);
        assert_eq!(options.seed, Some(9));
        assert_eq!(options.files, 2);
        assert_eq!(options.file_name, "x.csv");
        assert_eq!(options.out_dir, PathBuf::from("from-config"));
    }

    #[test]
    fn mixed_rejects_more_invalids_than_total() {
        let cli = parse(&["simforge", "mixed", "--total", "10", "--invalid", "11"]);
        let result = plan_for(&cli, &FileConfig::default());
        assert!(matches!(result, Err(CliError::InvalidConfig(_))));
    }

    #[test]
    fn invalid_command_uses_counted_name_and_kinds() {
        let cli = parse(&[
            "simforge",
            "invalid",
            "--count",
            "30",
            "--kind",
            "wrong-length",
        ]);
        let plan = plan_for(&cli, &FileConfig::default()).expect("plan");
        assert_eq!(plan.default_file_name, "Invalid_Numbers_30.csv");
        assert_eq!(plan.malformations, Some(vec![MalformationKind::WrongLength]));
        assert!(plan.request.unique_invalids);
    }

    #[test]
    fn contacts_reject_unknown_locale() {
        let cli = parse(&["simforge", "contacts", "--locale", "fr_FR"]);
        let config = FileConfig::default();
        let plan = plan_for(&cli, &config).expect("plan");
        let result = generate_options(&cli.common, &config, &plan);
        assert!(matches!(
            result,
            Err(CliError::Generation(GenerationError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn distribution_without_counts_uses_every_network() {
        let cli = parse(&["simforge", "distribution"]);
        let plan = plan_for(&cli, &FileConfig::default()).expect("plan");

        assert_eq!(plan.request.unique_count().expect("unique count"), 1000);
        assert_eq!(plan.request.duplicates, 500);
        assert_eq!(
            plan.default_file_name,
            "Globe-TM_200_Smart_200_TNT_200_Smart-TNT_200_Sun_200_dup_500.csv"
        );
    }

    #[test]
    fn contacts_without_counts_use_small_defaults() {
        let cli = parse(&["simforge", "contacts"]);
        let plan = plan_for(&cli, &FileConfig::default()).expect("plan");

        assert_eq!(plan.request.unique_count().expect("unique count"), 10);
        assert_eq!(plan.request.duplicates, 5);
        assert_eq!(plan.request.record_kind, RecordKind::Contact);
    }

    #[test]
    fn given_counts_do_not_pick_up_default_duplicates() {
        let cli = parse(&["simforge", "contacts", "--network", "Sun=1"]);
        let plan = plan_for(&cli, &FileConfig::default()).expect("plan");

        assert_eq!(plan.request.unique_count().expect("unique count"), 1);
        assert_eq!(plan.request.duplicates, 0);
    }

    #[test]
    fn bad_network_argument_is_a_usage_error() {
        assert!(Cli::try_parse_from(["simforge", "distribution", "--network", "Smart"]).is_err());
    }
}
