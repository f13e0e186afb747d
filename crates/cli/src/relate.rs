//! `occlink relate` — config-driven cross-dataset relationship runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use occlink_relate::engine::load_csv_records;
use occlink_relate::model::RelateInput;
use occlink_relate::RelateConfig;

use crate::exit_codes::{EXIT_RELATE_INVALID_CONFIG, EXIT_RELATE_RUNTIME};
use crate::CliError;

#[derive(Subcommand)]
pub enum RelateCommands {
    /// Run a cross-dataset comparison from a TOML config file
    #[command(after_help = "\
Examples:
  occlink relate run fungi.relate.toml
  occlink relate run fungi.relate.toml --json
  occlink relate run fungi.relate.toml --output report.json")]
    Run {
        /// Path to the .relate.toml config file
        config: PathBuf,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a relate config without running
    #[command(after_help = "\
Examples:
  occlink relate validate fungi.relate.toml")]
    Validate {
        /// Path to the .relate.toml config file
        config: PathBuf,
    },
}

pub fn cmd_relate(cmd: RelateCommands) -> Result<(), CliError> {
    match cmd {
        RelateCommands::Run { config, json, output } => cmd_relate_run(config, json, output),
        RelateCommands::Validate { config } => cmd_relate_validate(config),
    }
}

fn relate_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn load_input(config: &RelateConfig, base_dir: &Path) -> Result<RelateInput, CliError> {
    let mut records = HashMap::new();
    for (dataset_name, dataset_config) in &config.datasets {
        let csv_path = base_dir.join(&dataset_config.file);
        let csv_data = std::fs::read_to_string(&csv_path).map_err(|e| {
            relate_err(EXIT_RELATE_RUNTIME, format!("cannot read {}: {e}", csv_path.display()))
        })?;
        let loaded = load_csv_records(dataset_name, &csv_data, dataset_config)
            .map_err(|e| relate_err(EXIT_RELATE_RUNTIME, e.to_string()))?;
        records.insert(dataset_name.clone(), loaded);
    }
    Ok(RelateInput { records })
}

fn cmd_relate_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| relate_err(EXIT_RELATE_RUNTIME, format!("cannot read config: {e}")))?;

    let config = RelateConfig::from_toml(&config_str)
        .map_err(|e| relate_err(EXIT_RELATE_INVALID_CONFIG, e.to_string()))?;

    // Resolve dataset files relative to the config file's directory.
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let input = load_input(&config, base_dir)?;

    let report = occlink_relate::run(&config, &input)
        .map_err(|e| relate_err(EXIT_RELATE_RUNTIME, e.to_string()))?;

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| relate_err(EXIT_RELATE_RUNTIME, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| relate_err(EXIT_RELATE_RUNTIME, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr.
    let s = &report.summary;
    eprintln!(
        "'{}' vs '{}': {} pairs compared — {} related, {} linked by policy",
        report.meta.left_dataset,
        report.meta.right_dataset,
        s.pairs_compared,
        s.pairs_related,
        s.pairs_linked,
    );
    for (kind, count) in &s.assertion_counts {
        eprintln!("  {kind}: {count}");
    }

    Ok(())
}

fn cmd_relate_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| relate_err(EXIT_RELATE_RUNTIME, format!("cannot read config: {e}")))?;

    match RelateConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: '{}' comparing '{}' with '{}'{}",
                config.name,
                config.pair.left,
                config.pair.right,
                match config.policy {
                    Some(ref p) => format!(", policy '{}' ({} rule(s))", p.name, p.rules.len()),
                    None => ", no policy".to_string(),
                },
            );
            Ok(())
        }
        Err(e) => Err(relate_err(EXIT_RELATE_INVALID_CONFIG, e.to_string())),
    }
}
