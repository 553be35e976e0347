// CLI Layer
// ユーザー入力の受付とコマンドルーティング

pub mod command_context;
pub mod commands;

use crate::core::naming::BINARY_NAME;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// 出力フォーマット
#[derive(Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Structured JSON output
    Json,
}

/// pg-check - Schema Drift Detector
///
/// Compares a declared schema against the schema reflected from a live database.
#[derive(Parser, Debug)]
#[command(name = BINARY_NAME)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Detect drift between a declared schema and a reflected database schema")]
#[command(long_about = "pg-check - Schema Drift Detector

Compares a declared (in-code) schema against the schema reflected from a live
database and reports, per table:
  • columns missing on either side
  • column type mismatches (across ORM and native type names)
  • nullability, primary key and foreign key mismatches

pg-check never connects to a database. Both schemas are read from YAML files;
the reflected file is produced by your introspection tooling.")]
#[command(propagate_version = true)]
#[command(after_help = "EXIT STATUS:
  0  no drift
  1  drift or invalid tables found
  2  the check could not run (bad config, unreadable file, ...)")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format (text or json)
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare the declared schema with the reflected schema
    ///
    /// EXAMPLES:
    ///   # Use the paths from .pg-check.yaml
    ///   pg-check check
    ///
    ///   # Explicit files, strict length/precision comparison
    ///   pg-check check --declared models.yaml --reflected db.yaml --strict-parameters
    ///
    ///   # Machine-readable report
    ///   pg-check check --format json
    Check {
        /// Declared schema file (overrides the config file)
        #[arg(long, value_name = "FILE")]
        declared: Option<PathBuf>,

        /// Reflected schema file (overrides the config file)
        #[arg(long, value_name = "FILE")]
        reflected: Option<PathBuf>,

        /// Database dialect of the reflected schema (postgresql, mysql, sqlite)
        #[arg(short, long, value_name = "DIALECT")]
        dialect: Option<String>,

        /// Compare length/precision/scale of parameterized types
        #[arg(long)]
        strict_parameters: bool,

        /// Skip a table on both sides (repeatable)
        #[arg(long = "ignore-table", value_name = "TABLE")]
        ignore_tables: Vec<String>,
    },

    /// Show the type synonym table used for comparison
    Types {
        /// Database dialect (postgresql, mysql, sqlite)
        #[arg(short, long, value_name = "DIALECT")]
        dialect: Option<String>,
    },
}

/// トレーシングを初期化する
///
/// RUST_LOG が設定されていればそれを優先し、なければ --verbose で debug、既定は warn。
/// ログは標準エラー出力に書き出す。
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 2回目以降の初期化（テストなど）は無視する
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_command() {
        let cli = Cli::try_parse_from([
            "pg-check",
            "check",
            "--declared",
            "declared.yaml",
            "--reflected",
            "reflected.yaml",
            "--strict-parameters",
            "--ignore-table",
            "alembic_version",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Check {
                declared,
                reflected,
                dialect,
                strict_parameters,
                ignore_tables,
            } => {
                assert_eq!(declared, Some(PathBuf::from("declared.yaml")));
                assert_eq!(reflected, Some(PathBuf::from("reflected.yaml")));
                assert!(dialect.is_none());
                assert!(strict_parameters);
                assert_eq!(ignore_tables, vec!["alembic_version".to_string()]);
            }
            other => panic!("Expected check command, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_types_command() {
        let cli = Cli::try_parse_from(["pg-check", "types", "--dialect", "mysql", "--no-color"])
            .unwrap();

        assert!(cli.no_color);
        assert!(matches!(
            cli.command,
            Commands::Types { dialect: Some(ref d) } if d == "mysql"
        ));
    }
}
