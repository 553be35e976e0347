use anyhow::Result;
use clap::Parser;
use colored::control as color_control;
use pg_check::cli::commands::check::{CheckCommand, CheckCommandHandler};
use pg_check::cli::commands::types::{TypesCommand, TypesCommandHandler};
use pg_check::cli::{init_tracing, Cli, Commands};
use pg_check::core::config::Dialect;
use std::env;
use std::process;

/// ドリフトまたは不正なテーブルが見つかった場合の終了コード
const EXIT_DRIFT: i32 = 1;
/// 比較を実行できなかった場合の終了コード
const EXIT_ERROR: i32 = 2;

fn main() {
    // CLIをパースして実行
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // --no-color フラグの処理
    if cli.no_color {
        color_control::set_override(false);
    }

    match run_command(cli) {
        Ok((output, has_drift)) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            if has_drift {
                process::exit(EXIT_DRIFT);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(EXIT_ERROR);
        }
    }
}

/// コマンドを実行する
///
/// 出力とドリフトの有無を返す。
fn run_command(cli: Cli) -> Result<(String, bool)> {
    // プロジェクトのルートパスを取得
    let project_path = env::current_dir()?;

    match cli.command {
        Commands::Check {
            declared,
            reflected,
            dialect,
            strict_parameters,
            ignore_tables,
        } => {
            let handler = CheckCommandHandler::new();
            let command = CheckCommand {
                project_path,
                config_path: cli.config,
                declared,
                reflected,
                dialect: parse_dialect(dialect.as_deref())?,
                strict_parameters,
                ignore_tables,
                format: cli.format,
            };
            let result = handler.execute(&command)?;
            Ok((result.output, result.has_drift))
        }

        Commands::Types { dialect } => {
            let handler = TypesCommandHandler::new();
            let command = TypesCommand {
                project_path,
                config_path: cli.config,
                dialect: parse_dialect(dialect.as_deref())?,
                format: cli.format,
            };
            Ok((handler.execute(&command)?, false))
        }
    }
}

/// 方言文字列をパース（未指定なら設定ファイルに従う）
fn parse_dialect(dialect: Option<&str>) -> Result<Option<Dialect>> {
    dialect
        .map(|d| d.parse::<Dialect>().map_err(anyhow::Error::msg))
        .transpose()
}
