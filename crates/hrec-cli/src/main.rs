//! Hierarchical record validator CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use hrec_cli::commands::{run_get, run_keys, run_leaves, run_validate};
use hrec_cli::logging::{LogConfig, LogFormat, init_logging};
use hrec_cli::output::{print_issue_table, render_result};
use hrec_validate::ValidateOptions;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, ValidateArgs};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error:#}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli.command) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(command: &Command) -> Result<i32> {
    match command {
        Command::Validate(args) => validate(args),
        Command::Keys(args) => {
            for key in run_keys(&args.record)? {
                println!("{key}");
            }
            Ok(0)
        }
        Command::Leaves(args) => {
            for (address, value) in run_leaves(&args.record)? {
                println!("{address}\t{value}");
            }
            Ok(0)
        }
        Command::Get(args) => {
            println!("{}", run_get(&args.record, &args.address)?);
            Ok(0)
        }
    }
}

fn validate(args: &ValidateArgs) -> Result<i32> {
    let options = ValidateOptions::default()
        .with_strict(!args.lax)
        .with_missing_is_error(!args.allow_missing);
    let result = run_validate(
        &args.record,
        &args.rules,
        args.rules_format.map(Into::into),
        &options,
    )?;
    if args.table {
        print_issue_table(&result);
    } else {
        println!("{}", render_result(&result, args.just_result)?);
    }
    Ok(if result.valid { 0 } else { 1 })
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig::default()
        .with_level_filter(level_filter)
        .with_env_filter(!(cli.verbosity.is_present() || cli.log_level.is_some()))
        .with_format(format)
        .with_ansi(with_ansi)
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data)
}
