//! Command line entry point for the WMS request generator.

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use wms_request::{
    Cli, GeneratorConfig, GeneratorError, ParseOutcome, ReportFormat, RunReport, Runner, USAGE,
};

fn main() -> ExitCode {
    let cli = match Cli::parse_args(std::env::args_os()) {
        Ok(ParseOutcome::Run(cli)) => cli,
        Ok(ParseOutcome::Info(text)) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
        Err(e) => return fail(&e.into()),
    };

    // Logs go to stderr; stdout carries the report.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let report = cli.report_format()?;
    let config = GeneratorConfig::from_cli(cli)?;

    let summary = Runner::new(config)
        .with_progress(report != ReportFormat::None)
        .run()?;

    if let Some(text) = RunReport::render(&summary, report)? {
        println!("{text}");
    }
    Ok(())
}

fn fail(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<GeneratorError>() {
        Some(e) if e.is_usage_error() => {
            println!("{e}");
            println!("Usage: {USAGE}");
        }
        _ => println!("Error: {err:#}"),
    }
    ExitCode::FAILURE
}
