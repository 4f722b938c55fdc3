//! Command line parsing.
//!
//! Flags are written GDAL style with a single dash (`-region 0 0 10 10`).
//! They are rewritten to clap's double-dash form before parsing, so
//! `--region` works as well. The arguments following a flag are its values
//! and are passed through untouched, even when they start with a dash.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use crate::error::{GeneratorError, GeneratorResult};
use crate::report::ReportFormat;

/// Usage synopsis, without the leading `Usage: `.
pub const USAGE: &str = "\
wms-request [-count n] [-region minx miny maxx maxy]
                   [-minres minres] [-maxres maxres]
                   [-maxsize width height] [-minsize width height]
                   [-srs <epsg_code>] [-srs2 <epsg_code>]
                   [-filter_within <filename>]
                   [-output <filename>] [-output2 <filename>]
                   [-seed n] [-max_attempts n] [-scenario <file.yaml>]
                   [-report table|json|none] [-log_level <filter>]";

#[derive(Parser, Debug, Default, Clone, PartialEq)]
#[command(name = "wms-request", version)]
#[command(about = "Generate random WMS BBOX/size requests over a region", long_about = None)]
#[command(override_usage = USAGE, args_override_self = true)]
pub struct Cli {
    /// Region covered by the generated boxes
    #[arg(
        long,
        num_args = 4,
        value_names = ["MINX", "MINY", "MAXX", "MAXY"],
        allow_hyphen_values = true
    )]
    pub region: Option<Vec<f64>>,

    /// Minimum ground resolution (map units per pixel)
    #[arg(long, allow_hyphen_values = true)]
    pub minres: Option<f64>,

    /// Maximum ground resolution (map units per pixel)
    #[arg(long, allow_hyphen_values = true)]
    pub maxres: Option<f64>,

    /// Number of requests to generate [default: 1000]
    #[arg(long, allow_hyphen_values = true)]
    pub count: Option<u64>,

    /// Minimum image size in pixels [default: 128 128]
    #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"], allow_hyphen_values = true)]
    pub minsize: Option<Vec<u32>>,

    /// Maximum image size in pixels [default: 1024 768]
    #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"], allow_hyphen_values = true)]
    pub maxsize: Option<Vec<u32>>,

    /// EPSG code of the region coordinates [default: 4326]
    #[arg(long, allow_hyphen_values = true)]
    pub srs: Option<u32>,

    /// EPSG code of the reprojected output file
    #[arg(long, allow_hyphen_values = true)]
    pub srs2: Option<u32>,

    /// Only keep boxes fully inside the geometries of this GeoJSON file
    #[arg(long = "filter_within", value_name = "FILENAME", allow_hyphen_values = true)]
    pub filter_within: Option<PathBuf>,

    /// Primary output file [default: <srs>.csv]
    #[arg(long, value_name = "FILENAME", allow_hyphen_values = true)]
    pub output: Option<PathBuf>,

    /// Reprojected output file [default: <srs2>.csv]
    #[arg(long, value_name = "FILENAME", allow_hyphen_values = true)]
    pub output2: Option<PathBuf>,

    /// Seed for reproducible output
    #[arg(long, allow_hyphen_values = true)]
    pub seed: Option<u64>,

    /// Consecutive rejected candidates before giving up [default: 1000000]
    #[arg(long = "max_attempts", allow_hyphen_values = true)]
    pub max_attempts: Option<u64>,

    /// YAML scenario providing defaults for any of the options above
    #[arg(long, value_name = "FILE", allow_hyphen_values = true)]
    pub scenario: Option<PathBuf>,

    /// Summary printed after the run: table, json or none
    #[arg(long, default_value = "table", allow_hyphen_values = true)]
    pub report: String,

    /// Log filter when RUST_LOG is not set
    #[arg(long = "log_level", default_value = "info", allow_hyphen_values = true)]
    pub log_level: String,
}

/// Result of parsing the command line.
#[derive(Debug)]
pub enum ParseOutcome {
    /// Arguments parsed.
    Run(Cli),
    /// `-help` or `-version`; print the text and exit successfully.
    Info(String),
}

impl Cli {
    /// Parse an argv-style list (first element is the program name).
    pub fn parse_args<I, T>(args: I) -> GeneratorResult<ParseOutcome>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args = normalize_flags(args.into_iter().map(Into::into));
        match Cli::try_parse_from(args) {
            Ok(cli) => Ok(ParseOutcome::Run(cli)),
            Err(err) => match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    Ok(ParseOutcome::Info(err.to_string()))
                }
                _ => Err(GeneratorError::InvalidArgument(first_line(&err.to_string()))),
            },
        }
    }
}

impl Cli {
    /// The `-report` value as a [`ReportFormat`].
    pub fn report_format(&self) -> GeneratorResult<ReportFormat> {
        self.report
            .parse()
            .map_err(|message| GeneratorError::InvalidValue {
                flag: "-report",
                message,
            })
    }
}

/// Rewrite flags to `--flag`, passing each flag's values through as given.
fn normalize_flags(mut args: impl Iterator<Item = OsString>) -> Vec<OsString> {
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    while let Some(arg) = args.next() {
        let Some(name) = arg.to_str().and_then(flag_name) else {
            normalized.push(arg);
            continue;
        };
        let values = value_count(name);
        normalized.push(OsString::from(format!("--{name}")));
        normalized.extend(args.by_ref().take(values));
    }
    normalized
}

/// Flag name without its dashes, if `arg` is in flag form.
fn flag_name(arg: &str) -> Option<&str> {
    match arg.strip_prefix("--") {
        Some(name) if !name.is_empty() => Some(name),
        Some(_) => None,
        None if is_single_dash_flag(arg) => Some(&arg[1..]),
        None => None,
    }
}

/// Number of values following a flag on the command line.
fn value_count(name: &str) -> usize {
    match name {
        "region" => 4,
        "minsize" | "maxsize" => 2,
        "help" | "version" => 0,
        // `--flag=value` carries its own value.
        _ if name.contains('=') => 0,
        _ => 1,
    }
}

fn is_single_dash_flag(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next() == Some('-')
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && s.len() > 2
        && s.parse::<f64>().is_err()
}

/// First line of a clap error, with flags spelled the way they are typed.
fn first_line(message: &str) -> String {
    message
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .replace("'--", "'-")
}
