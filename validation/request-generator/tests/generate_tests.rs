//! End-to-end generation tests: command line in, request files out.

use std::fs;
use std::path::{Path, PathBuf};

use test_utils::{rect_feature_collection, scratch_dir, write_fixture};
use wms_common::BoundingBox;
use wms_request::{
    Cli, GeneratorConfig, GeneratorError, GeneratorResult, ParseOutcome, RunSummary, Runner,
};

/// One parsed output line.
#[derive(Debug)]
struct Line {
    width: u32,
    height: u32,
    bbox: BoundingBox,
    annotation: Option<String>,
}

fn parse_line(line: &str) -> Line {
    let fields: Vec<&str> = line.split(';').collect();
    assert!(fields.len() == 3 || fields.len() == 4, "bad line: {line}");
    Line {
        width: fields[0].parse().unwrap(),
        height: fields[1].parse().unwrap(),
        bbox: BoundingBox::from_wms_string(fields[2]).unwrap(),
        annotation: fields.get(3).map(|s| s.to_string()),
    }
}

fn read_lines(path: &Path) -> Vec<Line> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(parse_line)
        .collect()
}

fn config_from(args: &[&str]) -> GeneratorResult<GeneratorConfig> {
    let argv = std::iter::once("wms-request").chain(args.iter().copied());
    match Cli::parse_args(argv)? {
        ParseOutcome::Run(cli) => GeneratorConfig::from_cli(&cli),
        ParseOutcome::Info(text) => panic!("unexpected info output: {text}"),
    }
}

fn generate(args: &[&str]) -> GeneratorResult<RunSummary> {
    Runner::new(config_from(args)?).run()
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

#[test]
fn test_five_fixed_size_requests() {
    let dir = scratch_dir();
    let output = dir.path().join("out.csv");
    let output_arg = path_arg(&output);

    let summary = generate(&[
        "-region", "0", "0", "10", "10", "-minres", "0.01", "-maxres", "0.1", "-count", "5",
        "-minsize", "10", "10", "-maxsize", "10", "10", "-output", &output_arg,
    ])
    .unwrap();
    assert_eq!(summary.accepted, 5);

    let lines = read_lines(&output);
    assert_eq!(lines.len(), 5);

    let region = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!((line.width, line.height), (10, 10));
        assert!(region.contains_bbox(&line.bbox), "{:?}", line.bbox);
        // 10 pixels at 0.01..0.1 units per pixel.
        assert!(line.bbox.width() >= 0.1 - 1e-6 && line.bbox.width() <= 1.0 + 1e-6);
        assert_eq!(line.annotation.is_some(), i == 0);
    }

    let annotation = lines[0].annotation.as_deref().unwrap();
    assert_eq!(
        annotation,
        "wms-request -count 5 -region 0 0 10 10 -minsize 10 10 -maxsize 10 10 -minres 0.01 -maxres 0.1"
    );
}

#[test]
fn test_same_seed_same_files() {
    let run = |dir: &Path| -> String {
        let output = dir.join("seeded.csv");
        let output_arg = path_arg(&output);
        generate(&[
            "-region", "-180", "-90", "180", "90", "-minres", "0.001", "-maxres", "1", "-count",
            "200", "-seed", "1234", "-output", &output_arg,
        ])
        .unwrap();
        fs::read_to_string(output).unwrap()
    };

    let (a, b) = (scratch_dir(), scratch_dir());
    let first = run(a.path());
    assert_eq!(first, run(b.path()));
    assert_eq!(first.lines().count(), 200);
    assert!(first.lines().next().unwrap().ends_with("-seed 1234"));
}

#[test]
fn test_default_output_name() {
    let config =
        config_from(&["-region", "0", "0", "1", "1", "-minres", "0.001", "-maxres", "0.002"])
            .unwrap();
    assert_eq!(config.output, PathBuf::from("4326.csv"));
}

#[test]
fn test_missing_required_flag() {
    let err = config_from(&["-region", "0", "0", "10", "10", "-minres", "0.01"]).unwrap_err();
    assert!(matches!(err, GeneratorError::MissingRequired("-maxres")));
    assert!(err.is_usage_error());
}

#[test]
fn test_acceptance_rate_too_low() {
    let dir = scratch_dir();
    let output = dir.path().join("never.csv");
    let output_arg = path_arg(&output);

    let err = generate(&[
        "-region", "0", "0", "1", "1", "-minres", "1", "-maxres", "2", "-count", "3",
        "-max_attempts", "100", "-output", &output_arg,
    ])
    .unwrap_err();
    assert!(matches!(
        err,
        GeneratorError::AcceptanceRateTooLow { attempts: 100, .. }
    ));
}

#[test]
fn test_scenario_with_flag_override() {
    let dir = scratch_dir();
    let output = dir.path().join("global.csv");
    let output_arg = path_arg(&output);
    let scenario = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/global-smoke.yaml");
    let scenario_arg = path_arg(&scenario);

    let config = config_from(&["-scenario", &scenario_arg, "-count", "25", "-output", &output_arg])
        .unwrap();
    assert_eq!(config.region, BoundingBox::new(-180.0, -90.0, 180.0, 90.0));
    assert_eq!(config.count, 25);
    assert_eq!(config.seed, Some(42));

    let summary = Runner::new(config).run().unwrap();
    assert_eq!(summary.accepted, 25);
    assert_eq!(read_lines(&output).len(), 25);
}

#[test]
fn test_missing_scenario_file() {
    let err = config_from(&["-scenario", "/nonexistent/scenario.yaml"]).unwrap_err();
    assert!(matches!(err, GeneratorError::Scenario { .. }));
}

#[cfg(feature = "geometry")]
mod geometry {
    use super::*;

    #[test]
    fn test_reprojected_file_matches_primary() {
        let dir = scratch_dir();
        let (output, output2) = (dir.path().join("4326.csv"), dir.path().join("3857.csv"));
        let (output_arg, output2_arg) = (path_arg(&output), path_arg(&output2));

        let summary = generate(&[
            "-region", "-10", "-10", "10", "10", "-minres", "0.01", "-maxres", "0.1", "-count",
            "50", "-minsize", "10", "10", "-maxsize", "100", "100", "-srs2", "3857", "-seed",
            "8", "-output", &output_arg, "-output2", &output2_arg,
        ])
        .unwrap();
        assert_eq!(summary.outputs.len(), 2);

        let primary = read_lines(&output);
        let secondary = read_lines(&output2);
        assert_eq!(primary.len(), 50);
        assert_eq!(secondary.len(), primary.len());
        assert_eq!(secondary[0].annotation, primary[0].annotation);
        assert!(primary[0]
            .annotation
            .as_deref()
            .unwrap()
            .contains("-srs 4326 -srs2 3857"));

        for (source, projected) in primary.iter().zip(&secondary) {
            // Mercator meters, roughly 111 km per degree near the equator.
            assert!(projected.bbox.min_x >= -1_113_195.0 && projected.bbox.max_x <= 1_113_195.0);
            assert!(projected.bbox.width() > source.bbox.width() * 100_000.0);

            let aspect = projected.bbox.aspect_ratio();
            let ratio = f64::from(projected.width) / f64::from(projected.height);
            assert!((ratio - aspect).abs() <= 1.0 / f64::from(projected.height) + 1e-6);

            let pixels = f64::from(source.width) * f64::from(source.height);
            let projected_pixels = f64::from(projected.width) * f64::from(projected.height);
            assert!(projected_pixels <= pixels);
            assert!((pixels - projected_pixels) / pixels < 0.25);
        }
    }

    #[test]
    fn test_filter_within_geojson() {
        let dir = scratch_dir();
        let filter = write_fixture(
            dir.path(),
            "area.geojson",
            &rect_feature_collection(&[(2.0, 2.0, 8.0, 8.0)]),
        );
        let output = dir.path().join("filtered.csv");
        let (filter_arg, output_arg) = (path_arg(&filter), path_arg(&output));

        let summary = generate(&[
            "-region", "0", "0", "10", "10", "-minres", "0.01", "-maxres", "0.1", "-count", "100",
            "-minsize", "10", "10", "-maxsize", "20", "20", "-filter_within", &filter_arg, "-seed",
            "3", "-output", &output_arg,
        ])
        .unwrap();
        assert_eq!(summary.accepted, 100);
        assert!(summary.rejected_by_filter > 0);

        let area = BoundingBox::new(2.0, 2.0, 8.0, 8.0);
        for line in read_lines(&output) {
            assert!(area.contains_bbox(&line.bbox), "{:?}", line.bbox);
        }
    }

    #[test]
    fn test_filter_within_overlapping_features() {
        let dir = scratch_dir();
        let filter = write_fixture(
            dir.path(),
            "overlap.geojson",
            &rect_feature_collection(&[(0.0, 0.0, 6.0, 10.0), (4.0, 0.0, 10.0, 10.0)]),
        );
        let output = dir.path().join("overlap.csv");
        let (filter_arg, output_arg) = (path_arg(&filter), path_arg(&output));

        let summary = generate(&[
            "-region", "-2", "-2", "12", "12", "-minres", "0.2", "-maxres", "0.4", "-count",
            "100", "-minsize", "10", "10", "-maxsize", "20", "20", "-filter_within", &filter_arg,
            "-seed", "5", "-output", &output_arg,
        ])
        .unwrap();
        assert_eq!(summary.accepted, 100);

        let lines = read_lines(&output);
        let area = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        for line in &lines {
            assert!(area.contains_bbox(&line.bbox), "{:?}", line.bbox);
        }
        // Boxes spanning both features are accepted.
        assert!(lines.iter().any(|l| l.bbox.min_x < 4.0 && l.bbox.max_x > 6.0));
    }

    #[test]
    fn test_missing_dataset_fails_before_writing() {
        let dir = scratch_dir();
        let output = dir.path().join("out.csv");
        let output_arg = path_arg(&output);

        let err = generate(&[
            "-region", "0", "0", "10", "10", "-minres", "0.01", "-maxres", "0.1",
            "-filter_within", "/nonexistent/area.geojson", "-output", &output_arg,
        ])
        .unwrap_err();
        assert!(matches!(err, GeneratorError::Dataset { .. }));
        assert!(err.is_usage_error());
        assert!(!output.exists());
    }

    #[test]
    fn test_unknown_epsg_code() {
        let dir = scratch_dir();
        let output = dir.path().join("out.csv");
        let output_arg = path_arg(&output);

        let err = generate(&[
            "-region", "0", "0", "10", "10", "-minres", "0.01", "-maxres", "0.1", "-srs2",
            "99999", "-output", &output_arg, "-output2", &output_arg,
        ])
        .unwrap_err();
        assert!(matches!(err, GeneratorError::Projection(_)));
        assert!(err.to_string().contains("EPSG:99999"));
    }
}
