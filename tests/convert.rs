//! Conversion job tests over real files

use std::fs;
use std::path::Path;

use contourkit::{convert, Config, ConvertJob, SafetyHeights};

const PROFILE: &str = "%!PS-Adobe-3.0 EPSF-3.0
%%BoundingBox: 0 0 102 26
newpath
";

const PROFILE_POINTS: &str = "101.6 25.4 moveto
50.8 12.7 lineto
0 0 lineto
stroke
%%EOF
";

const SKETCH: &str = "'flat sketch
SA
JZ,0.4
J2,0,0
J3,1,0,0.4
M3,1,0,0
M3,2,0,0
J3,2,0,0.4
J3,3,0,0.4
M3,3,0,0
J3,3,0,0.4
J2,0,0
JZ,0.4
END
";

fn job(dir: &Path) -> ConvertJob {
    fs::write(dir.join("profile.eps"), PROFILE_POINTS).unwrap();
    fs::write(dir.join("sketch.sbp"), SKETCH).unwrap();
    ConvertJob {
        profile: dir.join("profile.eps"),
        sketch: dir.join("sketch.sbp"),
        output: dir.join("sketch_3d.sbp"),
        profile_csv: None,
        heights: SafetyHeights::default(),
    }
}

#[test]
fn test_convert_writes_projected_sketch() {
    let dir = tempfile::tempdir().unwrap();
    let job = job(dir.path());

    let report = convert(&job).unwrap();

    assert_eq!(report.profile_points, 3);
    assert!((report.z_max - 0.75).abs() < 1e-12);
    assert!((report.travel_height - 1.25).abs() < 1e-12);
    assert_eq!(report.stats.cuts, 3);
    assert_eq!(report.stats.inserted, 1);
    assert_eq!(report.stats.removed, 1);

    let output = fs::read_to_string(&job.output).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(report.lines_written, lines.len());
    assert_eq!(
        lines,
        vec![
            "'flat sketch",
            "SA",
            "JZ,1.250000",
            "J2,0,0",
            "J3,1.000000,0.000000,0.500000",
            "M3,1.000000,0.000000,0.250000",
            "M3,2.000000,0.000000,0.500000",
            "J3,2.000000,0.000000,1.250000",
            "J3,3.000000,0.000000,1.250000",
            "J3,3.000000,0.000000,1.000000",
            "M3,3.000000,0.000000,0.750000",
            "J2,0,0",
            "JZ,0.4",
            "END",
        ]
    );
}

#[test]
fn test_convert_writes_profile_csv() {
    let dir = tempfile::tempdir().unwrap();
    let mut job = job(dir.path());
    job.profile_csv = Some(dir.path().join("profile.csv"));

    convert(&job).unwrap();

    let csv = fs::read_to_string(dir.path().join("profile.csv")).unwrap();
    assert_eq!(
        csv,
        "position_in,depth_in\n0.000000,0.000000\n2.000000,0.500000\n4.000000,1.000000\n"
    );
}

#[test]
fn test_failed_conversion_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let job = job(dir.path());
    fs::write(&job.profile, PROFILE).unwrap();

    let err = convert(&job).unwrap_err();
    assert!(format!("{err:#}").contains("newpath"));
    assert!(!job.output.exists());
}

#[test]
fn test_truncated_sketch_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let job = job(dir.path());
    fs::write(&job.sketch, "SA\nJZ,0.4\nJ2,0,0\nM3,1,0,0\n").unwrap();

    let err = convert(&job).unwrap_err();
    assert!(format!("{err:#}").contains("truncated"));
    assert!(!job.output.exists());
}

#[test]
fn test_job_from_config() {
    let mut config = Config::default();
    config.heights = SafetyHeights::new(1.0, 0.125);
    config.files.output = "out.sbp".into();

    let job = ConvertJob::from(&config);
    assert_eq!(job.heights.material_safe_height, 0.125);
    assert_eq!(job.output, Path::new("out.sbp"));
    assert_eq!(job.sketch, config.files.sketch);
}
