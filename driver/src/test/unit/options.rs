use std::path::{Path, PathBuf};

use test_case::test_case;

use crate::DriverOptions;
use crate::error::Error;

fn with_inputs(inputs: &[&str]) -> DriverOptions {
    DriverOptions::builder().inputs(inputs.iter().map(PathBuf::from).collect()).device("t.cfg").max_errors(5).build()
}

#[test_case("blur.json" => "blur"; "json")]
#[test_case("dir/edge.kg.json" => "edge"; "nested extensions")]
#[test_case("harris.ikg" => "harris"; "preprocessed input")]
#[test_case("plain" => "plain"; "no extension")]
#[test_case(".json" => "kernel"; "empty radix")]
fn test_program_name_from_input(input: &str) -> String {
    with_inputs(&[input]).program_name(Path::new(input))
}

#[test]
fn test_explicit_program_name() {
    let options = DriverOptions::builder()
        .inputs(vec![PathBuf::from("blur.json")])
        .device("t.cfg")
        .program_name("vision")
        .outdir("gen")
        .build();
    assert_eq!(options.program_name(Path::new("blur.json")), "vision");
    assert_eq!(options.output_path(Path::new("blur.json"), "cl"), Path::new("gen").join("vision.cl"));
}

#[test]
fn test_no_input_rejected() {
    let err = with_inputs(&[]).check().unwrap_err();
    assert!(matches!(err, Error::Usage { .. }));
    assert_eq!(err.to_string(), "no file to compile in the command line");
    assert_eq!(err.exit_status(), 1);
}

#[test]
fn test_program_name_with_several_inputs_rejected() {
    let mut options = with_inputs(&["a.json", "b.json"]);
    assert!(options.check().is_ok());
    options.program_name = Some("both".to_string());
    assert_eq!(options.check().unwrap_err().to_string(), "cannot specify -o with multiple files");
}

#[test]
fn test_diagnostics_follow_options() {
    let options = DriverOptions::builder()
        .inputs(vec![PathBuf::from("a.json")])
        .device("t.cfg")
        .max_errors(2)
        .verbosity(1)
        .build();
    let diag = options.diagnostics();
    assert_eq!(diag.max_errors(), 2);
    assert_eq!(options.outdir, PathBuf::from("."));
    assert_eq!(options.jobs, None);
}

#[test]
fn test_zero_jobs_means_default() {
    let options = DriverOptions::builder().inputs(Vec::new()).device("t.cfg").jobs(0).build();
    assert_eq!(options.jobs, None);
}
