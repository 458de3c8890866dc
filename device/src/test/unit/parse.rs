use std::io::Write;

use kgen_ir::{Diagnostics, Severity};
use test_case::test_case;

use crate::error::Error;
use crate::parse::{parse_str, read_file};

const CLUSTER: &str = "\
# sixteen-core cluster
[device p2012]
nbComputeUnits = 4
memorySize = 1048576

[compute_unit cluster]
nbComputeElements = 16
memorySize = 262144   # shared L1
dataConnectivityToExt = dma

[compute_element pe]
dataConnectivityToExt = loadstore
nbHwThreads = 2
Tdouble = soft
dataCache
";

#[test]
fn test_parse_cluster() {
    let mut diag = Diagnostics::default();
    let device = parse_str(CLUSTER, "p2012.cfg", &mut diag).unwrap();
    assert_eq!(device.name(), "p2012");
    assert_eq!(device.nb_compute_units(), 4);
    assert_eq!(device.compute_unit().name(), "cluster");
    assert_eq!(device.compute_unit().nb_compute_elements(), 16);
    assert_eq!(device.local_memory_budget(), Some(262144));
    assert_eq!(device.compute_element().nb_hw_threads(), 2);
    assert!(device.compute_element().has_data_cache());
    assert_eq!(diag.warning_count(), 0);
    assert!(device.to_string().starts_with("device 'p2012': nbComputeUnits=4"));
}

#[test]
fn test_errors_carry_file_and_line() {
    let text = "[device d]\nbogus = 3\n[compute_unit]\ndataConnectivityToExt = dma\n[compute_element]\ndataConnectivityToExt = dma\n";
    let mut diag = Diagnostics::default();
    let result = parse_str(text, "d.cfg", &mut diag);
    assert!(matches!(result, Err(Error::InvalidDevice { .. })));
    assert_eq!(diag.entries()[0].to_string(), "d.cfg:2: error: device 'd': unknown property 'bogus'");
}

#[test]
fn test_property_outside_section() {
    let mut diag = Diagnostics::default();
    let _ = parse_str("memorySize = 4\n", "x.cfg", &mut diag);
    assert_eq!(diag.entries()[0].to_string(), "x.cfg:1: error: property 'memorySize = 4' outside of any section");
}

#[test]
fn test_error_cap_aborts() {
    let text = "[device d]\na\nb\nc\nd\ne\nf\n";
    let mut diag = Diagnostics::default();
    let result = parse_str(text, "d.cfg", &mut diag);
    assert!(matches!(result, Err(Error::Aborted { .. })));
    assert_eq!(diag.error_count(), 5);
}

#[test]
fn test_read_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CLUSTER.as_bytes()).unwrap();
    let mut diag = Diagnostics::default();
    let device = read_file(file.path(), &mut diag).unwrap();
    assert_eq!(device.nb_compute_elements_total(), 64);

    let missing = read_file(std::path::Path::new("/nonexistent/dev.cfg"), &mut diag);
    assert!(matches!(missing, Err(Error::ReadDescription { .. })));
}

#[test_case("[compute_elemnt pe2]", "p2012.cfg:16: error: unknown section 'compute_elemnt'"; "misspelled section")]
#[test_case("[device", "p2012.cfg:16: error: malformed section header '[device'"; "unclosed header")]
#[test_case("[bogus]\nTdouble = native", "p2012.cfg:16: error: unknown section 'bogus'"; "property after unknown section")]
fn test_structural_errors_invalidate_device(trailer: &str, first: &str) {
    let text = format!("{CLUSTER}{trailer}\n");
    let mut diag = Diagnostics::default();
    let result = parse_str(&text, "p2012.cfg", &mut diag);
    assert!(matches!(result, Err(Error::InvalidDevice { count, .. }) if count == diag.error_count()));
    assert_eq!(diag.entries().iter().find(|d| d.severity == Severity::Error).unwrap().to_string(), first);
}

#[test]
fn test_property_before_any_section_invalidates_device() {
    let text = format!("Tdouble = native\n{CLUSTER}");
    let mut diag = Diagnostics::default();
    assert!(matches!(parse_str(&text, "p2012.cfg", &mut diag), Err(Error::InvalidDevice { count: 1, .. })));
}
