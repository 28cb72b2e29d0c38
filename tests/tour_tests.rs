use cslint::core::tour::{self, run_tour};

const EXPECTED: &str = "\
num1 is less than num2.
Iteration number 0
Iteration number 1
Iteration number 2
Iteration number 3
Iteration number 4
num1 equals 10
Division by zero!
Error: Attempted to divide by zero.
Array element: 1
Array element: 2
Array element: 3
Array element: 4
Array element: 5
String length: 13
Sum of 10 and 20 is 30
This is
a multi-line
string
";

#[test]
fn test_tour_output_is_stable() {
    let mut out = Vec::new();
    run_tour(&mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), EXPECTED);
}

#[test]
fn test_steps_run_in_order() {
    let names: Vec<&str> = tour::STEPS.iter().map(|(name, _)| *name).collect();
    assert_eq!(
        names,
        vec!["compare", "count", "dispatch", "divide", "iterate", "measure", "sum", "verbatim"]
    );
}

#[test]
fn test_steps_are_independent() {
    // running a step twice gives the same lines
    for (name, step) in tour::STEPS {
        assert_eq!(step(), step(), "step {} changed between runs", name);
    }
}

#[test]
fn test_tour_mirrors_the_sample_program() {
    let sample = std::fs::read_to_string(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/example.cs"),
    )
    .unwrap();

    for line in ["num1 is less than num2.", "num1 equals 10", "Division by zero!"] {
        assert!(sample.contains(line), "sample is missing: {}", line);
    }
}
