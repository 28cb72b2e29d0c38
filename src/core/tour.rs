//! A walkthrough of basic control flow, printed line by line. It follows the
//! `Main` routine of the bundled C# sample, so the linter and the tour
//! describe the same program.

use std::io::Write;
use thiserror::Error;

const NUM1: i32 = 10;
const NUM2: i32 = 20;
const ELEMENTS: [i32; 5] = [1, 2, 3, 4, 5];
const SAMPLE: &str = "Sample string";
const VERBATIM: &str = "This is
a multi-line
string";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("Attempted to divide by zero.")]
    DivideByZero,
}

fn divide(dividend: i32, divisor: i32) -> Result<i32, ArithmeticError> {
    dividend
        .checked_div(divisor)
        .ok_or(ArithmeticError::DivideByZero)
}

pub fn compare() -> Vec<String> {
    let verdict = match NUM1.cmp(&NUM2) {
        std::cmp::Ordering::Greater => "num1 is greater than num2.",
        std::cmp::Ordering::Less => "num1 is less than num2.",
        std::cmp::Ordering::Equal => "num1 is equal to num2.",
    };
    vec![verdict.to_string()]
}

pub fn count() -> Vec<String> {
    (0..5).map(|i| format!("Iteration number {}", i)).collect()
}

pub fn dispatch() -> Vec<String> {
    let line = match NUM1 {
        5 => "num1 equals 5",
        10 => "num1 equals 10",
        _ => "num1 equals neither 5 nor 10",
    };
    vec![line.to_string()]
}

pub fn divide_by_zero() -> Vec<String> {
    let zero = 0;
    match divide(NUM2, zero) {
        Ok(result) => vec![format!("Result: {}", result)],
        Err(e) => vec!["Division by zero!".to_string(), format!("Error: {}", e)],
    }
}

pub fn iterate() -> Vec<String> {
    ELEMENTS
        .iter()
        .map(|n| format!("Array element: {}", n))
        .collect()
}

pub fn measure() -> Vec<String> {
    vec![format!("String length: {}", SAMPLE.chars().count())]
}

pub fn sum() -> Vec<String> {
    vec![format!("Sum of {} and {} is {}", NUM1, NUM2, NUM1 + NUM2)]
}

pub fn verbatim() -> Vec<String> {
    VERBATIM.lines().map(str::to_string).collect()
}

type Step = fn() -> Vec<String>;

pub const STEPS: [(&str, Step); 8] = [
    ("compare", compare),
    ("count", count),
    ("dispatch", dispatch),
    ("divide", divide_by_zero),
    ("iterate", iterate),
    ("measure", measure),
    ("sum", sum),
    ("verbatim", verbatim),
];

/// Runs every step in order and writes its lines to `out`.
pub fn run_tour<W: Write>(out: &mut W) -> std::io::Result<()> {
    for (name, step) in STEPS {
        tracing::debug!("tour step: {}", name);
        for line in step() {
            writeln!(out, "{}", line)?;
        }
    }
    Ok(())
}
