//! Demo suite run when no suite name is given.

use crate::suite::{Suite, TestMethod};
use crate::test_case;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Something exploded!")]
pub struct RuntimeError;

#[derive(Debug, Default)]
pub struct BeautifulSuite;

impl BeautifulSuite {
    pub fn square(&mut self, x: i32) -> i32 {
        x * x
    }

    pub fn to_upper(&mut self, s: String) -> String {
        s.to_uppercase()
    }

    pub fn negate(&mut self, b: bool) -> bool {
        !b
    }

    pub fn boom(&mut self, _s: String) -> Result<(), RuntimeError> {
        Err(RuntimeError)
    }

    pub fn return_seven(&mut self) -> i32 {
        7
    }

    // not a test
    pub fn helper(&mut self) -> &'static str {
        "unused"
    }
}

impl Suite for BeautifulSuite {
    fn new() -> anyhow::Result<Self> {
        Ok(Self)
    }

    fn declared_methods() -> Vec<TestMethod> {
        vec![
            // passing
            TestMethod::unary("square", Self::square)
                .annotated(test_case!(params = ["10", "5"], results = ["100", "25"])),
            TestMethod::unary("to_upper", Self::to_upper)
                .annotated(test_case!(params = ["Java", "Engine"], results = ["JAVA", "ENGINE"])),
            // failing
            TestMethod::unary("square_fail", Self::square)
                .annotated(test_case!(params = ["2", "3"], results = ["4", "10"])),
            // looks like a failure, passes
            TestMethod::unary("negate", Self::negate)
                .annotated(test_case!(params = ["true"], results = ["false"])),
            // erroring
            TestMethod::unary("boom", Self::boom).annotated(test_case!(params = ["some text"])),
            // no params
            TestMethod::nullary("return_seven", Self::return_seven).annotated(test_case!(results = ["7"])),
            TestMethod::nullary("helper", Self::helper),
        ]
    }
}
