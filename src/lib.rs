pub mod coerce;
pub mod engine;
pub mod expand;
pub mod report;
pub mod sample;
pub mod suite;
pub mod types;
pub mod value;

pub use crate::engine::{RunError, RunOptions, execute, run_tests};
pub use crate::suite::{Suite, SuiteRegistry, TestMethod};
pub use crate::types::{Outcome, Summary, Tally, TestAnnotation, Verdict};

/// Suite run when none is named on the command line.
pub const DEFAULT_SUITE: &str = match option_env!("ANNOTEST_DEFAULT_SUITE") {
    Some(name) => name,
    None => "annotest::sample::BeautifulSuite",
};
