use crate::coerce::Coercer;
use crate::expand::{Descriptor, expand};
use crate::report::Reporter;
use crate::suite::{EngineError, InvokeError, LoadError, SuiteRegistry, panic_message, test_methods};
use crate::types::{CaseRecord, ErrorCause, Outcome, Summary, Tally, Verdict};
use crate::value::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Run methods sorted by name instead of declaration order.
    pub sort_methods: bool,
    pub coercer: Coercer,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

fn invoke(coercer: &Coercer, descriptor: &Descriptor<'_>, suite: &mut dyn Any) -> Result<Value, InvokeError> {
    let method = descriptor.method;
    let arg = match descriptor.input {
        Some(text) => {
            let kind = method.param().ok_or_else(|| EngineError::Arity {
                method: method.name().to_string(),
                expected: 0,
                given: 1,
            })?;
            Some(coercer.coerce(kind, text).map_err(EngineError::from)?)
        }
        None => None,
    };
    method.invoke(suite, arg)
}

fn judge(expected: Option<&str>, value: &Value) -> Outcome {
    match expected {
        None => Outcome::Pass { checked: false },
        Some(expected) => {
            let actual = value.to_string();
            if actual == expected {
                Outcome::Pass { checked: true }
            } else {
                Outcome::Fail {
                    expected: expected.to_string(),
                    actual,
                }
            }
        }
    }
}

/// Runs one descriptor against the suite instance. Never panics.
pub fn execute(coercer: &Coercer, descriptor: &Descriptor<'_>, suite: &mut dyn Any) -> Outcome {
    let attempt = panic::catch_unwind(AssertUnwindSafe(|| invoke(coercer, descriptor, suite)));
    match attempt {
        Ok(Ok(value)) => judge(descriptor.expected, &value),
        Ok(Err(InvokeError::Target(thrown))) => {
            debug!(method = descriptor.method.name(), thrown = %thrown.type_name, "{}", thrown.message);
            Outcome::Error(ErrorCause::Target(thrown))
        }
        Ok(Err(InvokeError::Engine(e))) => Outcome::Error(ErrorCause::Engine(e.to_string())),
        Err(payload) => {
            let e = EngineError::Internal(panic_message(payload.as_ref()));
            Outcome::Error(ErrorCause::Engine(e.to_string()))
        }
    }
}

/// Loads `suite_name`, runs every annotated method and reports as it goes.
pub fn run_tests<R: Reporter>(
    registry: &SuiteRegistry,
    suite_name: &str,
    options: &RunOptions,
    reporter: &mut R,
) -> Result<Summary, RunError> {
    reporter.on_run_start(suite_name)?;
    let mut loaded = registry.load(suite_name)?;

    let mut methods = test_methods(&loaded.methods);
    if options.sort_methods {
        methods.sort_by(|a, b| a.name().cmp(b.name()));
    }
    for m in &methods {
        if let Some(surplus) = m.annotation().map(|a| a.surplus_results()).filter(|&n| n > 0) {
            warn!(method = m.name(), surplus, "ignoring expectations without a matching param");
        }
    }
    info!(suite = suite_name, methods = methods.len(), "starting run");
    reporter.on_discovery_complete(methods.len())?;

    let mut tally = Tally::default();
    let mut cases = Vec::new();
    for method in methods {
        for descriptor in expand(method) {
            reporter.on_case_start(method.name(), descriptor.input)?;
            let outcome = execute(&options.coercer, &descriptor, loaded.instance.as_mut());
            debug!(method = method.name(), input = ?descriptor.input, verdict = ?outcome.verdict());
            tally.record(outcome.verdict());
            reporter.on_case_complete(&outcome)?;
            cases.push(CaseRecord {
                method: method.name().to_string(),
                input: descriptor.input.map(str::to_string),
                expected: descriptor.expected.map(str::to_string),
                outcome,
            });
        }
    }

    reporter.on_run_complete(&tally)?;
    info!(
        passed = tally.get(Verdict::Pass),
        failed = tally.get(Verdict::Fail),
        errors = tally.get(Verdict::Error),
        "run finished"
    );
    Ok(Summary {
        suite: loaded.name,
        tally,
        cases,
    })
}
