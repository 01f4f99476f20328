use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verdict {
    Pass,
    Fail,
    Error,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::Pass, Verdict::Fail, Verdict::Error];

    pub fn tag(self) -> &'static str {
        match self {
            Verdict::Pass => "[PASS]",
            Verdict::Fail => "[FAIL]",
            Verdict::Error => "[ERROR]",
        }
    }

    fn index(self) -> usize {
        match self {
            Verdict::Pass => 0,
            Verdict::Fail => 1,
            Verdict::Error => 2,
        }
    }
}

/// The test marker: `results[i]` is the expectation for `params[i]`.
///
/// With no `params` the method is invoked once without arguments and only
/// `results[0]` (if any) is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestAnnotation {
    pub params: Vec<String>,
    pub results: Vec<String>,
}

impl TestAnnotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn results<I, S>(mut self, results: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.results = results.into_iter().map(Into::into).collect();
        self
    }

    /// Expectations that no invocation will ever be checked against.
    pub fn surplus_results(&self) -> usize {
        self.results.len().saturating_sub(self.params.len().max(1))
    }
}

/// Builds a [`TestAnnotation`] from literal lists.
///
/// ```
/// let ann = annotest::test_case!(params = ["10", "5"], results = ["100", "25"]);
/// assert_eq!(ann.params, vec!["10", "5"]);
/// ```
#[macro_export]
macro_rules! test_case {
    () => {
        $crate::types::TestAnnotation::new()
    };
    (params = [$($p:expr),* $(,)?] $(,)?) => {
        $crate::types::TestAnnotation::new().params([$($p),*])
    };
    (results = [$($r:expr),* $(,)?] $(,)?) => {
        $crate::types::TestAnnotation::new().results([$($r),*])
    };
    (params = [$($p:expr),* $(,)?], results = [$($r:expr),* $(,)?] $(,)?) => {
        $crate::types::TestAnnotation::new()
            .params([$($p),*])
            .results([$($r),*])
    };
}

/// Something a target method raised: an `Err` it returned or a panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thrown {
    pub type_name: String,
    pub message: String,
}

impl Thrown {
    pub fn of<E: fmt::Display + 'static>(err: &E) -> Self {
        Self {
            type_name: short_type_name::<E>().to_string(),
            message: err.to_string(),
        }
    }

    pub fn panic(message: impl Into<String>) -> Self {
        Self {
            type_name: "Panic".to_string(),
            message: message.into(),
        }
    }
}

/// `my_crate::errors::ParseError<T>` -> `ParseError`
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCause {
    /// Raised by the method under test.
    Target(Thrown),
    /// Raised by the runner before or around the invocation.
    Engine(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `checked` is false when there was no expectation to compare against.
    Pass { checked: bool },
    Fail { expected: String, actual: String },
    Error(ErrorCause),
}

impl Outcome {
    pub fn verdict(&self) -> Verdict {
        match self {
            Outcome::Pass { .. } => Verdict::Pass,
            Outcome::Fail { .. } => Verdict::Fail,
            Outcome::Error(_) => Verdict::Error,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass { checked: true } => write!(f, "OK"),
            Outcome::Pass { checked: false } => write!(f, "OK (No expectation)"),
            Outcome::Fail { expected, actual } => write!(f, "Expected: {expected}, Got: {actual}"),
            Outcome::Error(ErrorCause::Target(thrown)) => write!(f, "Exception: {}", thrown.type_name),
            Outcome::Error(ErrorCause::Engine(diag)) => write!(f, "Engine Error: {diag}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    counts: [usize; 3],
}

impl Tally {
    pub fn record(&mut self, verdict: Verdict) {
        self.counts[verdict.index()] += 1;
    }

    pub fn get(&self, verdict: Verdict) -> usize {
        self.counts[verdict.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[derive(Debug, Clone)]
pub struct CaseRecord {
    pub method: String,
    pub input: Option<String>,
    pub expected: Option<String>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub suite: String,
    pub tally: Tally,
    pub cases: Vec<CaseRecord>, // execution order
}
