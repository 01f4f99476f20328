//! Suites, their declared methods, and the registry that resolves a suite by
//! name.
//!
//! A suite is a plain Rust type implementing [`Suite`]. It lists its methods
//! as [`TestMethod`]s; a method takes part in a run only when it carries a
//! [`TestAnnotation`]. Each method holds a type-erased invoker so the engine
//! can call it on a `dyn Any` receiver with a single runtime [`Value`].

use crate::coerce::CoercionError;
use crate::types::{TestAnnotation, Thrown};
use crate::value::{FromArg, IntoOutcome, ParamKind, Value};
use indexmap::IndexMap;
use std::any::{Any, type_name};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;
use tracing::debug;

pub trait Suite: Sized + 'static {
    /// The zero-argument constructor.
    fn new() -> anyhow::Result<Self>;

    /// Every method of the suite in declaration order, annotated or not.
    fn declared_methods() -> Vec<TestMethod>;
}

/// Failures raised by the runner itself rather than by the method under test.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Coercion(#[from] CoercionError),
    #[error("wrong number of arguments: `{method}` takes {expected}, got {given}")]
    Arity {
        method: String,
        expected: usize,
        given: usize,
    },
    #[error("argument type mismatch: `{method}` takes {expected}, got {found}")]
    ArgumentMismatch {
        method: String,
        expected: ParamKind,
        found: &'static str,
    },
    #[error("object is not an instance of `{expected}`")]
    Receiver { expected: &'static str },
    #[error("internal panic: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("target raised {}: {}", .0.type_name, .0.message)]
    Target(Thrown),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

type Invoker = Box<dyn Fn(&mut dyn Any, Option<Value>) -> Result<Value, InvokeError>>;

pub struct TestMethod {
    name: String,
    param: Option<ParamKind>,
    annotation: Option<TestAnnotation>,
    invoker: Invoker,
}

impl fmt::Debug for TestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestMethod")
            .field("name", &self.name)
            .field("param", &self.param)
            .field("annotation", &self.annotation)
            .finish_non_exhaustive()
    }
}

impl TestMethod {
    /// A method taking no arguments besides the receiver.
    pub fn nullary<S, R, F>(name: impl Into<String>, f: F) -> Self
    where
        S: 'static,
        R: IntoOutcome,
        F: Fn(&mut S) -> R + 'static,
    {
        let name = name.into();
        let method = name.clone();
        let invoker: Invoker = Box::new(move |receiver: &mut dyn Any, arg: Option<Value>| {
            let suite = downcast::<S>(receiver)?;
            if arg.is_some() {
                return Err(EngineError::Arity {
                    method: method.clone(),
                    expected: 0,
                    given: 1,
                }
                .into());
            }
            call_target(|| f(suite))
        });
        Self {
            name,
            param: None,
            annotation: None,
            invoker,
        }
    }

    /// A method taking exactly one argument of a coercible type.
    pub fn unary<S, A, R, F>(name: impl Into<String>, f: F) -> Self
    where
        S: 'static,
        A: FromArg,
        R: IntoOutcome,
        F: Fn(&mut S, A) -> R + 'static,
    {
        let name = name.into();
        let method = name.clone();
        let invoker: Invoker = Box::new(move |receiver: &mut dyn Any, arg: Option<Value>| {
            let suite = downcast::<S>(receiver)?;
            let Some(value) = arg else {
                return Err(EngineError::Arity {
                    method: method.clone(),
                    expected: 1,
                    given: 0,
                }
                .into());
            };
            let typed = A::from_value(value).map_err(|found| EngineError::ArgumentMismatch {
                method: method.clone(),
                expected: A::KIND,
                found: found.type_label(),
            })?;
            call_target(|| f(suite, typed))
        });
        Self {
            name,
            param: Some(A::KIND),
            annotation: None,
            invoker,
        }
    }

    pub fn annotated(mut self, annotation: TestAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param(&self) -> Option<ParamKind> {
        self.param
    }

    pub fn annotation(&self) -> Option<&TestAnnotation> {
        self.annotation.as_ref()
    }

    pub fn invoke(&self, receiver: &mut dyn Any, arg: Option<Value>) -> Result<Value, InvokeError> {
        (self.invoker)(receiver, arg)
    }
}

fn downcast<S: 'static>(receiver: &mut dyn Any) -> Result<&mut S, EngineError> {
    receiver.downcast_mut::<S>().ok_or(EngineError::Receiver {
        expected: type_name::<S>(),
    })
}

/// Runs the method body; a panic inside it counts as raised by the target.
fn call_target<R: IntoOutcome>(body: impl FnOnce() -> R) -> Result<Value, InvokeError> {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(returned) => returned.into_outcome().map_err(InvokeError::Target),
        Err(payload) => Err(InvokeError::Target(Thrown::panic(panic_message(payload.as_ref())))),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("suite `{0}` not found")]
    NotFound(String),
    #[error("suite `{name}` could not be constructed: {source:#}")]
    Construct {
        name: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("suite `{name}` constructor panicked: {message}")]
    Panicked { name: String, message: String },
}

/// A freshly constructed suite together with its declared methods.
pub struct LoadedSuite {
    pub name: String,
    pub instance: Box<dyn Any>,
    pub methods: Vec<TestMethod>,
}

impl fmt::Debug for LoadedSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedSuite")
            .field("name", &self.name)
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

/// Methods carrying an annotation, in declaration order.
///
/// Takes the method slice rather than the whole [`LoadedSuite`] so the
/// instance stays mutably borrowable while the list is alive.
pub fn test_methods(methods: &[TestMethod]) -> Vec<&TestMethod> {
    methods.iter().filter(|m| m.annotation().is_some()).collect()
}

type Constructor = fn(&str) -> Result<LoadedSuite, LoadError>;

fn construct<S: Suite>(name: &str) -> Result<LoadedSuite, LoadError> {
    let built = panic::catch_unwind(S::new).map_err(|payload| LoadError::Panicked {
        name: name.to_string(),
        message: panic_message(payload.as_ref()),
    })?;
    let instance = built.map_err(|source| LoadError::Construct {
        name: name.to_string(),
        source,
    })?;
    Ok(LoadedSuite {
        name: name.to_string(),
        instance: Box::new(instance),
        methods: S::declared_methods(),
    })
}

/// Suites known to the runner, keyed by their fully-qualified name.
#[derive(Default)]
pub struct SuiteRegistry {
    suites: IndexMap<String, Constructor>,
}

impl SuiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the suites shipped with this crate.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register::<crate::sample::BeautifulSuite>();
        registry
    }

    /// Registers `S` under `std::any::type_name::<S>()`.
    pub fn register<S: Suite>(&mut self) -> &mut Self {
        self.register_as::<S>(type_name::<S>())
    }

    pub fn register_as<S: Suite>(&mut self, name: impl Into<String>) -> &mut Self {
        self.suites.insert(name.into(), construct::<S>);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.suites.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.suites.contains_key(name)
    }

    /// Resolves `name` and builds a fresh instance.
    ///
    /// Failures are returned, not logged; the caller decides how to report them.
    pub fn load(&self, name: &str) -> Result<LoadedSuite, LoadError> {
        let constructor = self
            .suites
            .get(name)
            .ok_or_else(|| LoadError::NotFound(name.to_string()))?;
        let loaded = constructor(name)?;
        debug!(suite = name, methods = loaded.methods.len(), "suite loaded");
        Ok(loaded)
    }
}

impl fmt::Debug for SuiteRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.suites.keys()).finish()
    }
}
