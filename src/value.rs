//! Runtime values passed into and returned from test methods.
//!
//! Arguments cross the runner as a [`Value`] and are turned back into the
//! method's declared Rust type by [`FromArg`]. Return values go the other way
//! through [`IntoValue`] and are compared by their `Display` text.

use crate::types::Thrown;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Str(String),
    Int(i32),
    Long(i64),
    Bool(bool),
    Double(f64),
}

impl Value {
    pub fn type_label(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Str(_) => "String",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Bool(_) => "boolean",
            Value::Double(_) => "double",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Double(d) => f.write_str(&render_double(*d)),
        }
    }
}

/// Doubles always carry a fractional digit (`2.0`) and switch to `1.0E7`
/// notation outside `[1e-3, 1e7)`.
pub fn render_double(d: f64) -> String {
    if d.is_nan() {
        return "NaN".to_string();
    }
    if d.is_infinite() {
        return if d > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = d.abs();
    if d == 0.0 || (1e-3..1e7).contains(&magnitude) {
        let mut s = format!("{d}");
        if !s.contains('.') {
            s.push_str(".0");
        }
        return s;
    }
    let sci = format!("{d:e}");
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    if mantissa.contains('.') {
        format!("{mantissa}E{exponent}")
    } else {
        format!("{mantissa}.0E{exponent}")
    }
}

/// Declared parameter type of a test method, as seen by the coercer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Str,
    Int,
    Bool,
    Double,
    /// Outside the coercion set; the text is handed over unchanged.
    Other(&'static str),
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Str => f.write_str("String"),
            ParamKind::Int => f.write_str("int"),
            ParamKind::Bool => f.write_str("boolean"),
            ParamKind::Double => f.write_str("double"),
            ParamKind::Other(name) => f.write_str(name),
        }
    }
}

/// A Rust type usable as the single argument of a test method.
pub trait FromArg: Sized + 'static {
    const KIND: ParamKind;

    /// Gives the value back when it is not of this type.
    fn from_value(value: Value) -> Result<Self, Value>;
}

impl FromArg for String {
    const KIND: ParamKind = ParamKind::Str;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl FromArg for i32 {
    const KIND: ParamKind = ParamKind::Int;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Int(n) => Ok(n),
            other => Err(other),
        }
    }
}

impl FromArg for bool {
    const KIND: ParamKind = ParamKind::Bool;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl FromArg for f64 {
    const KIND: ParamKind = ParamKind::Double;

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Double(d) => Ok(d),
            other => Err(other),
        }
    }
}

impl FromArg for i64 {
    const KIND: ParamKind = ParamKind::Other("long");

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Long(n) => Ok(n),
            other => Err(other),
        }
    }
}

pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Null
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl IntoValue for &'static str {
    fn into_value(self) -> Value {
        Value::Str(self.to_string())
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Long(self)
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Double(self)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

/// What a test method hands back: a plain value, or a `Result` whose `Err`
/// counts as raised by the target.
pub trait IntoOutcome {
    fn into_outcome(self) -> Result<Value, Thrown>;
}

macro_rules! plain_outcome {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoOutcome for $ty {
                fn into_outcome(self) -> Result<Value, Thrown> {
                    Ok(self.into_value())
                }
            }
        )*
    };
}

plain_outcome!(Value, (), String, &'static str, i32, i64, bool, f64);

impl<T: IntoValue> IntoOutcome for Option<T> {
    fn into_outcome(self) -> Result<Value, Thrown> {
        Ok(self.into_value())
    }
}

impl<T: IntoValue, E: fmt::Display + 'static> IntoOutcome for Result<T, E> {
    fn into_outcome(self) -> Result<Value, Thrown> {
        self.map(IntoValue::into_value).map_err(|e| Thrown::of(&e))
    }
}
