use crate::value::{ParamKind, Value};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Decimal notation plus the spelled-out `NaN` and `Infinity` tokens.
static DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:NaN|Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)$")
        .expect("decimal pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert {text:?} to {kind}: {reason}")]
pub struct CoercionError {
    pub kind: ParamKind,
    pub text: String,
    pub reason: String,
}

impl CoercionError {
    fn new(kind: ParamKind, text: &str, reason: impl ToString) -> Self {
        Self {
            kind,
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Strategy = fn(&str) -> Result<Value, CoercionError>;

/// Turns annotation text into a [`Value`] of the requested kind.
///
/// Kinds without a registered strategy get the text back as [`Value::Str`];
/// the invoker then rejects it as an argument mismatch.
#[derive(Debug, Clone)]
pub struct Coercer {
    strategies: IndexMap<ParamKind, Strategy>,
}

impl Default for Coercer {
    fn default() -> Self {
        Self::standard()
    }
}

impl Coercer {
    pub fn empty() -> Self {
        Self {
            strategies: IndexMap::new(),
        }
    }

    pub fn standard() -> Self {
        Self::empty()
            .with(ParamKind::Str, coerce_str)
            .with(ParamKind::Int, coerce_int)
            .with(ParamKind::Bool, coerce_bool)
            .with(ParamKind::Double, coerce_double)
    }

    pub fn with(mut self, kind: ParamKind, strategy: Strategy) -> Self {
        self.register(kind, strategy);
        self
    }

    pub fn register(&mut self, kind: ParamKind, strategy: Strategy) -> Option<Strategy> {
        self.strategies.insert(kind, strategy)
    }

    pub fn supports(&self, kind: ParamKind) -> bool {
        self.strategies.contains_key(&kind)
    }

    pub fn coerce(&self, kind: ParamKind, text: &str) -> Result<Value, CoercionError> {
        match self.strategies.get(&kind) {
            Some(strategy) => strategy(text),
            None => Ok(Value::Str(text.to_string())),
        }
    }
}

fn coerce_str(text: &str) -> Result<Value, CoercionError> {
    Ok(Value::Str(text.to_string()))
}

fn coerce_int(text: &str) -> Result<Value, CoercionError> {
    text.parse::<i32>()
        .map(Value::Int)
        .map_err(|e| CoercionError::new(ParamKind::Int, text, e))
}

fn coerce_bool(text: &str) -> Result<Value, CoercionError> {
    Ok(Value::Bool(text.eq_ignore_ascii_case("true")))
}

fn coerce_double(text: &str) -> Result<Value, CoercionError> {
    let trimmed = text.trim();
    if !DECIMAL.is_match(trimmed) {
        return Err(CoercionError::new(ParamKind::Double, text, "not a decimal number"));
    }
    trimmed
        .parse::<f64>()
        .map(Value::Double)
        .map_err(|e| CoercionError::new(ParamKind::Double, text, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_kinds() {
        let c = Coercer::standard();
        assert_eq!(c.coerce(ParamKind::Str, " as is "), Ok(Value::Str(" as is ".into())));
        assert_eq!(c.coerce(ParamKind::Int, "-42"), Ok(Value::Int(-42)));
        assert_eq!(c.coerce(ParamKind::Int, "+7"), Ok(Value::Int(7)));
        assert_eq!(c.coerce(ParamKind::Double, " 2.5 "), Ok(Value::Double(2.5)));
        assert_eq!(c.coerce(ParamKind::Double, "1e3"), Ok(Value::Double(1000.0)));
    }

    #[test]
    fn bool_is_lenient() {
        let c = Coercer::standard();
        assert_eq!(c.coerce(ParamKind::Bool, "TRUE"), Ok(Value::Bool(true)));
        assert_eq!(c.coerce(ParamKind::Bool, "True"), Ok(Value::Bool(true)));
        assert_eq!(c.coerce(ParamKind::Bool, "yes"), Ok(Value::Bool(false)));
        assert_eq!(c.coerce(ParamKind::Bool, ""), Ok(Value::Bool(false)));
    }

    #[test]
    fn malformed_numbers_fail() {
        let c = Coercer::standard();
        let err = c.coerce(ParamKind::Int, "ten").unwrap_err();
        assert_eq!(err.kind, ParamKind::Int);
        assert_eq!(err.text, "ten");
        assert!(err.to_string().starts_with("cannot convert \"ten\" to int"));
        assert!(c.coerce(ParamKind::Int, " 5").is_err());
        assert!(c.coerce(ParamKind::Int, "3000000000").is_err());
        assert!(c.coerce(ParamKind::Double, "1,5").is_err());
        assert!(c.coerce(ParamKind::Double, "inf").is_err());
        assert!(c.coerce(ParamKind::Double, "nan").is_err());
        assert!(c.coerce(ParamKind::Double, "infinity").is_err());
        assert!(c.coerce(ParamKind::Double, "e5").is_err());
    }

    #[test]
    fn doubles_accept_spelled_out_specials() {
        let c = Coercer::standard();
        assert_eq!(c.coerce(ParamKind::Double, "-Infinity"), Ok(Value::Double(f64::NEG_INFINITY)));
        assert_eq!(c.coerce(ParamKind::Double, "+Infinity"), Ok(Value::Double(f64::INFINITY)));
        assert!(matches!(c.coerce(ParamKind::Double, " NaN "), Ok(Value::Double(d)) if d.is_nan()));
        assert_eq!(c.coerce(ParamKind::Double, ".5"), Ok(Value::Double(0.5)));
        assert_eq!(c.coerce(ParamKind::Double, "3."), Ok(Value::Double(3.0)));
    }

    #[test]
    fn unknown_kind_passes_text_through() {
        let c = Coercer::standard();
        assert!(!c.supports(ParamKind::Other("long")));
        assert_eq!(
            c.coerce(ParamKind::Other("long"), "12"),
            Ok(Value::Str("12".into()))
        );
    }

    #[test]
    fn strategies_can_be_added() {
        fn long(text: &str) -> Result<Value, CoercionError> {
            text.parse::<i64>()
                .map(Value::Long)
                .map_err(|e| CoercionError::new(ParamKind::Other("long"), text, e))
        }
        let c = Coercer::standard().with(ParamKind::Other("long"), long);
        assert_eq!(
            c.coerce(ParamKind::Other("long"), "9000000000"),
            Ok(Value::Long(9_000_000_000))
        );
    }
}
