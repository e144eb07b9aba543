//! Parameter resolution: inline literals or named placeholders.

use std::collections::HashSet;

use chrono::Timelike;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ast::Value;
use crate::error::{RenderError, RenderResult};

/// Ordered parameter mapping, name to value.
pub type Params = IndexMap<String, Value>;

/// Prefix of generated placeholder names (`param1`, `param2`, ...).
pub const GENERATED_PREFIX: &str = "param";

/// How literal values reach the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Literals are written into the text; nothing is bound for them.
    Inline,
    /// Every literal becomes a generated `:paramN` placeholder.
    #[default]
    Placeholder,
}

/// Per-render parameter state.
///
/// Owned by exactly one render; never shared between renders.
#[derive(Debug)]
pub struct ParamResolver<'p> {
    mode: RenderMode,
    supplied: Option<&'p Params>,
    reserved: HashSet<String>,
    next_ordinal: usize,
    params: Params,
}

impl<'p> ParamResolver<'p> {
    pub fn new(mode: RenderMode) -> Self {
        Self {
            mode,
            supplied: None,
            reserved: HashSet::new(),
            next_ordinal: 1,
            params: Params::new(),
        }
    }

    /// Resolver that binds named parameters from `supplied`.
    pub fn with_supplied(mode: RenderMode, supplied: &'p Params) -> Self {
        let mut resolver = Self::new(mode);
        resolver.reserved.extend(supplied.keys().cloned());
        resolver.supplied = Some(supplied);
        resolver
    }

    /// Keep `name` out of the generated `paramN` sequence.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.reserved.insert(name.into());
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Register a literal and return the token to write in its place.
    pub fn register(&mut self, value: &Value) -> RenderResult<String> {
        match self.mode {
            RenderMode::Inline => inline_literal(value),
            RenderMode::Placeholder => {
                let name = self.next_name();
                tracing::trace!("bound literal {} as :{}", value.type_name(), name);
                self.params.insert(name.clone(), value.clone());
                Ok(format!(":{}", name))
            }
        }
    }

    /// Resolve a named parameter declared in the query model.
    ///
    /// The supplied mapping wins over a value embedded in the node.
    pub fn bind_named(&mut self, name: &str, embedded: Option<&Value>) -> RenderResult<String> {
        let value = self
            .supplied
            .and_then(|supplied| supplied.get(name))
            .or(embedded)
            .ok_or_else(|| RenderError::MissingParameterBinding(name.to_string()))?;

        if !self.params.contains_key(name) {
            self.params.insert(name.to_string(), value.clone());
        }
        Ok(format!(":{}", name))
    }

    /// Parameters collected so far, in first-reference order.
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn into_params(self) -> Params {
        self.params
    }

    fn next_name(&mut self) -> String {
        loop {
            let name = format!("{}{}", GENERATED_PREFIX, self.next_ordinal);
            self.next_ordinal += 1;
            if !self.reserved.contains(&name) && !self.params.contains_key(&name) {
                return name;
            }
        }
    }
}

/// Textual literal for `value`, or `UnsupportedValue` if it has none.
pub fn inline_literal(value: &Value) -> RenderResult<String> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Bool(true) => Ok("TRUE".to_string()),
        Value::Bool(false) => Ok("FALSE".to_string()),
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(f) if f.is_finite() => {
            let text = f.to_string();
            if text.contains('.') {
                Ok(text)
            } else {
                Ok(format!("{}.0", text))
            }
        }
        Value::Float(f) => Err(RenderError::value(format!(
            "non-finite float {} has no literal form",
            f
        ))),
        Value::String(s) => Ok(quote(s)),
        Value::Date(d) => Ok(format!("{{d {}}}", quote(&d.format("%Y-%m-%d").to_string()))),
        Value::Time(t) if t.nanosecond() != 0 => Err(RenderError::value(format!(
            "time {} has fractional seconds; the time literal only holds hh:mm:ss",
            t
        ))),
        Value::Time(t) => Ok(format!("{{t {}}}", quote(&t.format("%H:%M:%S").to_string()))),
        Value::Timestamp(ts) => Ok(format!(
            "{{ts {}}}",
            quote(&ts.format("%Y-%m-%d %H:%M:%S%.f").to_string())
        )),
        Value::Enum {
            type_name,
            constant,
        } => {
            if type_name.is_empty() || constant.is_empty() {
                return Err(RenderError::value("enum literal needs a type and a constant"));
            }
            Ok(format!("{}.{}", type_name, constant))
        }
        Value::Bytes(bytes) => Err(RenderError::value(format!(
            "binary value ({} bytes) cannot be inlined; bind it as a parameter",
            bytes.len()
        ))),
    }
}

/// Single-quote a string literal, doubling embedded quotes.
pub fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inline_literals() {
        assert_eq!(inline_literal(&Value::from("Foo")).unwrap(), "'Foo'");
        assert_eq!(inline_literal(&Value::from("O'Hara")).unwrap(), "'O''Hara'");
        assert_eq!(inline_literal(&Value::Int(18)).unwrap(), "18");
        assert_eq!(inline_literal(&Value::Float(2.0)).unwrap(), "2.0");
        assert_eq!(inline_literal(&Value::Float(2.5)).unwrap(), "2.5");
        assert_eq!(inline_literal(&Value::Bool(true)).unwrap(), "TRUE");
        assert_eq!(inline_literal(&Value::Null).unwrap(), "NULL");
    }

    #[test]
    fn test_inline_temporal_literals() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(inline_literal(&date.into()).unwrap(), "{d '2024-01-31'}");

        let ts = date.and_hms_opt(12, 30, 0).unwrap();
        assert_eq!(inline_literal(&ts.into()).unwrap(), "{ts '2024-01-31 12:30:00'}");
    }

    #[test]
    fn test_unrepresentable_inline_values() {
        assert!(matches!(
            inline_literal(&Value::Float(f64::NAN)),
            Err(RenderError::UnsupportedValue(_))
        ));
        assert!(matches!(
            inline_literal(&Value::Bytes(vec![1, 2])),
            Err(RenderError::UnsupportedValue(_))
        ));

        let time = NaiveTime::from_hms_milli_opt(9, 15, 0, 250).unwrap();
        assert!(matches!(
            inline_literal(&time.into()),
            Err(RenderError::UnsupportedValue(_))
        ));
        let whole = NaiveTime::from_hms_opt(9, 15, 0).unwrap();
        assert_eq!(inline_literal(&whole.into()).unwrap(), "{t '09:15:00'}");
    }

    #[test]
    fn test_placeholder_names_are_ordinal() {
        let mut resolver = ParamResolver::new(RenderMode::Placeholder);
        assert_eq!(resolver.register(&Value::from("a")).unwrap(), ":param1");
        assert_eq!(resolver.register(&Value::from("a")).unwrap(), ":param2");

        let params = resolver.into_params();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get_index(0), Some((&"param1".to_string(), &Value::from("a"))));
    }

    #[test]
    fn test_generated_names_skip_reserved() {
        let mut supplied = Params::new();
        supplied.insert("param1".to_string(), Value::Int(1));

        let mut resolver = ParamResolver::with_supplied(RenderMode::Placeholder, &supplied);
        resolver.reserve("param2");
        assert_eq!(resolver.register(&Value::Int(7)).unwrap(), ":param3");
    }

    #[test]
    fn test_named_binding() {
        let mut supplied = Params::new();
        supplied.insert("isbn".to_string(), Value::from("123"));
        supplied.insert("unused".to_string(), Value::Int(0));

        let mut resolver = ParamResolver::with_supplied(RenderMode::Inline, &supplied);
        assert_eq!(resolver.bind_named("isbn", Some(&Value::from("x"))).unwrap(), ":isbn");
        assert_eq!(resolver.bind_named("isbn", None).unwrap(), ":isbn");
        assert_eq!(resolver.bind_named("title", Some(&Value::from("T"))).unwrap(), ":title");

        let err = resolver.bind_named("missing", None).unwrap_err();
        assert!(matches!(err, RenderError::MissingParameterBinding(name) if name == "missing"));

        let params = resolver.into_params();
        assert_eq!(params.len(), 2);
        assert_eq!(params["isbn"], Value::from("123"));
        assert_eq!(params["title"], Value::from("T"));
    }
}
