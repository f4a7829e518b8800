use serde::Deserialize;
use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    String,
    Number,
    Integer,
    Boolean,
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueType::String => "string",
            ValueType::Number => "number",
            ValueType::Integer => "integer",
            ValueType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// A coerced property value. `Number(NaN)` is the not-a-number marker.
#[derive(Clone, PartialEq, Debug)]
pub enum PropertyValue {
    String(String),
    Number(f64),
    Integer(i64),
    Boolean(bool),
}

impl PropertyValue {
    pub fn is_nan(&self) -> bool {
        matches!(self, PropertyValue::Number(n) if n.is_nan())
    }
}

impl Display for PropertyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::String(value) => write!(f, "'{}'", value),
            PropertyValue::Number(value) => write!(f, "{}", value),
            PropertyValue::Integer(value) => write!(f, "{}", value),
            PropertyValue::Boolean(value) => write!(f, "{}", value),
        }
    }
}
