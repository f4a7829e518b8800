use crate::domain::property_value::{PropertyValue, ValueType};
use thiserror::Error;

/// The text did not contain a value of the declared type. `value` is what gets published anyway.
#[derive(Error, Debug, PartialEq)]
#[error("'{text}' is not a valid {value_type}, using {value}")]
pub struct CoercionAnomaly {
    pub text: String,
    pub value_type: ValueType,
    pub value: PropertyValue,
}

impl CoercionAnomaly {
    pub fn into_value(self) -> PropertyValue {
        self.value
    }
}

pub fn coerce(text: &str, value_type: ValueType) -> Result<PropertyValue, CoercionAnomaly> {
    match value_type {
        ValueType::String => Ok(PropertyValue::String(text.to_string())),
        // Any non-empty text is true, "false" included
        ValueType::Boolean => Ok(PropertyValue::Boolean(!text.is_empty())),
        ValueType::Number => match parse_float_prefix(text) {
            Some(value) => Ok(PropertyValue::Number(value)),
            None => Err(anomaly(text, value_type)),
        },
        ValueType::Integer => match parse_integer_prefix(text) {
            Some(value) => Ok(value),
            None => Err(anomaly(text, value_type)),
        },
    }
}

fn anomaly(text: &str, value_type: ValueType) -> CoercionAnomaly {
    CoercionAnomaly {
        text: text.to_string(),
        value_type,
        value: PropertyValue::Number(f64::NAN),
    }
}

/// Parses the longest leading decimal number, ignoring whatever follows it.
fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = sign_len(bytes);

    if text[end..].starts_with("Infinity") {
        return text[..end + "Infinity".len()].parse::<f64>().ok();
    }

    let integer_digits = digits_len(&bytes[end..]);
    end += integer_digits;

    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = digits_len(&bytes[end + 1..]);
        if integer_digits > 0 || fraction_digits > 0 {
            end += 1 + fraction_digits;
        }
    }

    if integer_digits == 0 && fraction_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exponent_sign = sign_len(&bytes[end + 1..]);
        let exponent_digits = digits_len(&bytes[end + 1 + exponent_sign..]);
        if exponent_digits > 0 {
            end += 1 + exponent_sign + exponent_digits;
        }
    }

    text[..end].parse::<f64>().ok()
}

/// Parses leading base-10 digits. Prefixes beyond the i64 range become a `Number`.
fn parse_integer_prefix(text: &str) -> Option<PropertyValue> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let sign = sign_len(bytes);
    let digits = digits_len(&bytes[sign..]);

    if digits == 0 {
        return None;
    }

    let prefix = &text[..sign + digits];
    match prefix.parse::<i64>() {
        Ok(value) => Some(PropertyValue::Integer(value)),
        Err(_) => prefix.parse::<f64>().ok().map(PropertyValue::Number),
    }
}

fn sign_len(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(b'+' | b'-') => 1,
        _ => 0,
    }
}

fn digits_len(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("", "")]
    #[case("hello", "hello")]
    #[case(" 42 \n", " 42 \n")]
    fn string_passes_text_through(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(coerce(text, ValueType::String), Ok(PropertyValue::String(expected.to_string())));
    }

    #[rstest]
    #[case("", false)]
    #[case("true", true)]
    #[case("false", true)]
    #[case("0", true)]
    #[case(" ", true)]
    fn boolean_is_true_for_any_non_empty_text(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(coerce(text, ValueType::Boolean), Ok(PropertyValue::Boolean(expected)));
    }

    #[rstest]
    #[case("3.14", 3.14)]
    #[case("  -2.5e3", -2500.0)]
    #[case("42", 42.0)]
    #[case(".5", 0.5)]
    #[case("5.", 5.0)]
    #[case("1e", 1.0)]
    #[case("12.5 °C", 12.5)]
    #[case("+7", 7.0)]
    #[case("-Infinity", f64::NEG_INFINITY)]
    fn number_parses_the_leading_float(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(coerce(text, ValueType::Number), Ok(PropertyValue::Number(expected)));
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case(".")]
    #[case("-")]
    fn number_without_digits_is_not_a_number(#[case] text: &str) {
        let anomaly = coerce(text, ValueType::Number).unwrap_err();

        assert_eq!(anomaly.text, text);
        assert!(anomaly.into_value().is_nan());
    }

    #[rstest]
    #[case("42abc", 42)]
    #[case("100", 100)]
    #[case("  -17", -17)]
    #[case("3.99", 3)]
    #[case("+8 items", 8)]
    fn integer_parses_the_leading_digits(#[case] text: &str, #[case] expected: i64) {
        assert_eq!(coerce(text, ValueType::Integer), Ok(PropertyValue::Integer(expected)));
    }

    #[test]
    fn integer_beyond_range_becomes_a_number() {
        assert_eq!(coerce("99999999999999999999", ValueType::Integer), Ok(PropertyValue::Number(1e20)));
    }

    #[rstest]
    #[case("")]
    #[case("abc42")]
    #[case("-")]
    fn integer_without_digits_is_not_a_number(#[case] text: &str) {
        let anomaly = coerce(text, ValueType::Integer).unwrap_err();

        assert_eq!(anomaly.value_type, ValueType::Integer);
        assert!(anomaly.into_value().is_nan());
    }
}
