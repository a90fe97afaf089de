//! Casting raw tokens to typed values.
//!
//! Booleans never pass through here; flags are resolved from their spelling.
//! Defaults bypass casting as they are already typed.

use argmodel_core::{Value, ValueType};

/// Why a raw token could not be cast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastError {
    /// Text is not a valid value of the named type.
    Mismatch { expected: String },
    /// Text is not one of the allowed choices.
    NotAChoice { choices: Vec<String> },
}

/// Casts one raw token for a field of `value_type`.
///
/// Lists and optionals cast with their element type; the caller decides how
/// the element is stored.
///
/// # Examples
///
/// ```
/// use argmodel_core::{Value, ValueType};
/// use argmodel_parser::cast::{CastError, cast};
///
/// assert_eq!(cast(&ValueType::Integer, "3"), Ok(Value::Integer(3)));
/// assert_eq!(cast(&ValueType::Text, "alex"), Ok(Value::Text("alex".into())));
/// assert!(matches!(
///     cast(&ValueType::choice(["a", "b"]), "c"),
///     Err(CastError::NotAChoice { .. })
/// ));
/// ```
pub fn cast(value_type: &ValueType, raw: &str) -> Result<Value, CastError> {
    match value_type {
        ValueType::Text => Ok(Value::Text(raw.to_string())),
        ValueType::Integer => raw
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| mismatch(value_type)),
        ValueType::Float => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| mismatch(value_type)),
        ValueType::Choice(options) => {
            if options.iter().any(|option| option == raw) {
                Ok(Value::Text(raw.to_string()))
            } else {
                Err(CastError::NotAChoice {
                    choices: options.clone(),
                })
            }
        }
        ValueType::List(element) | ValueType::Optional(element) => cast(element, raw),
        ValueType::Bool | ValueType::Union(_) => Err(mismatch(value_type)),
    }
}

fn mismatch(value_type: &ValueType) -> CastError {
    CastError::Mismatch {
        expected: value_type.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_numbers() {
        assert_eq!(cast(&ValueType::Integer, "-12"), Ok(Value::Integer(-12)));
        assert_eq!(cast(&ValueType::Float, "2.5"), Ok(Value::Float(2.5)));
        assert_eq!(cast(&ValueType::Float, "3"), Ok(Value::Float(3.0)));
    }

    #[test]
    fn test_cast_rejects_non_numeric() {
        assert_eq!(
            cast(&ValueType::Integer, "eleven"),
            Err(CastError::Mismatch {
                expected: "integer".to_string()
            })
        );
        assert_eq!(
            cast(&ValueType::Integer, "2.5"),
            Err(CastError::Mismatch {
                expected: "integer".to_string()
            })
        );
        assert!(cast(&ValueType::Float, "abc").is_err());
    }

    #[test]
    fn test_cast_choice_membership() {
        let choice = ValueType::choice(["option1", "option2"]);
        assert_eq!(cast(&choice, "option2"), Ok(Value::Text("option2".into())));
        assert_eq!(
            cast(&choice, "Option2"),
            Err(CastError::NotAChoice {
                choices: vec!["option1".to_string(), "option2".to_string()]
            })
        );
    }

    #[test]
    fn test_cast_wrapped_types_use_element() {
        assert_eq!(
            cast(&ValueType::list(ValueType::Integer), "10"),
            Ok(Value::Integer(10))
        );
        assert_eq!(
            cast(&ValueType::optional(ValueType::Integer), "10"),
            Ok(Value::Integer(10))
        );
    }

    #[test]
    fn test_cast_never_reads_bool_from_text() {
        assert!(cast(&ValueType::Bool, "true").is_err());
    }
}
