use std::fmt;

use thiserror::Error;

/// Errors raised while reading typed attribute values.
#[derive(Debug, Error)]
pub enum AttributeError {
    /// A numeric payload inside an attribute string could not be parsed.
    #[error("attribute `{key}` has a malformed numeric payload: {reason}")]
    Malformed {
        /// Attribute key whose value failed to parse.
        key: String,
        /// Description of the parse failure.
        reason: String,
    },
}

impl AttributeError {
    pub(crate) fn malformed(key: &str, reason: impl fmt::Display) -> Self {
        Self::Malformed {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Closed value type for record-level and per-sample attributes.
///
/// Upstream producers encode numbers either natively or as literal strings
/// (e.g. the per-sample strand table `"4,2,3,1"`), so the typed accessors
/// come in two flavours: plain accessors returning `Option`, and
/// parse-capable converters returning `Result` that treat a malformed
/// numeric string as a fatal error for the record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeValue {
    /// A single integer.
    Int(i64),
    /// A single float.
    Float(f64),
    /// A literal string (possibly encoding a numeric list).
    String(String),
    /// A list of integers.
    IntList(Vec<i64>),
    /// A list of floats.
    FloatList(Vec<f64>),
}

impl AttributeValue {
    /// The value as an integer, without parsing strings.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as a float, accepting integer payloads.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as an integer list, without parsing strings.
    pub fn as_int_list(&self) -> Option<&[i64]> {
        match self {
            Self::IntList(v) => Some(v),
            _ => None,
        }
    }

    /// Convert to a float, parsing string payloads. Malformed numeric
    /// strings are fatal for the record being processed.
    pub fn to_f64(&self, key: &str) -> Result<f64, AttributeError> {
        match self {
            Self::Int(v) => Ok(*v as f64),
            Self::Float(v) => Ok(*v),
            Self::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| AttributeError::malformed(key, e)),
            other => Err(AttributeError::malformed(
                key,
                format!("expected a scalar, found {other:?}"),
            )),
        }
    }

    /// Convert to an integer, parsing string payloads.
    pub fn to_i64(&self, key: &str) -> Result<i64, AttributeError> {
        match self {
            Self::Int(v) => Ok(*v),
            Self::Float(v) => Ok(*v as i64),
            Self::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|e| AttributeError::malformed(key, e)),
            other => Err(AttributeError::malformed(
                key,
                format!("expected a scalar, found {other:?}"),
            )),
        }
    }

    /// Convert to an integer list, parsing comma-joined string payloads
    /// such as `"4,2,3,1"`.
    pub fn to_int_list(&self, key: &str) -> Result<Vec<i64>, AttributeError> {
        match self {
            Self::Int(v) => Ok(vec![*v]),
            Self::IntList(v) => Ok(v.clone()),
            Self::String(s) => s
                .split(',')
                .map(|part| {
                    part.trim()
                        .parse::<i64>()
                        .map_err(|e| AttributeError::malformed(key, e))
                })
                .collect(),
            other => Err(AttributeError::malformed(
                key,
                format!("expected an integer list, found {other:?}"),
            )),
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<i64>> for AttributeValue {
    fn from(value: Vec<i64>) -> Self {
        Self::IntList(value)
    }
}

impl From<Vec<f64>> for AttributeValue {
    fn from(value: Vec<f64>) -> Self {
        Self::FloatList(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_conversions_accept_strings() {
        assert_eq!(AttributeValue::from(3).to_f64("k").unwrap(), 3.0);
        assert_eq!(AttributeValue::from("41.5").to_f64("k").unwrap(), 41.5);
        assert_eq!(AttributeValue::from("12").to_i64("k").unwrap(), 12);
    }

    #[test]
    fn int_list_parses_comma_joined_strings() {
        let value = AttributeValue::from("1,2, 3,4");
        assert_eq!(value.to_int_list("SB").unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn malformed_numeric_strings_are_errors() {
        assert!(AttributeValue::from("1,x,3").to_int_list("SB").is_err());
        assert!(AttributeValue::from("abc").to_f64("QUALapprox").is_err());
    }
}
