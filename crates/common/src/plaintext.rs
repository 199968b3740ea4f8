//! Scalar plaintext values and their wire type tags.
//!
//! A [`Plaintext`] is one leaf value of a structured document. The set of
//! kinds is closed: every encode and decode path matches on [`Kind`]
//! exhaustively, so adding a kind is a compile error until every codec
//! handles it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CipherError;

/// Type tag carried in the `type:` field of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// UTF-8 string, tag `str`.
    Str,
    /// Signed 64-bit integer, tag `int`.
    Int,
    /// 64-bit float, tag `float`.
    Float,
    /// Boolean, tag `bool`.
    Bool,
    /// Document comment text, tag `comment`.
    Comment,
    /// Raw bytes, tag `bytes`. Decrypt only.
    Bytes,
}

impl Kind {
    /// The tag as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Str => "str",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Bool => "bool",
            Kind::Comment => "comment",
            Kind::Bytes => "bytes",
        }
    }

    /// Whether values of this kind may be encrypted.
    ///
    /// `bytes` is a legacy tag that is only ever read.
    pub fn is_encryptable(self) -> bool {
        !matches!(self, Kind::Bytes)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "str" => Ok(Kind::Str),
            "int" => Ok(Kind::Int),
            "float" => Ok(Kind::Float),
            "bool" => Ok(Kind::Bool),
            "comment" => Ok(Kind::Comment),
            "bytes" => Ok(Kind::Bytes),
            other => Err(CipherError::UnsupportedType(format!(
                "unknown type tag {other:?}"
            ))),
        }
    }
}

/// A single typed scalar, the unit the cipher encrypts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Plaintext {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Comment(String),
    Bytes(Vec<u8>),
}

impl Plaintext {
    /// Construct a comment value.
    pub fn comment(text: impl Into<String>) -> Self {
        Plaintext::Comment(text.into())
    }

    /// The discriminant of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Plaintext::Str(_) => Kind::Str,
            Plaintext::Int(_) => Kind::Int,
            Plaintext::Float(_) => Kind::Float,
            Plaintext::Bool(_) => Kind::Bool,
            Plaintext::Comment(_) => Kind::Comment,
            Plaintext::Bytes(_) => Kind::Bytes,
        }
    }

    /// Whether the value is semantically absent and skips encryption.
    ///
    /// Only the empty string, integer zero and float zero are empty. `false`
    /// is a real value, and comments and bytes always go through the codec.
    pub fn is_empty(&self) -> bool {
        match self {
            Plaintext::Str(s) => s.is_empty(),
            Plaintext::Int(i) => *i == 0,
            Plaintext::Float(f) => *f == 0.0,
            Plaintext::Bool(_) | Plaintext::Comment(_) | Plaintext::Bytes(_) => false,
        }
    }
}

impl From<&str> for Plaintext {
    fn from(value: &str) -> Self {
        Plaintext::Str(value.to_owned())
    }
}

impl From<String> for Plaintext {
    fn from(value: String) -> Self {
        Plaintext::Str(value)
    }
}

impl From<i64> for Plaintext {
    fn from(value: i64) -> Self {
        Plaintext::Int(value)
    }
}

impl From<i32> for Plaintext {
    fn from(value: i32) -> Self {
        Plaintext::Int(i64::from(value))
    }
}

impl From<f64> for Plaintext {
    fn from(value: f64) -> Self {
        Plaintext::Float(value)
    }
}

impl From<bool> for Plaintext {
    fn from(value: bool) -> Self {
        Plaintext::Bool(value)
    }
}

impl TryFrom<&serde_json::Value> for Plaintext {
    type Error = CipherError;

    /// Convert a scalar JSON leaf into a plaintext.
    ///
    /// Integers that fit in an `i64` become [`Plaintext::Int`] and
    /// fractional numbers become [`Plaintext::Float`]. Larger integers are
    /// rejected rather than rounded to a float.
    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::String(s) => Ok(Plaintext::Str(s.clone())),
            serde_json::Value::Bool(b) => Ok(Plaintext::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Plaintext::Int(i))
                } else if n.is_f64() {
                    n.as_f64()
                        .map(Plaintext::Float)
                        .ok_or_else(|| CipherError::UnsupportedType(format!("number {n}")))
                } else {
                    Err(CipherError::UnsupportedType(format!(
                        "integer {n} out of i64 range"
                    )))
                }
            }
            serde_json::Value::Null => Err(CipherError::UnsupportedType("null".into())),
            serde_json::Value::Array(_) => Err(CipherError::UnsupportedType("array".into())),
            serde_json::Value::Object(_) => Err(CipherError::UnsupportedType("object".into())),
        }
    }
}

impl From<Plaintext> for serde_json::Value {
    fn from(value: Plaintext) -> Self {
        match value {
            Plaintext::Str(s) | Plaintext::Comment(s) => serde_json::Value::String(s),
            Plaintext::Int(i) => serde_json::Value::from(i),
            // Non-finite floats have no JSON form and map to null.
            Plaintext::Float(f) => serde_json::Value::from(f),
            Plaintext::Bool(b) => serde_json::Value::Bool(b),
            Plaintext::Bytes(b) => serde_json::Value::from(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_tags_round_trip() {
        for kind in [
            Kind::Str,
            Kind::Int,
            Kind::Float,
            Kind::Bool,
            Kind::Comment,
            Kind::Bytes,
        ] {
            assert_eq!(kind.as_str().parse::<Kind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_tag_is_unsupported() {
        let err = "yaml".parse::<Kind>().unwrap_err();
        assert!(matches!(err, CipherError::UnsupportedType(_)));
        // Tags are case-sensitive.
        assert!("STR".parse::<Kind>().is_err());
    }

    #[test]
    fn only_bytes_is_decrypt_only() {
        assert!(!Kind::Bytes.is_encryptable());
        assert!(Kind::Comment.is_encryptable());
        assert!(Kind::Str.is_encryptable());
    }

    #[test]
    fn emptiness_rule() {
        assert!(Plaintext::from("").is_empty());
        assert!(Plaintext::from(0i64).is_empty());
        assert!(Plaintext::from(0.0).is_empty());
        assert!(Plaintext::from(-0.0).is_empty());

        assert!(!Plaintext::from(false).is_empty());
        assert!(!Plaintext::from(true).is_empty());
        assert!(!Plaintext::from(" ").is_empty());
        assert!(!Plaintext::from(-1i64).is_empty());
        assert!(!Plaintext::from(f64::NAN).is_empty());
        assert!(!Plaintext::comment("").is_empty());
        assert!(!Plaintext::Bytes(Vec::new()).is_empty());
    }

    #[test]
    fn json_scalars_convert() {
        assert_eq!(
            Plaintext::try_from(&json!("x")).unwrap(),
            Plaintext::Str("x".into())
        );
        assert_eq!(Plaintext::try_from(&json!(7)).unwrap(), Plaintext::Int(7));
        assert_eq!(
            Plaintext::try_from(&json!(2.5)).unwrap(),
            Plaintext::Float(2.5)
        );
        assert_eq!(
            Plaintext::try_from(&json!(2.0)).unwrap(),
            Plaintext::Float(2.0)
        );
        assert_eq!(
            Plaintext::try_from(&json!(true)).unwrap(),
            Plaintext::Bool(true)
        );
    }

    #[test]
    fn json_integers_beyond_i64_are_rejected() {
        assert_eq!(
            Plaintext::try_from(&json!(i64::MAX)).unwrap(),
            Plaintext::Int(i64::MAX)
        );
        for v in [json!(u64::MAX), json!(i64::MAX as u64 + 1)] {
            match Plaintext::try_from(&v) {
                Err(CipherError::UnsupportedType(msg)) => {
                    assert!(msg.contains("out of i64 range"), "{msg}")
                }
                other => panic!("expected UnsupportedType, got {other:?}"),
            }
        }
    }

    #[test]
    fn json_containers_are_unsupported() {
        for v in [json!(null), json!([1, 2]), json!({"a": 1})] {
            assert!(matches!(
                Plaintext::try_from(&v),
                Err(CipherError::UnsupportedType(_))
            ));
        }
    }

    #[test]
    fn plaintext_into_json() {
        assert_eq!(serde_json::Value::from(Plaintext::Int(-3)), json!(-3));
        assert_eq!(
            serde_json::Value::from(Plaintext::comment("note")),
            json!("note")
        );
        assert_eq!(
            serde_json::Value::from(Plaintext::Bytes(vec![0, 255])),
            json!([0, 255])
        );
        assert_eq!(
            serde_json::Value::from(Plaintext::Float(f64::INFINITY)),
            serde_json::Value::Null
        );
    }

    #[test]
    fn serde_representation() {
        let v = Plaintext::Bool(true);
        let s = serde_json::to_string(&v).unwrap();
        assert_eq!(s, r#"{"type":"bool","value":true}"#);
        let decoded: Plaintext = serde_json::from_str(&s).unwrap();
        assert_eq!(decoded, v);
    }
}
