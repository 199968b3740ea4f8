//! Canonical byte encoding of plaintext scalars.
//!
//! | Kind      | Bytes                                              |
//! |-----------|----------------------------------------------------|
//! | `str`     | UTF-8, unmodified                                  |
//! | `int`     | decimal ASCII, `-` for negatives                   |
//! | `float`   | shortest round-trip decimal, no exponent, no pad   |
//! | `bool`    | `True` / `False`                                   |
//! | `comment` | UTF-8 of the comment text                          |
//! | `bytes`   | raw, decode only                                   |

use common::{CipherError, Kind, Plaintext};

const TRUE_LITERAL: &str = "True";
const FALSE_LITERAL: &str = "False";

/// Serialize a plaintext to the bytes that get sealed.
///
/// # Errors
///
/// Returns [`CipherError::UnsupportedType`] for [`Plaintext::Bytes`], which
/// has no encrypt path.
pub fn encode(value: &Plaintext) -> Result<Vec<u8>, CipherError> {
    if !value.kind().is_encryptable() {
        return Err(CipherError::UnsupportedType(format!(
            "{} values can be decrypted but not encrypted",
            value.kind()
        )));
    }
    let bytes = match value {
        Plaintext::Str(s) | Plaintext::Comment(s) => s.as_bytes().to_vec(),
        Plaintext::Int(i) => i.to_string().into_bytes(),
        Plaintext::Float(f) => format_float(*f).into_bytes(),
        Plaintext::Bool(b) => {
            let literal = if *b { TRUE_LITERAL } else { FALSE_LITERAL };
            literal.as_bytes().to_vec()
        }
        Plaintext::Bytes(b) => b.clone(),
    };
    Ok(bytes)
}

/// Parse authenticated plaintext bytes according to the envelope's type tag.
///
/// # Errors
///
/// Returns [`CipherError::UnsupportedType`] for an unknown tag and
/// [`CipherError::TypeDecode`] when the bytes are not valid for the kind.
pub fn decode(type_tag: &str, bytes: Vec<u8>) -> Result<Plaintext, CipherError> {
    let kind: Kind = type_tag.parse()?;
    match kind {
        Kind::Bytes => Ok(Plaintext::Bytes(bytes)),
        Kind::Str => utf8(kind, bytes).map(Plaintext::Str),
        Kind::Comment => utf8(kind, bytes).map(Plaintext::Comment),
        Kind::Int => {
            let text = utf8(kind, bytes)?;
            text.parse::<i64>()
                .map(Plaintext::Int)
                .map_err(|e| type_decode(kind, e))
        }
        Kind::Float => {
            let text = utf8(kind, bytes)?;
            text.parse::<f64>()
                .map(Plaintext::Float)
                .map_err(|e| type_decode(kind, e))
        }
        Kind::Bool => match utf8(kind, bytes)?.as_str() {
            TRUE_LITERAL => Ok(Plaintext::Bool(true)),
            FALSE_LITERAL => Ok(Plaintext::Bool(false)),
            other => Err(type_decode(
                kind,
                format!("expected {TRUE_LITERAL} or {FALSE_LITERAL}, got {} bytes", other.len()),
            )),
        },
    }
}

/// Render a float without exponent or trailing zero padding.
///
/// Non-finite values use the `NaN`, `+Inf`, `-Inf` spellings.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_owned()
    } else if f.is_infinite() {
        let sign = if f.is_sign_positive() { '+' } else { '-' };
        format!("{sign}Inf")
    } else {
        // `Display` for f64 is the shortest round-trip form and never uses
        // scientific notation.
        f.to_string()
    }
}

fn utf8(kind: Kind, bytes: Vec<u8>) -> Result<String, CipherError> {
    String::from_utf8(bytes).map_err(|e| type_decode(kind, e.utf8_error()))
}

fn type_decode(kind: Kind, reason: impl ToString) -> CipherError {
    CipherError::TypeDecode {
        kind,
        reason: reason.to_string(),
    }
}
