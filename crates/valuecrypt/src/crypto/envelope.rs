//! The textual `ENC[...]` envelope around one encrypted value.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::CipherError;

use super::{NONCE_LEN, TAG_LEN};

/// Leading delimiter of every envelope.
pub const ENVELOPE_PREFIX: &str = "ENC[";

/// Trailing delimiter of every envelope.
pub const ENVELOPE_SUFFIX: &str = "]";

/// The only algorithm literal this format accepts.
pub const ALGORITHM: &str = "AES256_GCM";

/// A parsed encrypted value.
///
/// The string representation is
/// `ENC[AES256_GCM,data:<b64>,iv:<b64>,tag:<b64>,type:<tag>]`, with standard
/// padded base64 for the three binary fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedEnvelope {
    /// AEAD output without the trailing authentication tag.
    pub body: Vec<u8>,
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw authentication tag bytes.
    pub tag: [u8; TAG_LEN],
    /// Type tag naming how the decrypted body decodes. Not validated here.
    ///
    /// Only set by the cipher (from a [`Kind`](common::Kind)) or by parsing,
    /// so the rendered envelope always parses back.
    pub(crate) type_tag: String,
}

impl EncryptedEnvelope {
    /// The `type:` field as it appears on the wire.
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// The AEAD input for decryption: `body || tag`.
    pub fn sealed(&self) -> Vec<u8> {
        let mut sealed = Vec::with_capacity(self.body.len() + TAG_LEN);
        sealed.extend_from_slice(&self.body);
        sealed.extend_from_slice(&self.tag);
        sealed
    }
}

impl fmt::Display for EncryptedEnvelope {
    /// Always emits the fields in `data, iv, tag, type` order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{ENVELOPE_PREFIX}{ALGORITHM},data:{},iv:{},tag:{},type:{}{ENVELOPE_SUFFIX}",
            STANDARD.encode(&self.body),
            STANDARD.encode(self.nonce),
            STANDARD.encode(self.tag),
            self.type_tag,
        )
    }
}

impl FromStr for EncryptedEnvelope {
    type Err = CipherError;

    /// Parse an envelope string.
    ///
    /// The four fields may appear in any order but each must appear exactly
    /// once.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidFormat`] for bad delimiters, a foreign
    /// algorithm literal, a missing, duplicate or unknown field, invalid
    /// base64, or a nonce or tag of the wrong length.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .strip_prefix(ENVELOPE_PREFIX)
            .and_then(|rest| rest.strip_suffix(ENVELOPE_SUFFIX))
            .ok_or_else(|| invalid("missing ENC[...] delimiters"))?;

        let mut parts = inner.split(',');
        match parts.next() {
            Some(ALGORITHM) => {}
            _ => return Err(invalid("unsupported algorithm")),
        }

        let mut data = None;
        let mut iv = None;
        let mut tag = None;
        let mut type_tag = None;

        for part in parts {
            let (key, value) = part
                .split_once(':')
                .ok_or_else(|| invalid("field is not key:value"))?;
            let slot = match key {
                "data" => &mut data,
                "iv" => &mut iv,
                "tag" => &mut tag,
                "type" => &mut type_tag,
                other => return Err(invalid(format!("unknown field {other:?}"))),
            };
            if slot.replace(value).is_some() {
                return Err(invalid(format!("duplicate field {key:?}")));
            }
        }

        let data = data.ok_or_else(|| invalid("missing data field"))?;
        let iv = iv.ok_or_else(|| invalid("missing iv field"))?;
        let tag = tag.ok_or_else(|| invalid("missing tag field"))?;
        let type_tag = type_tag.ok_or_else(|| invalid("missing type field"))?;

        Ok(Self {
            body: decode_b64("data", data)?,
            nonce: decode_fixed("iv", iv)?,
            tag: decode_fixed("tag", tag)?,
            type_tag: type_tag.to_owned(),
        })
    }
}

fn decode_b64(field: &str, value: &str) -> Result<Vec<u8>, CipherError> {
    STANDARD
        .decode(value)
        .map_err(|e| invalid(format!("{field} is not valid base64: {e}")))
}

fn decode_fixed<const N: usize>(field: &str, value: &str) -> Result<[u8; N], CipherError> {
    let bytes = decode_b64(field, value)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        invalid(format!(
            "{field} must be {N} bytes, got {}",
            bytes.len()
        ))
    })
}

fn invalid(msg: impl Into<String>) -> CipherError {
    CipherError::InvalidFormat(msg.into())
}
