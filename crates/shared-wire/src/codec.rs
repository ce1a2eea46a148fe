//! # Wire Codec
//!
//! Converts domain objects to and from self-describing wire values.
//!
//! ## Contract
//!
//! - `encode` produces a JSON field-mapping object; encoding a value whose
//!   serialized form is not an object (a bare string, a number, an array)
//!   is a contract violation reported before anything touches the bus.
//! - `decode` is total over the declared field set of each domain type:
//!   absent fields take their defaults, unknown fields are ignored. Only a
//!   type-level mismatch on a present field is an error.
//! - `decode(encode(x))` preserves every declared field of `x`.

use crate::WireValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors from encoding a domain object to a wire value.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The value serialized to something other than a field-mapping object.
    #[error("encoded value is not a field-mapping object (got {kind})")]
    NotAnObject { kind: &'static str },

    /// Serialization itself failed (non-string map key, unserializable type).
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors from decoding a wire value into a domain object.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A present field did not match the declared type.
    #[error("deserialization failed: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// Encode a domain object into a wire value.
///
/// # Errors
///
/// - `EncodeError::NotAnObject` if the serialized form is not a JSON object
/// - `EncodeError::Serialize` if serialization fails outright
pub fn encode<T: Serialize>(value: &T) -> Result<WireValue, EncodeError> {
    let wire = serde_json::to_value(value)?;
    if wire.is_object() {
        Ok(wire)
    } else {
        Err(EncodeError::NotAnObject {
            kind: json_kind(&wire),
        })
    }
}

/// Decode a wire value into a domain object.
///
/// Domain types declare `#[serde(default)]`, so absent fields take defaults
/// and unknown fields are skipped; decoding only fails on a type mismatch.
///
/// # Errors
///
/// - `DecodeError::Deserialize` if a present field has the wrong type
pub fn decode<T: DeserializeOwned>(wire: &WireValue) -> Result<T, DecodeError> {
    Ok(serde_json::from_value(wire.clone())?)
}

/// Human-readable kind of a JSON value, for error reporting.
fn json_kind(value: &WireValue) -> &'static str {
    match value {
        WireValue::Null => "null",
        WireValue::Bool(_) => "bool",
        WireValue::Number(_) => "number",
        WireValue::String(_) => "string",
        WireValue::Array(_) => "array",
        WireValue::Object(_) => "object",
    }
}
