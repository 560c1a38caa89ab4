//! Canonical CBOR encoding of field maps.
//!
//! Field maps are `BTreeMap`-backed, so keys are always emitted in sorted
//! order and identical documents produce identical bytes.

use crate::error::{CodecError, CodecResult};
use crate::fields::Fields;

/// Encode a field map to CBOR bytes.
///
/// # Errors
///
/// Returns [`CodecError::EncodingFailed`] if the writer fails.
pub fn to_cbor(fields: &Fields) -> CodecResult<Vec<u8>> {
    let mut buffer = Vec::new();
    ciborium::ser::into_writer(fields, &mut buffer)
        .map_err(|e| CodecError::encoding_failed(format!("{e:?}")))?;
    Ok(buffer)
}

/// Decode a field map from CBOR bytes.
///
/// # Errors
///
/// Returns [`CodecError::DecodingFailed`] if the bytes are not a CBOR map
/// of document values.
pub fn from_cbor(bytes: &[u8]) -> CodecResult<Fields> {
    ciborium::de::from_reader(bytes).map_err(|e| CodecError::decoding_failed(format!("{e:?}")))
}
