//! Input decoding utilities.

use std::borrow::Cow;

/// Decode bytes to a string, handling legacy encodings.
///
/// Tries UTF-8 first (a BOM is handled automatically via encoding_rs) and
/// falls back to Windows-1252, which is what most mislabeled HTML in the
/// wild actually is.
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    let (result, _encoding, _malformed) = encoding_rs::WINDOWS_1252.decode(bytes);
    Cow::Owned(result.into_owned())
}
