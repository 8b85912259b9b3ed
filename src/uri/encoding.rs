//! RFC 3986 percent-encoding of URI components.

use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters encoded by [`encode`].
///
/// Everything except unreserved characters (`a-zA-Z0-9_-.~`),
/// general delimiters (`:/?#[]@`) and sub-delimiters (`!$&'()*+,;=`).
/// `%` stays in the set; valid `%XX` escapes are skipped separately.
pub const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    // unreserved
    .remove(b'_')
    .remove(b'-')
    .remove(b'.')
    .remove(b'~')
    // gen-delims
    .remove(b':')
    .remove(b'/')
    .remove(b'?')
    .remove(b'#')
    .remove(b'[')
    .remove(b']')
    .remove(b'@')
    // sub-delims
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

/// Percent-encode `value`, leaving URI service characters alone.
///
/// Already valid `%XX` escapes are copied unchanged, so the operation is
/// idempotent.
#[inline]
pub fn encode(value: &str) -> String {
    encode_with(value, COMPONENT)
}

/// Percent-encode every character of `value` contained in `set`.
///
/// Non-ASCII characters are always encoded as their UTF-8 bytes. A `%` that
/// starts a valid escape is never touched.
pub fn encode_with(value: &str, set: &'static AsciiSet) -> String {
    let bytes = value.as_bytes();
    let mut out = String::with_capacity(value.len());
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && bytes[i + 1].is_ascii_hexdigit()
            && bytes[i + 2].is_ascii_hexdigit()
        {
            out.extend(utf8_percent_encode(&value[start..i], set));
            out.push_str(&value[i..i + 3]);
            i += 3;
            start = i;
        } else {
            i += 1;
        }
    }
    out.extend(utf8_percent_encode(&value[start..], set));

    out
}

/// Decode every `%XX` escape in `value`.
///
/// Never fails: byte sequences that are not valid UTF-8 after decoding are
/// replaced with U+FFFD.
#[inline]
pub fn decode(value: &str) -> Cow<'_, str> {
    percent_decode_str(value).decode_utf8_lossy()
}
