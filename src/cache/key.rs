//! Cache key derivation.

/// Derive the cache key for a `(source, language)` pair.
///
/// A 32-bit rolling polynomial hash (`h * 31 + unit`, wrapping) over the
/// UTF-16 code units of `source` followed by `language`, rendered as a signed
/// decimal string. Not collision resistant; identical inputs always produce
/// the identical key.
pub fn cache_key(source: &str, language: &str) -> String {
    source
        .encode_utf16()
        .chain(language.encode_utf16())
        .fold(0i32, |hash, unit| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit))
        })
        .to_string()
}
