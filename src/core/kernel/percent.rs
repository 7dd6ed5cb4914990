//! Percent encoding and canonical parameter ordering for request signing.
//!
//! The upstream protocol requires RFC 3986 percent encoding with the
//! unreserved set (letters, digits, `-._~`) and uppercase hex escapes, and a
//! deterministic parameter ordering: entries sorted by encoded key, then by
//! encoded value.

const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

/// Percent-encode a raw string, escaping every byte outside the unreserved
/// set as uppercase `%XX`.
///
/// Values must be encoded exactly once; passing an already-encoded string is
/// a caller error and is not detected here.
pub fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if is_unreserved(byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push(UPPER_HEX[(byte >> 4) as usize] as char);
            out.push(UPPER_HEX[(byte & 0x0f) as usize] as char);
        }
    }
    out
}

/// A set of request parameters held in percent-encoded form.
///
/// Keys and values are encoded on insertion, so every downstream rendering
/// (signature base string, authorization header, query string) works on the
/// same canonical bytes.
#[derive(Debug, Clone, Default)]
pub struct EncodedParams {
    entries: Vec<(String, String)>,
}

impl EncodedParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an iterator of raw key/value pairs.
    pub fn from_raw<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.set(key.as_ref(), value.as_ref());
        }
        params
    }

    /// Insert a raw key/value pair, encoding both.
    ///
    /// Duplicate keys are kept as independent entries rather than collapsed;
    /// the canonical ordering makes the result deterministic either way.
    pub fn set(&mut self, key: &str, value: &str) {
        self.entries.push((percent_encode(key), percent_encode(value)));
    }

    /// Merge another parameter set into this one, keeping all entries.
    pub fn extend(&mut self, other: &EncodedParams) {
        self.entries.extend(other.entries.iter().cloned());
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the canonical joined form: entries sorted by encoded key then
    /// encoded value, `key=value`, joined by `separator`. With `quoted`, each
    /// value is wrapped in double quotes (authorization header mode).
    pub fn encode(&self, separator: &str, quoted: bool) -> String {
        let mut sorted = self.entries.clone();
        sorted.sort();
        sorted
            .iter()
            .map(|(key, value)| {
                if quoted {
                    format!("{}=\"{}\"", key, value)
                } else {
                    format!("{}={}", key, value)
                }
            })
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Query-string form: `k1=v1&k2=v2`, sorted, unquoted.
    pub fn to_query_string(&self) -> String {
        self.encode("&", false)
    }

    /// Authorization-header form: `k1="v1", k2="v2"`, sorted, quoted.
    pub fn to_header_string(&self) -> String {
        self.encode(", ", true)
    }
}
