//! Host keys: the per-domain index for stored scripts.

use std::fmt;

/// Key used to index stored scripts.
///
/// URLs are normalised down to their host so that every path and port on the
/// same domain shares one script. The `url` crate already lowercases hosts and
/// punycode-encodes IDNs; we additionally drop a single trailing dot so
/// `example.com.` and `example.com` resolve to the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostKey(String);

impl HostKey {
    /// Derive a host key from page URL text.
    ///
    /// Returns `None` when the text is not an absolute URL or the URL carries
    /// no host (`mailto:`, `file:///`, `data:` ...). That is not an error:
    /// callers treat it as "persistence disabled".
    pub fn from_url(url: &str) -> Option<Self> {
        let parsed = url::Url::parse(url).ok()?;
        Self::normalize(parsed.host_str()?)
    }

    /// Parse from persisted string key.
    pub fn from_string_key(s: &str) -> Option<Self> {
        Self::normalize(s)
    }

    /// String form for persistence.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn normalize(host: &str) -> Option<Self> {
        let host = host.strip_suffix('.').unwrap_or(host);
        if host.is_empty() {
            return None;
        }
        Some(Self(host.to_ascii_lowercase()))
    }
}

impl fmt::Display for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}
