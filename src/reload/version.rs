//! Version tokens for rendered documents.
//!
//! A token is the blake3 fingerprint of the rendered HTML, so rendering the
//! same content twice yields the same token and any visible change yields a
//! new one.

use std::fmt;

/// Fingerprint of one rendered HTML fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version([u8; 32]);

impl Version {
    /// Hex characters shown to clients.
    const TOKEN_LEN: usize = 16;

    /// Fingerprint `html`.
    pub fn of(html: &str) -> Self {
        Self(*blake3::hash(html.as_bytes()).as_bytes())
    }

    /// Full hex digest.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Short token served on `/ping`.
    pub fn token(self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(Self::TOKEN_LEN);
        hex
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_html_same_version() {
        let a = Version::of("<h1 id=\"hello\">Hello</h1>\n");
        let b = Version::of("<h1 id=\"hello\">Hello</h1>\n");
        assert_eq!(a, b);
        assert_eq!(a.token(), b.token());
    }

    #[test]
    fn test_different_html_different_version() {
        let a = Version::of("<h1>Hello</h1>");
        let b = Version::of("<h1>Goodbye</h1>");
        assert_ne!(a, b);
        assert_ne!(a.token(), b.token());
    }

    #[test]
    fn test_token_shape() {
        let token = Version::of("").token();
        assert_eq!(token.len(), 16);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(Version::of("").to_string(), token);
        assert!(Version::of("").to_hex().starts_with(&token));
    }
}
