//! Origin handling for remote paths.
//!
//! Callers hand over whatever the scraped markup contained: sometimes a path
//! relative to the site (`/c/lethal-company/p/Owner/Name/`), sometimes an
//! absolute link (`https://thunderstore.io/package/download/...`). Relays only
//! ever forward the part after the origin.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use exn::ResultExt;
use url::{ParseError, Url};

use crate::error::{Error, ErrorKind, Result};

pub const DEFAULT_ORIGIN: &str = "https://thunderstore.io";

/// Scheme, host and port of the site being relayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    base: Url,
}
impl Origin {
    pub fn parse(origin: &str) -> Result<Self> {
        let base = Url::parse(origin).or_raise(|| ErrorKind::InvalidPath(origin.to_string()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            exn::bail!(ErrorKind::InvalidPath(origin.to_string()));
        }
        Ok(Self { base })
    }

    /// Strips this origin from `path`, returning the remainder (always
    /// starting with `/`, query string kept).
    ///
    /// # Examples
    ///
    /// ```
    /// use tmd_relay::Origin;
    /// let origin = Origin::default();
    /// assert_eq!(origin.relative("https://thunderstore.io/c/lc/p/A/B/").unwrap(), "/c/lc/p/A/B/");
    /// assert_eq!(origin.relative("c/lc/p/A/B/").unwrap(), "/c/lc/p/A/B/");
    /// assert!(origin.relative("https://example.com/c/lc/p/A/B/").is_err());
    /// assert!(origin.relative("").is_err());
    /// ```
    pub fn relative(&self, path: &str) -> Result<String> {
        let trimmed = path.trim();
        let invalid = || ErrorKind::InvalidPath(path.to_string());
        let relative = match Url::parse(trimmed) {
            Ok(url) if url.origin() == self.base.origin() => match url.query() {
                Some(query) => format!("{}?{query}", url.path()),
                None => url.path().to_string(),
            },
            Ok(_) => exn::bail!(invalid()),
            // Protocol-relative links would swap the host on join.
            Err(ParseError::RelativeUrlWithoutBase) if !trimmed.starts_with("//") => {
                match trimmed.starts_with('/') {
                    true => trimmed.to_string(),
                    false => format!("/{trimmed}"),
                }
            },
            Err(_) => exn::bail!(invalid()),
        };
        match relative.trim_start_matches('/').is_empty() {
            true => exn::bail!(invalid()),
            false => Ok(relative),
        }
    }

    /// Absolute URL for `path` on this origin.
    pub fn join(&self, path: &str) -> Result<Url> {
        let relative = self.relative(path)?;
        self.base
            .join(&relative)
            .or_raise(|| ErrorKind::InvalidPath(path.to_string()))
    }
}
impl Default for Origin {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid URL"),
        }
    }
}
impl FromStr for Origin {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.base.as_str().trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://thunderstore.io/c/lc/p/BepInEx/BepInExPack/", "/c/lc/p/BepInEx/BepInExPack/")]
    #[case("/c/lc/p/BepInEx/BepInExPack/", "/c/lc/p/BepInEx/BepInExPack/")]
    #[case("  /c/lc/p/x/y/\n", "/c/lc/p/x/y/")]
    #[case("package/download/x/y/1.0.0/", "/package/download/x/y/1.0.0/")]
    #[case("https://thunderstore.io/api/v1/package/?q=a", "/api/v1/package/?q=a")]
    fn test_relative(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Origin::default().relative(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("/")]
    #[case("https://thunderstore.io")]
    #[case("https://thunderstore.io/")]
    #[case("https://example.com/c/lc/p/x/y/")]
    #[case("http://thunderstore.io/c/lc/p/x/y/")]
    #[case("ror2mm://v1/install/thunderstore.io/x/y/1.0.0/")]
    #[case("//example.com/c/lc/p/x/y/")]
    fn test_rejected(#[case] input: &str) {
        let err = Origin::default().relative(input).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }

    #[test]
    fn test_custom_origin() {
        let origin = Origin::parse("http://127.0.0.1:8080").unwrap();
        assert_eq!(origin.relative("http://127.0.0.1:8080/a/b").unwrap(), "/a/b");
        assert!(origin.relative("http://127.0.0.1:9090/a/b").is_err());
        assert_eq!(origin.join("/a/b?c=d").unwrap().as_str(), "http://127.0.0.1:8080/a/b?c=d");
        assert_eq!(origin.to_string(), "http://127.0.0.1:8080");
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://thunderstore.io")]
    #[case("mailto:someone@example.com")]
    fn test_invalid_origin(#[case] input: &str) {
        assert!(input.parse::<Origin>().is_err());
    }
}
