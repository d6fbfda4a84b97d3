//! Link target validation.
//!
//! Targets are resolved against a base origin the same way a browser resolves
//! an `href`, then checked against a fixed scheme allow-list. The base is
//! always a bare origin: any path, query or fragment it was given is dropped.

use url::Url;

/// Base origin used when none is configured.
pub const DEFAULT_BASE_ORIGIN: &str = "http://localhost/";

/// Schemes allowed to produce a clickable link.
const ALLOWED_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Schemes a base origin may use.
const BASE_SCHEMES: [&str; 2] = ["http", "https"];

/// Why a link target was not turned into an anchor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlRejection {
    /// The target could not be parsed, even relative to the base origin.
    #[error("malformed URL: {0}")]
    Malformed(#[from] url::ParseError),
    /// The resolved URL uses a scheme outside the allow-list.
    #[error("scheme not allowed: {0}")]
    Scheme(String),
}

/// Validates link targets against the scheme allow-list.
///
/// # Example
///
/// ```
/// use chatmark_renderer::UrlSanitizer;
/// use url::Url;
///
/// let base = Url::parse("https://chat.example.com/app/page?x=1").unwrap();
/// let sanitizer = UrlSanitizer::new(base).unwrap();
///
/// assert_eq!(sanitizer.base().as_str(), "https://chat.example.com/");
/// let resolved = sanitizer.sanitize("/docs?q=1").unwrap();
/// assert_eq!(resolved.as_str(), "https://chat.example.com/docs?q=1");
/// assert!(sanitizer.sanitize("javascript:alert(1)").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct UrlSanitizer {
    base: Url,
}

impl UrlSanitizer {
    /// Create a sanitizer resolving relative targets against the origin of
    /// `base`.
    ///
    /// # Errors
    ///
    /// Returns `UrlRejection::Scheme` if `base` is not an `http` or `https` URL.
    pub fn new(base: Url) -> Result<Self, UrlRejection> {
        if !BASE_SCHEMES.contains(&base.scheme()) {
            return Err(UrlRejection::Scheme(base.scheme().to_owned()));
        }
        let origin = Url::parse(&base.origin().ascii_serialization())?;
        Ok(Self { base: origin })
    }

    /// Base origin used for relative targets.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve `target` and accept it only for `http`, `https` or `mailto`.
    ///
    /// Returns the resolved absolute URL. Rejection is an ordinary value; the
    /// caller leaves the link text as plain text.
    pub fn sanitize(&self, target: &str) -> Result<Url, UrlRejection> {
        let resolved = self.base.join(target)?;
        if ALLOWED_SCHEMES.contains(&resolved.scheme()) {
            Ok(resolved)
        } else {
            Err(UrlRejection::Scheme(resolved.scheme().to_owned()))
        }
    }
}

impl Default for UrlSanitizer {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_BASE_ORIGIN).expect("default base origin is valid"),
        }
    }
}
