//! Environment variable expansion for configuration strings.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a config value.
///
/// Values without `${` are returned unchanged, so bare `$` (common in URLs)
/// is never treated as a variable. A referenced variable that is unset and has
/// no default is reported against `field`.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| std::env::var(var).map(Some))
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_whole_value() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("CHATMARK_TEST_ORIGIN", "https://chat.example.com");
        }
        let result = expand_env("${CHATMARK_TEST_ORIGIN}", "render.base_origin").unwrap();
        assert_eq!(result, "https://chat.example.com");
        unsafe {
            std::env::remove_var("CHATMARK_TEST_ORIGIN");
        }
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("CHATMARK_TEST_HOST", "chat.internal");
        }
        let result = expand_env("https://${CHATMARK_TEST_HOST}:8443", "render.base_origin").unwrap();
        assert_eq!(result, "https://chat.internal:8443");
        unsafe {
            std::env::remove_var("CHATMARK_TEST_HOST");
        }
    }

    #[test]
    fn test_expand_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("CHATMARK_TEST_UNSET");
        }
        let result =
            expand_env("${CHATMARK_TEST_UNSET:-http://localhost}", "render.base_origin").unwrap();
        assert_eq!(result, "http://localhost");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("CHATMARK_TEST_MISSING");
        }
        let err = expand_env("${CHATMARK_TEST_MISSING}", "render.base_origin").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("CHATMARK_TEST_MISSING"));
        assert!(err.to_string().contains("render.base_origin"));
    }

    #[test]
    fn test_bare_dollar_unchanged() {
        let result = expand_env("https://example.com/$path", "render.base_origin").unwrap();
        assert_eq!(result, "https://example.com/$path");
    }
}
