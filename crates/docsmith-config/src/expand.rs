//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand `${VAR}` references in `value`, reporting failures against `field`.
///
/// Bare `$VAR` is left alone so paths and titles containing a dollar sign
/// survive unchanged.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        std::env::var(var).map(Some).map_err(|_| LookupError {
            var_name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DOCSMITH_UNSET_TITLE");
        }
        let result = expand_env("${DOCSMITH_UNSET_TITLE:-Team Docs}", "site.title").unwrap();
        assert_eq!(result, "Team Docs");
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DOCSMITH_BUILD_DIR", "out");
        }
        let result = expand_env("${DOCSMITH_BUILD_DIR}/site", "site.output_dir").unwrap();
        assert_eq!(result, "out/site");
        unsafe {
            std::env::remove_var("DOCSMITH_BUILD_DIR");
        }
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DOCSMITH_MISSING");
        }
        let err = expand_env("${DOCSMITH_MISSING}", "site.title").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert_eq!(
            err.to_string(),
            "Environment variable error in site.title: ${DOCSMITH_MISSING} not set"
        );
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        assert_eq!(expand_env("Cost $5 Docs", "site.title").unwrap(), "Cost $5 Docs");
    }
}
