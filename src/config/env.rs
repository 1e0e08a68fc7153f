use std::env;

use crate::error::{FlowAiError, Result};

/// Environment variable lookups.
pub struct EnvConfig;

impl EnvConfig {
    /// Resolves an API key.
    ///
    /// A literal key is returned as is, `${VAR_NAME}` reads that variable and
    /// an empty key falls back to `default_env_var`.
    pub fn get_api_key(api_key: &str, default_env_var: &str) -> Result<String> {
        if api_key.starts_with("${") && api_key.ends_with('}') {
            let env_var_name = &api_key[2..api_key.len() - 1];
            Self::get_env(env_var_name)
        } else if api_key.is_empty() {
            Self::get_env(default_env_var)
        } else {
            Ok(api_key.to_string())
        }
    }

    pub fn get_env(key: &str) -> Result<String> {
        env::var(key).map_err(|_| {
            FlowAiError::Config(format!("environment variable `{}` is not set", key))
        })
    }

    /// Blank values count as unset.
    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key).ok().filter(|value| !value.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_api_key_direct() {
        let result = EnvConfig::get_api_key("sk-1234567890abcdef1234567890", "FLOWAI_TEST_KEY");
        assert_eq!(result.unwrap(), "sk-1234567890abcdef1234567890");
    }

    #[test]
    fn test_get_api_key_env_var() {
        env::set_var("FLOWAI_TEST_INDIRECT_KEY", "test_key_value");
        let result = EnvConfig::get_api_key("${FLOWAI_TEST_INDIRECT_KEY}", "FALLBACK_KEY");
        assert_eq!(result.unwrap(), "test_key_value");
        env::remove_var("FLOWAI_TEST_INDIRECT_KEY");
    }

    #[test]
    fn test_get_api_key_missing() {
        env::remove_var("FLOWAI_TEST_MISSING_KEY");
        let result = EnvConfig::get_api_key("", "FLOWAI_TEST_MISSING_KEY");
        assert!(matches!(result, Err(FlowAiError::Config(_))));
    }

    #[test]
    fn test_optional_treats_blank_as_unset() {
        env::set_var("FLOWAI_TEST_BLANK", "  ");
        assert!(EnvConfig::get_env_optional("FLOWAI_TEST_BLANK").is_none());
        env::remove_var("FLOWAI_TEST_BLANK");
    }
}
