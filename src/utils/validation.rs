use crate::error::{FlowAiError, Result};

pub struct ConfigValidator;

impl ConfigValidator {
    /// Rejects empty and placeholder keys.
    pub fn validate_api_key(api_key: &str) -> Result<()> {
        if api_key.is_empty() {
            return Err(FlowAiError::Config("API key must not be empty".into()));
        }

        if api_key.starts_with("your_") || api_key.starts_with("sk-") && api_key.len() < 20 {
            return Err(FlowAiError::Config(
                "API key looks like a placeholder".into(),
            ));
        }

        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(FlowAiError::Config("URL must not be empty".into()));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(FlowAiError::Config(format!(
                "URL `{}` must start with http:// or https://",
                url
            )));
        }

        Ok(())
    }

    pub fn validate_model_name(model: &str) -> Result<()> {
        if model.trim().is_empty() {
            return Err(FlowAiError::Config("model name must not be empty".into()));
        }

        let lower = model.to_lowercase();
        if lower.contains("gpt") && !lower.contains("gpt-") {
            tracing::warn!(
                model = %model,
                "model name looks unusual, GPT models are usually named like 'gpt-4o-mini'"
            );
        }

        Ok(())
    }

    /// Task ids may hold letters, digits, `_`, `-` and `.`.
    pub fn validate_task_id(task_id: &str) -> Result<()> {
        if task_id.is_empty() {
            return Err(FlowAiError::Config("task id must not be empty".into()));
        }

        if !task_id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            return Err(FlowAiError::Config(format!(
                "task id `{}` may only contain letters, digits, `_`, `-` and `.`",
                task_id
            )));
        }

        Ok(())
    }

    pub fn validate_temperature(temperature: f64) -> Result<()> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(FlowAiError::Config(format!(
                "temperature must be within 0.0..=2.0, got {}",
                temperature
            )));
        }
        Ok(())
    }

    /// Only NaN is rejected. Thresholds outside `[-1, 1]` are legal and only warned about.
    pub fn validate_threshold(threshold: f64) -> Result<()> {
        if threshold.is_nan() {
            return Err(FlowAiError::InvalidThreshold(
                "threshold must be a number, got NaN".into(),
            ));
        }
        if !(-1.0..=1.0).contains(&threshold) {
            tracing::warn!(
                threshold,
                "threshold outside [-1, 1]: every record will end up in the same group or alone"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_api_key() {
        assert!(ConfigValidator::validate_api_key("").is_err());
        assert!(ConfigValidator::validate_api_key("your_api_key_here").is_err());
        assert!(ConfigValidator::validate_api_key("sk-short").is_err());
        assert!(ConfigValidator::validate_api_key("sk-1234567890abcdef1234567890").is_ok());
    }

    #[test]
    fn test_validate_url() {
        assert!(ConfigValidator::validate_url("").is_err());
        assert!(ConfigValidator::validate_url("example.com").is_err());
        assert!(ConfigValidator::validate_url("http://localhost:11434/v1").is_ok());
        assert!(ConfigValidator::validate_url("https://api.openai.com/v1").is_ok());
    }

    #[test]
    fn test_validate_task_id() {
        assert!(ConfigValidator::validate_task_id("").is_err());
        assert!(ConfigValidator::validate_task_id("embed_record").is_ok());
        assert!(ConfigValidator::validate_task_id("group.translate-csv").is_ok());
        assert!(ConfigValidator::validate_task_id("bad id").is_err());
    }

    #[test]
    fn test_validate_temperature() {
        assert!(ConfigValidator::validate_temperature(-0.1).is_err());
        assert!(ConfigValidator::validate_temperature(0.0).is_ok());
        assert!(ConfigValidator::validate_temperature(2.0).is_ok());
        assert!(ConfigValidator::validate_temperature(2.1).is_err());
    }

    #[test]
    fn test_validate_threshold() {
        assert!(ConfigValidator::validate_threshold(0.9).is_ok());
        assert!(ConfigValidator::validate_threshold(1.1).is_ok());
        assert!(matches!(
            ConfigValidator::validate_threshold(f64::NAN),
            Err(FlowAiError::InvalidThreshold(_))
        ));
    }
}
