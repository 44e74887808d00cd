//! Configuration structures for the import pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ImportError;
use crate::extraction::RecoveryPolicy;

/// Main configuration for abimport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Completion service configuration.
    pub llm: LlmConfig,

    /// Template configuration.
    pub template: TemplateConfig,

    /// Response parsing configuration.
    pub extraction: ExtractionConfig,
}

/// Completion service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier.
    pub model: String,

    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,

    /// Sampling temperature. Kept at 0 so identical documents extract alike.
    pub temperature: f32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.0,
            timeout_secs: 120,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String, ImportError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ImportError::Config(format!(
                    "API key not set: export {} or put it in a .env file",
                    self.api_key_env
                ))
            })
    }
}

/// Import template configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Path to the import template workbook.
    pub path: PathBuf,

    /// Worksheet to fill (first worksheet if unset).
    pub sheet: Option<String>,

    /// File name for the filled workbook.
    pub output_file: PathBuf,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("awork_Importvorlage.xlsx"),
            sheet: None,
            output_file: PathBuf::from("awork_import_fertig.xlsx"),
        }
    }
}

/// Response parsing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// What to do with a malformed position inside an otherwise valid array.
    pub recovery: RecoveryPolicy,
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.temperature, 0.0);
        assert_eq!(config.template.path, PathBuf::from("awork_Importvorlage.xlsx"));
        assert_eq!(config.extraction.recovery, RecoveryPolicy::FailFast);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"llm":{"model":"gpt-4o-mini"},"extraction":{"recovery":"skip_invalid"}}"#)
                .unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.timeout_secs, 120);
        assert_eq!(config.extraction.recovery, RecoveryPolicy::SkipInvalid);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.template.sheet = Some("Aufgaben".into());
        config.save(&path).unwrap();

        let loaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(loaded.template.sheet.as_deref(), Some("Aufgaben"));
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let llm = LlmConfig {
            api_key_env: "ABIMPORT_TEST_NO_SUCH_KEY".into(),
            ..Default::default()
        };
        assert!(matches!(llm.api_key(), Err(ImportError::Config(_))));
    }
}
