use crate::adapters::firestore::{DEFAULT_BASE_URL, DEFAULT_DATABASE};
use crate::core::ConfigProvider;
use crate::utils::error::{Result, StoreError};
use crate::utils::validation::{self, Validate};

/// 合併 CLI、TOML 與環境變數之後的最終客戶端設定。
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub project_id: String,
    pub database: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub emulator_host: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl ClientSettings {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            access_token: None,
            emulator_host: None,
            timeout_seconds: None,
        }
    }
}

impl ConfigProvider for ClientSettings {
    fn project_id(&self) -> &str {
        &self.project_id
    }

    fn database_id(&self) -> &str {
        &self.database
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    fn emulator_host(&self) -> Option<&str> {
        self.emulator_host.as_deref()
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

impl Validate for ClientSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("database", &self.database)?;

        match &self.emulator_host {
            Some(host) => {
                validation::validate_non_empty_string("project_id", &self.project_id)?;
                validation::validate_host_port("emulator_host", host)?;
            }
            None => {
                validation::validate_project_id("project_id", &self.project_id)?;
                validation::validate_url("base_url", &self.base_url)?;
                if self.api_key.is_none() && self.access_token.is_none() {
                    tracing::info!(
                        "No API key or access token configured; only public data will be readable"
                    );
                }
            }
        }

        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("timeout_seconds", timeout, 1)?;
        }

        Ok(())
    }
}

/// Drops empty or whitespace-only values.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// For config-file values: also drops `${VAR}` placeholders whose variable was unset.
pub(crate) fn substituted(value: Option<String>) -> Option<String> {
    present(value).filter(|v| !v.contains("${"))
}

pub(crate) fn missing_project_id() -> StoreError {
    StoreError::config(
        "project_id",
        "not set; pass --project-id, set FIREBASE_PROJECT_ID, or add it to the config file",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ClientSettings::new("society-resolver");
        assert_eq!(settings.database_id(), "(default)");
        assert_eq!(settings.base_url(), "https://firestore.googleapis.com");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_emulator_allows_any_project_name() {
        let mut settings = ClientSettings::new("Demo");
        assert!(settings.validate().is_err());

        settings.emulator_host = Some("localhost:8080".to_string());
        assert!(settings.validate().is_ok());

        settings.emulator_host = Some("localhost".to_string());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut settings = ClientSettings::new("society-resolver");
        settings.base_url = "ftp://firestore".to_string();
        assert!(settings.validate().is_err());

        let mut settings = ClientSettings::new("society-resolver");
        settings.timeout_seconds = Some(0);
        assert!(settings.validate().is_err());

        let mut settings = ClientSettings::new("society-resolver");
        settings.database = " ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_present_keeps_literal_dollar_braces() {
        assert_eq!(present(Some("abc".to_string())), Some("abc".to_string()));
        assert_eq!(
            present(Some("tok${en".to_string())),
            Some("tok${en".to_string())
        );
        assert_eq!(present(Some("  ".to_string())), None);
        assert_eq!(present(None), None);
    }

    #[test]
    fn test_substituted_filters_placeholders() {
        assert_eq!(substituted(Some("abc".to_string())), Some("abc".to_string()));
        assert_eq!(substituted(Some("${FIREBASE_API_KEY}".to_string())), None);
        assert_eq!(substituted(Some("".to_string())), None);
        assert_eq!(substituted(None), None);
    }
}
