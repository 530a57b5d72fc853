use crate::config::settings::{substituted, ClientSettings};
use crate::utils::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub firestore: FirestoreConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FirestoreConfig {
    pub project_id: Option<String>,
    pub database: Option<String>,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub emulator_host: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content)
            .map_err(|e| StoreError::config("toml_parsing", format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${FIREBASE_API_KEY})，未設定的變數保留原文
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| StoreError::config("toml_parsing", e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    /// 檔案內的值疊加到既有設定上；`None` 表示檔案沒寫，保留原值
    pub fn apply_to(&self, settings: &mut ClientSettings) {
        let fs = self.firestore.clone();
        if let Some(project_id) = substituted(fs.project_id) {
            settings.project_id = project_id;
        }
        if let Some(database) = substituted(fs.database) {
            settings.database = database;
        }
        if let Some(base_url) = substituted(fs.base_url) {
            settings.base_url = base_url;
        }
        if let Some(api_key) = substituted(fs.api_key) {
            settings.api_key = Some(api_key);
        }
        if let Some(access_token) = substituted(fs.access_token) {
            settings.access_token = Some(access_token);
        }
        if let Some(emulator_host) = substituted(fs.emulator_host) {
            settings.emulator_host = Some(emulator_host);
        }
        if fs.timeout_seconds.is_some() {
            settings.timeout_seconds = fs.timeout_seconds;
        }
    }
}
