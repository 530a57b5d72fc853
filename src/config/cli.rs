use crate::config::settings::{missing_project_id, present, ClientSettings};
use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// 只設定 Firestore 客戶端；要讀的集合固定為 `society`。
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "society-dump")]
#[command(about = "Print every document in the Firestore `society` collection")]
pub struct CliConfig {
    #[arg(long, help = "TOML config file with a [firestore] section")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "FIREBASE_PROJECT_ID")]
    pub project_id: Option<String>,

    #[arg(long, env = "FIRESTORE_DATABASE")]
    pub database: Option<String>,

    #[arg(long, env = "FIREBASE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "FIRESTORE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    #[arg(long, env = "FIRESTORE_EMULATOR_HOST", help = "host:port of a local emulator")]
    pub emulator_host: Option<String>,

    #[arg(long, env = "FIRESTORE_BASE_URL")]
    pub base_url: Option<String>,

    #[arg(long, help = "HTTP request timeout in seconds (no timeout by default)")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    pub fn load_file(&self) -> Result<Option<TomlConfig>> {
        self.config
            .as_ref()
            .map(TomlConfig::from_file)
            .transpose()
    }

    /// 優先順序：CLI / 環境變數 > 設定檔 > 預設值
    pub fn resolve(&self, file: Option<&TomlConfig>) -> Result<ClientSettings> {
        let mut settings = ClientSettings::new(String::new());
        if let Some(file) = file {
            file.apply_to(&mut settings);
        }

        if let Some(project_id) = present(self.project_id.clone()) {
            settings.project_id = project_id;
        }
        if settings.project_id.is_empty() {
            return Err(missing_project_id());
        }
        if let Some(database) = present(self.database.clone()) {
            settings.database = database;
        }
        if let Some(base_url) = present(self.base_url.clone()) {
            settings.base_url = base_url;
        }
        if let Some(api_key) = present(self.api_key.clone()) {
            settings.api_key = Some(api_key);
        }
        if let Some(access_token) = present(self.access_token.clone()) {
            settings.access_token = Some(access_token);
        }
        if let Some(emulator_host) = present(self.emulator_host.clone()) {
            settings.emulator_host = Some(emulator_host);
        }
        if self.timeout_seconds.is_some() {
            settings.timeout_seconds = self.timeout_seconds;
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let config = CliConfig::try_parse_from([
            "society-dump",
            "--project-id",
            "society-resolver",
            "--emulator-host",
            "localhost:8080",
            "--timeout-seconds",
            "10",
            "--verbose",
        ])
        .unwrap();

        assert_eq!(config.project_id.as_deref(), Some("society-resolver"));
        assert_eq!(config.emulator_host.as_deref(), Some("localhost:8080"));
        assert_eq!(config.timeout_seconds, Some(10));
        assert!(config.verbose);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = TomlConfig::from_toml_str(
            r#"
[firestore]
project_id = "from-file"
database = "clubs"
api_key = "file-key"
"#,
        )
        .unwrap();

        let cli = CliConfig {
            project_id: Some("from-cli".to_string()),
            api_key: Some("cli-key".to_string()),
            ..Default::default()
        };

        let settings = cli.resolve(Some(&file)).unwrap();
        assert_eq!(settings.project_id, "from-cli");
        assert_eq!(settings.database, "clubs");
        assert_eq!(settings.api_key.as_deref(), Some("cli-key"));
    }

    #[test]
    fn test_file_only() {
        let file = TomlConfig::from_toml_str("[firestore]\nproject_id = \"from-file\"\n").unwrap();
        let settings = CliConfig::default().resolve(Some(&file)).unwrap();
        assert_eq!(settings.project_id, "from-file");
        assert_eq!(settings.database, "(default)");
    }

    #[test]
    fn test_cli_secret_with_dollar_brace_is_kept() {
        let cli = CliConfig {
            project_id: Some("society-resolver".to_string()),
            api_key: Some("AIza${abc}".to_string()),
            access_token: Some("ya29.${x".to_string()),
            ..Default::default()
        };

        let settings = cli.resolve(None).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("AIza${abc}"));
        assert_eq!(settings.access_token.as_deref(), Some("ya29.${x"));
    }

    #[test]
    fn test_missing_project_id() {
        assert!(CliConfig::default().resolve(None).is_err());
    }
}
