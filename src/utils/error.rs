use thiserror::Error;

/// 取得文件失敗的所有原因。呼叫端一律視為 "fetch failed"，
/// 變體只用於診斷輸出。
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("{code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid document: {message}")]
    InvalidDocument { message: String },

    #[error("invalid configuration for {field}: {message}")]
    Config { field: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 請求 URL 可能帶有憑證，錯誤訊息中一律移除。
impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Transport(e.without_url())
    }
}

impl StoreError {
    pub fn config(field: &str, message: impl Into<String>) -> Self {
        StoreError::Config {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_document(message: impl Into<String>) -> Self {
        StoreError::InvalidDocument {
            message: message.into(),
        }
    }

    /// Stable kebab-case code, in the same vocabulary Firebase SDKs print.
    pub fn code(&self) -> &str {
        match self {
            StoreError::Transport(e) if e.is_timeout() => "deadline-exceeded",
            StoreError::Transport(_) => "unavailable",
            StoreError::Api { code, .. } => code.as_str(),
            StoreError::Decode(_) | StoreError::InvalidDocument { .. } => "data-loss",
            StoreError::Config { .. } => "invalid-argument",
            StoreError::Io(_) => "internal",
        }
    }

    /// 把 REST 錯誤本文中的 `status` (例如 `PERMISSION_DENIED`) 轉成 `permission-denied`。
    pub fn api(status: u16, rpc_status: Option<&str>, message: impl Into<String>) -> Self {
        let code = match rpc_status {
            Some(s) if !s.is_empty() => s.to_ascii_lowercase().replace('_', "-"),
            _ => code_for_http_status(status).to_string(),
        };
        StoreError::Api {
            status,
            code,
            message: message.into(),
        }
    }
}

fn code_for_http_status(status: u16) -> &'static str {
    match status {
        400 => "invalid-argument",
        401 => "unauthenticated",
        403 => "permission-denied",
        404 => "not-found",
        409 => "aborted",
        429 => "resource-exhausted",
        499 => "cancelled",
        501 => "unimplemented",
        503 => "unavailable",
        504 => "deadline-exceeded",
        _ => "unknown",
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
