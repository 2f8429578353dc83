// 错误处理模块

pub use anyhow::{anyhow, Error as AnyhowError, Result};
pub use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 实体识别服务失败（不重试、不降级）
    #[error("Entity recognizer error: {0}")]
    RecognizerError(String),

    /// 情绪分类服务失败（不重试、不降级）
    #[error("Sentiment classifier error: {0}")]
    ClassifierError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// 是否为启动阶段的配置错误
    pub fn is_config(&self) -> bool {
        matches!(self, AppError::ConfigError(_))
    }
}

// 通用错误转换
impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Other(format!("{:#}", e))
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_context() {
        let err = AppError::ClassifierError("status 503".to_string());
        assert_eq!(err.to_string(), "Sentiment classifier error: status 503");
        assert!(!err.is_config());
        assert!(AppError::ConfigError("x".into()).is_config());
    }

    #[test]
    fn test_from_anyhow_keeps_chain() {
        let inner = anyhow!("connection refused").context("POST /models/x");
        let err: AppError = inner.into();
        let msg = err.to_string();
        assert!(msg.contains("POST /models/x"));
        assert!(msg.contains("connection refused"));
    }
}
