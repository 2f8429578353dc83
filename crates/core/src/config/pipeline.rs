//! 情绪分析流水线配置
//!
//! 启动时一次性读取并校验，任何错误都视为致命（不会带着缺失的协作方启动）

use std::fmt;
use std::path::PathBuf;

use crate::config::environment::{parse_bool, split_list};
use crate::error::{AppError, AppResult};

pub const DEFAULT_INFERENCE_ENDPOINT: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_NER_MODEL: &str = "dslim/bert-base-NER";
pub const DEFAULT_SENTIMENT_MODEL: &str = "yiyanghkust/finbert-tone";
pub const DEFAULT_ENTITY_TYPES: &[&str] = &["ORG", "PRODUCT", "PERSON"];
pub const DEFAULT_MAX_INPUT_TOKENS: u64 = 512;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 实体识别后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognizerBackend {
    /// 远程 token-classification 模型
    Http,
    /// 本地 JSON 词典
    Gazetteer,
}

impl RecognizerBackend {
    pub fn parse(raw: &str) -> AppResult<Self> {
        match raw.trim().to_lowercase().as_str() {
            "http" | "remote" => Ok(Self::Http),
            "gazetteer" | "dictionary" => Ok(Self::Gazetteer),
            other => Err(AppError::ConfigError(format!(
                "unsupported NER_BACKEND: {}",
                other
            ))),
        }
    }
}

/// 推理服务地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSettings {
    pub base_url: String,
    pub model: String,
}

impl EndpointSettings {
    /// 完整请求地址：{base_url}/{model}
    pub fn url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.model)
    }

    fn validate(&self, name: &str) -> AppResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(AppError::ConfigError(format!(
                "{}_ENDPOINT must be an http(s) url, got: {}",
                name, self.base_url
            )));
        }
        if self.model.trim().is_empty() {
            return Err(AppError::ConfigError(format!("{}_MODEL is empty", name)));
        }
        Ok(())
    }
}

/// 访问令牌，Debug 输出时打码
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub recognizer_backend: RecognizerBackend,
    pub ner: EndpointSettings,
    pub gazetteer_path: Option<PathBuf>,
    /// 保留的实体类型标签（ORG / PRODUCT / PERSON ...）
    pub entity_types: Vec<String>,
    pub sentiment: EndpointSettings,
    /// 模型原始标签 -> 规范标签（positive / negative / neutral）
    pub label_aliases: Vec<(String, String)>,
    pub max_input_tokens: u64,
    pub api_token: Option<ApiToken>,
    pub timeout_secs: u64,
    /// 启动时探测两个协作方是否可用
    pub warmup: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            recognizer_backend: RecognizerBackend::Http,
            ner: EndpointSettings {
                base_url: DEFAULT_INFERENCE_ENDPOINT.to_string(),
                model: DEFAULT_NER_MODEL.to_string(),
            },
            gazetteer_path: None,
            entity_types: DEFAULT_ENTITY_TYPES.iter().map(|s| s.to_string()).collect(),
            sentiment: EndpointSettings {
                base_url: DEFAULT_INFERENCE_ENDPOINT.to_string(),
                model: DEFAULT_SENTIMENT_MODEL.to_string(),
            },
            label_aliases: Vec::new(),
            max_input_tokens: DEFAULT_MAX_INPUT_TOKENS,
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            warmup: false,
        }
    }
}

impl PipelineSettings {
    /// 从进程环境变量读取（调用方负责先加载 .env）
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意 key -> value 来源读取，便于测试
    pub fn from_lookup<F>(get: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let recognizer_backend = match get("NER_BACKEND") {
            Some(raw) => RecognizerBackend::parse(&raw)?,
            None => defaults.recognizer_backend,
        };

        let ner = EndpointSettings {
            base_url: get("NER_ENDPOINT").unwrap_or(defaults.ner.base_url),
            model: get("NER_MODEL").unwrap_or(defaults.ner.model),
        };
        let sentiment = EndpointSettings {
            base_url: get("SENTIMENT_ENDPOINT").unwrap_or(defaults.sentiment.base_url),
            model: get("SENTIMENT_MODEL").unwrap_or(defaults.sentiment.model),
        };

        let entity_types = match get("NER_ENTITY_TYPES") {
            Some(raw) => split_list(&raw),
            None => defaults.entity_types,
        };

        let label_aliases = match get("SENTIMENT_LABEL_ALIASES") {
            Some(raw) => parse_label_aliases(&raw)?,
            None => Vec::new(),
        };

        let settings = Self {
            recognizer_backend,
            ner,
            gazetteer_path: get("NER_GAZETTEER_PATH").map(PathBuf::from),
            entity_types,
            sentiment,
            label_aliases,
            max_input_tokens: parse_u64(
                get("SENTIMENT_MAX_INPUT_TOKENS"),
                "SENTIMENT_MAX_INPUT_TOKENS",
                defaults.max_input_tokens,
            )?,
            api_token: get("INFERENCE_API_TOKEN").map(|t| ApiToken(t.trim().to_string())),
            timeout_secs: parse_u64(
                get("INFERENCE_TIMEOUT_SECS"),
                "INFERENCE_TIMEOUT_SECS",
                defaults.timeout_secs,
            )?,
            warmup: get("PIPELINE_WARMUP")
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.warmup),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> AppResult<()> {
        match self.recognizer_backend {
            RecognizerBackend::Http => self.ner.validate("NER")?,
            RecognizerBackend::Gazetteer => {
                if self.gazetteer_path.is_none() {
                    return Err(AppError::ConfigError(
                        "NER_GAZETTEER_PATH is required when NER_BACKEND=gazetteer".to_string(),
                    ));
                }
            }
        }
        self.sentiment.validate("SENTIMENT")?;
        if self.entity_types.is_empty() {
            return Err(AppError::ConfigError(
                "NER_ENTITY_TYPES must name at least one type".to_string(),
            ));
        }
        if self.max_input_tokens == 0 {
            return Err(AppError::ConfigError(
                "SENTIMENT_MAX_INPUT_TOKENS must be positive".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "INFERENCE_TIMEOUT_SECS must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_u64(raw: Option<String>, key: &str, default: u64) -> AppResult<u64> {
    match raw {
        Some(v) => v
            .trim()
            .parse::<u64>()
            .map_err(|_| AppError::ConfigError(format!("{} is not an integer: {}", key, v))),
        None => Ok(default),
    }
}

/// 解析 "LABEL_0=neutral,LABEL_1=positive" 形式的标签映射
pub fn parse_label_aliases(raw: &str) -> AppResult<Vec<(String, String)>> {
    split_list(raw)
        .into_iter()
        .map(|pair| match pair.split_once('=') {
            Some((from, to)) if !from.trim().is_empty() && !to.trim().is_empty() => {
                Ok((from.trim().to_lowercase(), to.trim().to_lowercase()))
            }
            _ => Err(AppError::ConfigError(format!(
                "malformed SENTIMENT_LABEL_ALIASES entry: {}",
                pair
            ))),
        })
        .collect()
}
