use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use entity_sentiment_core::config::PipelineSettings;

use super::{EntityRecognizer, EntitySpan};
use crate::inference::{self, InferenceOptions};

/// 远程 token-classification 模型（如 dslim/bert-base-NER）
pub struct HttpEntityRecognizer {
    client: Client,
    url: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct RecognizeRequest<'a> {
    inputs: &'a str,
    parameters: RecognizeParameters,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct RecognizeParameters {
    /// 合并子词，得到完整实体
    aggregation_strategy: &'static str,
}

#[derive(Debug, Deserialize)]
struct TokenEntity {
    #[serde(alias = "entity")]
    entity_group: String,
    #[serde(default)]
    word: Option<String>,
    /// 字符偏移（非字节）
    #[serde(default)]
    start: Option<usize>,
    #[serde(default)]
    end: Option<usize>,
}

impl HttpEntityRecognizer {
    pub fn new(url: impl Into<String>, token: Option<String>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: inference::build_client(timeout_secs)?,
            url: url.into(),
            token,
        })
    }

    pub fn from_settings(settings: &PipelineSettings) -> Result<Self> {
        Self::new(
            settings.ner.url(),
            settings.api_token.as_ref().map(|t| t.expose().to_string()),
            settings.timeout_secs,
        )
    }
}

#[async_trait]
impl EntityRecognizer for HttpEntityRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>> {
        let request = RecognizeRequest {
            inputs: text,
            parameters: RecognizeParameters {
                aggregation_strategy: "simple",
            },
            options: InferenceOptions::default(),
        };
        let entities: Vec<TokenEntity> =
            inference::post_json(&self.client, &self.url, self.token.as_deref(), &request).await?;
        debug!("NER 返回 {} 个实体片段", entities.len());
        Ok(to_spans(text, entities))
    }
}

fn to_spans(text: &str, entities: Vec<TokenEntity>) -> Vec<EntitySpan> {
    entities
        .into_iter()
        .filter_map(|entity| {
            let surface = match (entity.start, entity.end) {
                (Some(start), Some(end)) => slice_chars(text, start, end).map(str::to_string),
                _ => None,
            }
            .or(entity.word)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

            match surface {
                Some(surface) => Some(EntitySpan::new(surface, entity.entity_group)),
                None => {
                    warn!("跳过无法定位文本的实体片段: {}", entity.entity_group);
                    None
                }
            }
        })
        .collect()
}

/// 按字符下标截取子串（推理服务给出的是字符偏移）
fn slice_chars(text: &str, start: usize, end: usize) -> Option<&str> {
    if start >= end {
        return None;
    }
    let mut indices = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()));
    let from = indices.nth(start)?;
    let to = indices.nth(end - start - 1)?;
    text.get(from..to)
}
