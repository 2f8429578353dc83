use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use entity_sentiment_core::config::PipelineSettings;

use super::{LabelAliases, SentimentClassifier, SentimentProbs};
use crate::inference::{self, InferenceOptions};

/// 远程文本分类模型（默认 yiyanghkust/finbert-tone）
///
/// 超过 `max_length` 个 token 的输入由服务端截断，不报错
pub struct HttpSentimentClassifier {
    client: Client,
    url: String,
    token: Option<String>,
    max_length: u64,
    aliases: LabelAliases,
}

#[derive(Serialize)]
struct ClassifyRequest<'a, T: Serialize + ?Sized> {
    inputs: &'a T,
    parameters: ClassifyParameters,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct ClassifyParameters {
    truncation: bool,
    max_length: u64,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// 单条输入时服务可能返回一层或两层数组
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassifyResponse {
    fn into_distributions(self) -> Vec<Vec<LabelScore>> {
        match self {
            ClassifyResponse::Nested(rows) => rows,
            ClassifyResponse::Flat(row) => vec![row],
        }
    }
}

impl HttpSentimentClassifier {
    pub fn new(
        url: impl Into<String>,
        token: Option<String>,
        timeout_secs: u64,
        max_length: u64,
        aliases: LabelAliases,
    ) -> Result<Self> {
        Ok(Self {
            client: inference::build_client(timeout_secs)?,
            url: url.into(),
            token,
            max_length,
            aliases,
        })
    }

    pub fn from_settings(settings: &PipelineSettings) -> Result<Self> {
        Self::new(
            settings.sentiment.url(),
            settings.api_token.as_ref().map(|t| t.expose().to_string()),
            settings.timeout_secs,
            settings.max_input_tokens,
            LabelAliases::new(settings.label_aliases.iter().cloned()),
        )
    }

    async fn request<T: Serialize + ?Sized>(&self, inputs: &T) -> Result<Vec<Vec<LabelScore>>> {
        let request = ClassifyRequest {
            inputs,
            parameters: ClassifyParameters {
                truncation: true,
                max_length: self.max_length,
            },
            options: InferenceOptions::default(),
        };
        let response: ClassifyResponse =
            inference::post_json(&self.client, &self.url, self.token.as_deref(), &request).await?;
        Ok(response.into_distributions())
    }

    fn to_probs(&self, distribution: Vec<LabelScore>) -> Result<SentimentProbs> {
        SentimentProbs::from_distribution(
            distribution.into_iter().map(|s| (s.label, s.score)),
            &self.aliases,
        )
    }
}

#[async_trait]
impl SentimentClassifier for HttpSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentProbs> {
        let distribution = self
            .request(text)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("empty classification response from {}", self.url))?;
        self.to_probs(distribution)
    }

    /// 一次请求发送全部输入，响应条数必须与输入一致
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<SentimentProbs>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let distributions = self.request(texts).await?;
        if distributions.len() != texts.len() {
            return Err(anyhow!(
                "classification response has {} results for {} inputs",
                distributions.len(),
                texts.len()
            ));
        }
        debug!("情绪分类完成: {} 条", texts.len());
        distributions
            .into_iter()
            .map(|d| self.to_probs(d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn classifier(aliases: LabelAliases) -> HttpSentimentClassifier {
        HttpSentimentClassifier::new("http://localhost:1/models/finbert", None, 5, 512, aliases)
            .unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let request = ClassifyRequest {
            inputs: "Apple rose",
            parameters: ClassifyParameters {
                truncation: true,
                max_length: 512,
            },
            options: InferenceOptions::default(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["inputs"], "Apple rose");
        assert_eq!(json["parameters"]["truncation"], true);
        assert_eq!(json["parameters"]["max_length"], 512);
        assert_eq!(json["options"]["wait_for_model"], true);
    }

    #[test]
    fn test_parse_nested_and_flat_responses() {
        let nested: ClassifyResponse = serde_json::from_str(
            r#"[[{"label": "Positive", "score": 0.9}, {"label": "Negative", "score": 0.05}, {"label": "Neutral", "score": 0.05}]]"#,
        )
        .unwrap();
        let flat: ClassifyResponse =
            serde_json::from_str(r#"[{"label": "Negative", "score": 0.8}]"#).unwrap();

        let c = classifier(LabelAliases::default());
        let probs = c
            .to_probs(nested.into_distributions().remove(0))
            .unwrap();
        assert_abs_diff_eq!(probs.score(), 0.925, epsilon = 1e-12);

        let probs = c.to_probs(flat.into_distributions().remove(0)).unwrap();
        assert_eq!(probs, SentimentProbs::new(0.0, 0.8, 0.0));
    }

    #[test]
    fn test_aliases_applied_to_response() {
        let c = classifier(LabelAliases::new([("LABEL_0", "neutral"), ("LABEL_1", "positive"), ("LABEL_2", "negative")]));
        let response: ClassifyResponse = serde_json::from_str(
            r#"[[{"label": "LABEL_1", "score": 0.1}, {"label": "LABEL_2", "score": 0.7}, {"label": "LABEL_0", "score": 0.2}]]"#,
        )
        .unwrap();
        let probs = c.to_probs(response.into_distributions().remove(0)).unwrap();
        assert_abs_diff_eq!(probs.score(), 0.2, epsilon = 1e-12);
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_request() {
        let c = classifier(LabelAliases::default());
        assert!(c.classify_batch(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "需要可访问的推理服务"]
    async fn test_live_finbert() {
        let settings = PipelineSettings::from_env().unwrap();
        let c = HttpSentimentClassifier::from_settings(&settings).unwrap();
        let probs = c.classify("Apple market is growing rapidly").await.unwrap();
        assert!(probs.score() > 0.5);
    }
}
