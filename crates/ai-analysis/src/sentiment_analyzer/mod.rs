//! 情绪分析器
//!
//! 分类交给外部模型（默认 FinBERT），这里把概率分布归约为 0 到 1 的分数和三分类标签

use std::collections::HashMap;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::SentimentLabel;

mod http;

pub use http::HttpSentimentClassifier;

/// 情绪概率分布；缺失的标签按 0 处理
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentProbs {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentProbs {
    pub fn new(positive: f64, negative: f64, neutral: f64) -> Self {
        Self {
            positive,
            negative,
            neutral,
        }
    }

    /// 由 (标签, 概率) 列表构造，标签大小写不敏感，先做别名替换，未知标签忽略
    pub fn from_distribution<I, S>(distribution: I, aliases: &LabelAliases) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut probs = Self::default();
        for (raw_label, prob) in distribution {
            let raw_label = raw_label.as_ref();
            if !prob.is_finite() {
                bail!("non-finite probability {} for label {}", prob, raw_label);
            }
            match aliases.resolve(raw_label).as_str() {
                "positive" => probs.positive = prob,
                "negative" => probs.negative = prob,
                "neutral" => probs.neutral = prob,
                other => warn!("忽略未知情绪标签: {}", other),
            }
        }
        Ok(probs)
    }

    /// clamp(0.5 + 0.5 * (P(positive) - P(negative)), 0, 1)；neutral 不参与计算
    pub fn score(&self) -> f64 {
        (0.5 + 0.5 * (self.positive - self.negative)).clamp(0.0, 1.0)
    }
}

/// 单句评分结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClauseScore {
    pub score: f64,
    pub label: SentimentLabel,
}

impl From<SentimentProbs> for ClauseScore {
    fn from(probs: SentimentProbs) -> Self {
        let score = probs.score();
        Self {
            score,
            label: SentimentLabel::from_score(score),
        }
    }
}

/// 模型原始标签 -> 规范标签（均为小写）
#[derive(Debug, Clone, Default)]
pub struct LabelAliases(HashMap<String, String>);

impl LabelAliases {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.as_ref().trim().to_lowercase(), v.as_ref().trim().to_lowercase()))
                .collect(),
        )
    }

    pub fn resolve(&self, raw_label: &str) -> String {
        let label = raw_label.trim().to_lowercase();
        self.0.get(&label).cloned().unwrap_or(label)
    }
}

/// 情绪分类接口
///
/// 实现方需要支持并发只读调用；调用失败直接返回错误，不重试、不降级
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<SentimentProbs>;

    /// 批量分类，默认逐条顺序调用，输出与输入一一对应
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<SentimentProbs>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.classify(text).await?);
        }
        Ok(results)
    }
}
