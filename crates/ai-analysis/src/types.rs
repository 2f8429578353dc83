//! 请求 / 结果行等公共类型

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// 聚合行的 clause 固定取值
pub const AGGREGATED_CLAUSE: &str = "AGGREGATED";

/// 聚合行标签前缀
pub const MEAN_LABEL_PREFIX: &str = "MEAN-";

/// 三分类情绪标签（以 0.5 为中点）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub const MIDPOINT: f64 = 0.5;

    /// 分数 > 0.5 为 positive，< 0.5 为 negative，恰好 0.5 为 neutral
    pub fn from_score(score: f64) -> Self {
        if score > Self::MIDPOINT {
            SentimentLabel::Positive
        } else if score < Self::MIDPOINT {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 结果行标签：单句标签或聚合均值标签（输出为 "MEAN-positive" 形式）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLabel {
    Clause(SentimentLabel),
    Mean(SentimentLabel),
}

impl fmt::Display for RowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowLabel::Clause(label) => f.write_str(label.as_str()),
            RowLabel::Mean(label) => write!(f, "{}{}", MEAN_LABEL_PREFIX, label),
        }
    }
}

impl Serialize for RowLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 一条输出记录：(entity, score, label, clause)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentRow {
    pub entity: String,
    /// 0 到 1，0.5 为中性
    pub score: f64,
    pub label: RowLabel,
    pub clause: String,
}

impl SentimentRow {
    pub fn clause_row(entity: &str, clause: &str, score: f64) -> Self {
        Self {
            entity: entity.to_string(),
            score,
            label: RowLabel::Clause(SentimentLabel::from_score(score)),
            clause: clause.to_string(),
        }
    }

    pub fn aggregate_row(entity_filter: &str, mean_score: f64) -> Self {
        Self {
            entity: entity_filter.to_string(),
            score: mean_score,
            label: RowLabel::Mean(SentimentLabel::from_score(mean_score)),
            clause: AGGREGATED_CLAUSE.to_string(),
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self.label, RowLabel::Mean(_))
    }
}

/// 一次分析请求
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentRequest {
    pub text: String,
    #[serde(default, alias = "entity")]
    pub entity_filter: Option<String>,
}

impl SentimentRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entity_filter: None,
        }
    }

    pub fn with_filter(mut self, entity_filter: impl Into<String>) -> Self {
        self.entity_filter = Some(entity_filter.into());
        self
    }

    /// 空字符串等同于未指定过滤
    pub fn active_filter(&self) -> Option<&str> {
        self.entity_filter.as_deref().filter(|f| !f.is_empty())
    }
}
