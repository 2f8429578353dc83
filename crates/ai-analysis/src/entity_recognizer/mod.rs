//! 命名实体识别
//!
//! 识别本身交给外部模型，这里只定义接口和两种接入方式：
//! - 远程 token-classification 推理服务
//! - 本地 JSON 词典（离线 / 测试用）

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod gazetteer;
mod http;

pub use gazetteer::GazetteerRecognizer;
pub use http::HttpEntityRecognizer;

/// 识别出的实体片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub type_tag: String,
}

impl EntitySpan {
    pub fn new(text: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            type_tag: type_tag.into(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        EntityKind::from_tag(&self.type_tag)
    }
}

/// 归一化后的实体类型，兼容 spaCy（ORG/PRODUCT/PERSON）与 BERT-NER（ORG/PER）两套标签
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Organization,
    Product,
    Person,
    Other(String),
}

impl EntityKind {
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_uppercase();
        // BIO 前缀：B-ORG / I-PER
        let tag = tag
            .strip_prefix("B-")
            .or_else(|| tag.strip_prefix("I-"))
            .unwrap_or(&tag);
        match tag {
            "ORG" | "ORGANIZATION" | "ORGANISATION" => EntityKind::Organization,
            "PRODUCT" | "PROD" => EntityKind::Product,
            "PERSON" | "PER" | "PERS" => EntityKind::Person,
            other => EntityKind::Other(other.to_string()),
        }
    }
}

/// 实体识别接口
///
/// 实现方需要支持并发只读调用（模型加载后不可变）
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// 按模型返回顺序给出实体片段
    async fn recognize(&self, text: &str) -> anyhow::Result<Vec<EntitySpan>>;
}
