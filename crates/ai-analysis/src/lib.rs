//! # Entity Sentiment Analysis
//!
//! 金融文本实体级情绪分析：实体抽取、分句、实体/分句映射、逐句打分、聚合

pub mod aggregator;
pub mod clause_mapper;
pub mod clause_splitter;
pub mod entity_extractor;
pub mod entity_recognizer;
mod inference;
pub mod pipeline;
pub mod sentiment_analyzer;
pub mod types;

// 重新导出核心 Trait 与类型
pub use entity_recognizer::{EntityKind, EntityRecognizer, EntitySpan};
pub use pipeline::{build_pipeline, EntitySentimentPipeline};
pub use sentiment_analyzer::{SentimentClassifier, SentimentProbs};
pub use types::{RowLabel, SentimentLabel, SentimentRequest, SentimentRow};
