//! 实体级情绪分析流水线
//!
//! 原文 -> 实体抽取 -> (可选)实体过滤 -> 分句 -> 实体/分句映射 -> 逐句打分 -> (可选)聚合
//!
//! 流水线构造后不可变，可以在多个任务间共享（`Arc`）

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use entity_sentiment_core::{AppError, AppResult};

use crate::aggregator::with_aggregate;
use crate::clause_mapper::{map_entities_to_clauses, EntityClauseMap};
use crate::clause_splitter::split_into_clauses;
use crate::entity_extractor::{matches_filter, EntityExtractor};
use crate::entity_recognizer::EntityRecognizer;
use crate::sentiment_analyzer::{ClauseScore, SentimentClassifier};
use crate::types::{SentimentRequest, SentimentRow};

mod factory;

pub use factory::{build_classifier, build_pipeline, build_recognizer};

/// 预热探测使用的固定文本
const WARMUP_TEXT: &str = "Apple shares rose.";

pub struct EntitySentimentPipeline {
    recognizer: Arc<dyn EntityRecognizer>,
    classifier: Arc<dyn SentimentClassifier>,
    extractor: EntityExtractor,
}

impl EntitySentimentPipeline {
    pub fn new(
        recognizer: Arc<dyn EntityRecognizer>,
        classifier: Arc<dyn SentimentClassifier>,
    ) -> Self {
        Self {
            recognizer,
            classifier,
            extractor: EntityExtractor::default(),
        }
    }

    pub fn with_extractor(mut self, extractor: EntityExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// 启动探测：两个协作方各调用一次，失败即返回错误
    pub async fn warm_up(&self) -> AppResult<()> {
        self.recognizer
            .recognize(WARMUP_TEXT)
            .await
            .map_err(|e| AppError::RecognizerError(format!("{:#}", e)))?;
        self.classifier
            .classify(WARMUP_TEXT)
            .await
            .map_err(|e| AppError::ClassifierError(format!("{:#}", e)))?;
        info!("流水线预热完成");
        Ok(())
    }

    pub async fn analyze_text(
        &self,
        text: &str,
        entity_filter: Option<&str>,
    ) -> AppResult<Vec<SentimentRow>> {
        let mut request = SentimentRequest::new(text);
        request.entity_filter = entity_filter.map(str::to_string);
        self.analyze(&request).await
    }

    /// 结果顺序：实体按抽取顺序，同一实体内分句按原文顺序；聚合行（如有）在最后
    #[instrument(skip_all, fields(text_len = request.text.len()))]
    pub async fn analyze(&self, request: &SentimentRequest) -> AppResult<Vec<SentimentRow>> {
        let text = request.text.as_str();
        let filter = request.active_filter();

        let spans = self.recognizer.recognize(text).await.map_err(|e| {
            error!("实体识别失败: {:#}", e);
            AppError::RecognizerError(format!("{:#}", e))
        })?;

        let mut entities = self.extractor.extract(&spans, text);
        if let Some(filter) = filter {
            entities.retain(|entity| matches_filter(entity, filter));
        }
        if entities.is_empty() {
            debug!("未找到实体, filter: {:?}", filter);
            return Ok(Vec::new());
        }

        let clauses = split_into_clauses(text);
        let mapping = map_entities_to_clauses(&clauses, &entities);
        debug!(
            "实体 {} 个, 分句 {} 个, 匹配对 {} 个",
            entities.len(),
            clauses.len(),
            mapping.pair_count()
        );
        if mapping.is_empty() {
            return Ok(Vec::new());
        }

        let scores = self.score_clauses(&mapping).await?;
        let mut rows = Vec::with_capacity(mapping.pair_count());
        for (entity, clauses) in mapping.iter() {
            for clause in clauses {
                let score = scores.get(clause).ok_or_else(|| {
                    AppError::ClassifierError(format!("missing score for clause: {}", clause))
                })?;
                rows.push(SentimentRow::clause_row(entity, clause, score.score));
            }
        }

        let rows = with_aggregate(rows, filter);
        info!("情绪分析完成: {} 行", rows.len());
        Ok(rows)
    }

    /// 相同文本的分句只打一次分
    async fn score_clauses(&self, mapping: &EntityClauseMap) -> AppResult<HashMap<String, ClauseScore>> {
        let mut unique: Vec<String> = Vec::new();
        for (_, clauses) in mapping.iter() {
            for clause in clauses {
                if !unique.contains(clause) {
                    unique.push(clause.clone());
                }
            }
        }

        let probs = self.classifier.classify_batch(&unique).await.map_err(|e| {
            error!("情绪分类失败: {:#}", e);
            AppError::ClassifierError(format!("{:#}", e))
        })?;
        if probs.len() != unique.len() {
            return Err(AppError::ClassifierError(format!(
                "expected {} results, got {}",
                unique.len(),
                probs.len()
            )));
        }

        Ok(unique
            .into_iter()
            .zip(probs)
            .map(|(clause, p)| (clause, ClauseScore::from(p)))
            .collect())
    }
}
