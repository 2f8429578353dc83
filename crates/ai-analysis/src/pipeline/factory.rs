use std::sync::Arc;

use tracing::info;

use entity_sentiment_core::config::{PipelineSettings, RecognizerBackend};
use entity_sentiment_core::{AppError, AppResult};

use super::EntitySentimentPipeline;
use crate::entity_extractor::EntityExtractor;
use crate::entity_recognizer::{EntityRecognizer, GazetteerRecognizer, HttpEntityRecognizer};
use crate::sentiment_analyzer::{HttpSentimentClassifier, SentimentClassifier};

/// 按配置选择实体识别后端
pub fn build_recognizer(settings: &PipelineSettings) -> AppResult<Arc<dyn EntityRecognizer>> {
    match settings.recognizer_backend {
        RecognizerBackend::Http => {
            let recognizer = HttpEntityRecognizer::from_settings(settings)
                .map_err(|e| AppError::ConfigError(format!("{:#}", e)))?;
            info!("实体识别: 远程模型 {}", settings.ner.url());
            Ok(Arc::new(recognizer))
        }
        RecognizerBackend::Gazetteer => {
            let path = settings.gazetteer_path.as_ref().ok_or_else(|| {
                AppError::ConfigError("NER_GAZETTEER_PATH is not set".to_string())
            })?;
            let recognizer = GazetteerRecognizer::from_path(path)
                .map_err(|e| AppError::ConfigError(format!("{:#}", e)))?;
            if recognizer.is_empty() {
                return Err(AppError::ConfigError(format!(
                    "gazetteer {} has no entries",
                    path.display()
                )));
            }
            info!("实体识别: 本地词典 {}", path.display());
            Ok(Arc::new(recognizer))
        }
    }
}

pub fn build_classifier(settings: &PipelineSettings) -> AppResult<Arc<dyn SentimentClassifier>> {
    let classifier = HttpSentimentClassifier::from_settings(settings)
        .map_err(|e| AppError::ConfigError(format!("{:#}", e)))?;
    info!("情绪分类: 远程模型 {}", settings.sentiment.url());
    Ok(Arc::new(classifier))
}

pub fn build_pipeline(settings: &PipelineSettings) -> AppResult<EntitySentimentPipeline> {
    settings.validate()?;
    let pipeline = EntitySentimentPipeline::new(build_recognizer(settings)?, build_classifier(settings)?)
        .with_extractor(EntityExtractor::new(&settings.entity_types));
    Ok(pipeline)
}
