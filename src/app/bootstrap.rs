use tracing::{error, info};

use entity_sentiment_ai::{build_pipeline, EntitySentimentPipeline, SentimentRequest};
use entity_sentiment_core::config::PipelineSettings;
use entity_sentiment_core::AppResult;

use super::report::{OutputFormat, SentimentReport};

/// 读取配置并构建流水线；PIPELINE_WARMUP 开启时先探测两个协作方
pub async fn bootstrap(settings: &PipelineSettings) -> AppResult<EntitySentimentPipeline> {
    let pipeline = build_pipeline(settings)?;
    if settings.warmup {
        info!("PIPELINE_WARMUP 已启用");
        if let Err(e) = pipeline.warm_up().await {
            error!("流水线预热失败: {}", e);
            return Err(e);
        }
    }
    Ok(pipeline)
}

/// 去掉 stdin 末尾的一个换行（\n 或 \r\n），其余内容原样交给流水线
pub fn strip_line_ending(text: &str) -> &str {
    text.strip_suffix('\n')
        .map(|t| t.strip_suffix('\r').unwrap_or(t))
        .unwrap_or(text)
}

/// 分析一段文本并返回渲染好的输出
pub async fn run(
    pipeline: &EntitySentimentPipeline,
    request: SentimentRequest,
    format: OutputFormat,
) -> AppResult<String> {
    let rows = pipeline.analyze(&request).await?;
    let report = SentimentReport::new(request.active_filter(), rows);
    report.render(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_ending_keeps_other_whitespace() {
        assert_eq!(strip_line_ending("Apple fell but \n"), "Apple fell but ");
        assert_eq!(strip_line_ending("Apple fell\r\n"), "Apple fell");
        assert_eq!(strip_line_ending("  Apple fell  "), "  Apple fell  ");
        assert_eq!(strip_line_ending("Apple fell\n\n"), "Apple fell\n");
        assert_eq!(strip_line_ending(""), "");
    }
}
