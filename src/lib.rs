//! # Entity Sentiment
//!
//! 金融文本实体级情绪分析程序入口

use anyhow::Result;
use dotenv::dotenv;
use tracing::info;

pub mod app;

// 重新导出核心依赖
pub use entity_sentiment_ai::*;
pub use entity_sentiment_core::{config, logger, AppError, AppResult};

/// 应用初始化：加载 .env 并设置日志
pub fn app_init() -> Result<()> {
    dotenv().ok();
    entity_sentiment_core::logger::setup_logging()?;
    info!("应用初始化完成");
    Ok(())
}
