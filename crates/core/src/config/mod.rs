//! 配置管理模块

pub mod environment;
pub mod pipeline;

// 重新导出
pub use environment::*;
pub use pipeline::{ApiToken, EndpointSettings, PipelineSettings, RecognizerBackend};
