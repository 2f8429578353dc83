//! # Entity Sentiment Core
//!
//! 核心基础设施：配置、日志、错误类型

pub mod config;
pub mod error;
pub mod logger;

pub use error::{AppError, AppResult};
