//! 日志初始化

mod setup;

pub use setup::{setup_logging, setup_logging_with, LogConfig};
