use std::sync::OnceLock;

use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::environment::{env_is_true, env_or_default};

// 全局变量用于保持日志文件句柄
static INFO_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
static ERROR_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

// 日志配置结构体
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub app_env: String,
    pub log_level: String,
    pub log_dir: String,
    pub log_rotation: String,
    pub info_file_name: String,
    pub error_file_name: String,
    pub enable_console_logging: bool,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            app_env: env_or_default("APP_ENV", "local").to_lowercase(),
            log_level: env_or_default("LOG_LEVEL", "info"),
            log_dir: env_or_default("LOG_DIR", "log_files"),
            log_rotation: env_or_default("LOG_ROTATION", "daily"),
            info_file_name: env_or_default("LOG_INFO_FILE", "info.log"),
            error_file_name: env_or_default("LOG_ERROR_FILE", "error.log"),
            enable_console_logging: env_is_true("ENABLE_CONSOLE_LOGGING", true),
        }
    }

    pub fn is_local(&self) -> bool {
        self.app_env == "local"
    }
}

// 解析时间轮转策略
fn parse_rotation(s: &str) -> Rotation {
    match s.to_lowercase().as_str() {
        "minutely" | "minute" | "min" => Rotation::MINUTELY,
        "hourly" | "hour" | "hr" => Rotation::HOURLY,
        "daily" | "day" => Rotation::DAILY,
        _ => Rotation::DAILY,
    }
}

// 控制台输出到 stderr，stdout 只留给分析结果
fn console_layer(config: &LogConfig, ansi: bool) -> BoxedLayer {
    fmt::layer()
        .with_ansi(ansi)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(&config.log_level))
        .boxed()
}

// 设置日志
pub fn setup_logging() -> anyhow::Result<()> {
    setup_logging_with(LogConfig::from_env())
}

pub fn setup_logging_with(config: LogConfig) -> anyhow::Result<()> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    // 本地环境：仅控制台输出
    if config.is_local() {
        layers.push(console_layer(&config, true));
        tracing::subscriber::set_global_default(Registry::default().with(layers))
            .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

        info!("Log configuration setup successfully!");
        info!(
            "Environment: {}, Log Level: {}, File Logging: {}, Console Logging: {}",
            config.app_env, config.log_level, false, true
        );
        return Ok(());
    }

    // 非本地环境：文件输出（可选控制台）
    std::fs::create_dir_all(&config.log_dir).map_err(|e| {
        anyhow::anyhow!("Failed to create log directory '{}': {}", config.log_dir, e)
    })?;

    let info_file = RollingFileAppender::new(
        parse_rotation(&config.log_rotation),
        &config.log_dir,
        &config.info_file_name,
    );
    let error_file = RollingFileAppender::new(
        parse_rotation(&config.log_rotation),
        &config.log_dir,
        &config.error_file_name,
    );

    let (info_non_blocking, info_guard) = tracing_appender::non_blocking(info_file);
    let (error_non_blocking, error_guard) = tracing_appender::non_blocking(error_file);

    layers.push(
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_level(true)
            .with_writer(info_non_blocking)
            .with_filter(EnvFilter::new(&config.log_level))
            .boxed(),
    );
    layers.push(
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_level(true)
            .with_writer(error_non_blocking)
            .with_filter(EnvFilter::new("error"))
            .boxed(),
    );
    if config.enable_console_logging {
        layers.push(console_layer(&config, false));
    }

    tracing::subscriber::set_global_default(Registry::default().with(layers))
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    // 保存guard到全局，防止被丢弃
    INFO_GUARD
        .set(info_guard)
        .map_err(|_| anyhow::anyhow!("Failed to set INFO_GUARD"))?;
    ERROR_GUARD
        .set(error_guard)
        .map_err(|_| anyhow::anyhow!("Failed to set ERROR_GUARD"))?;

    info!("Log configuration setup successfully!");
    info!(
        "Environment: {}, Log Level: {}, File Logging: {}, Console Logging: {}",
        config.app_env, config.log_level, true, config.enable_console_logging
    );
    Ok(())
}
