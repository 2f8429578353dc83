use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use entity_sentiment::app::{self, strip_line_ending, OutputFormat};
use entity_sentiment::config::PipelineSettings;
use entity_sentiment::SentimentRequest;

/// 金融文本实体级情绪分析
#[derive(Debug, Parser)]
#[command(name = "entity_sentiment", version, about)]
struct Args {
    /// 待分析文本，不传时从 stdin 读取
    #[arg(short, long)]
    text: Option<String>,

    /// 目标实体（大小写不敏感的子串匹配），为空表示不过滤
    #[arg(short, long)]
    entity: Option<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl Args {
    fn into_request(self) -> Result<(SentimentRequest, OutputFormat)> {
        let text = match self.text {
            Some(text) => text,
            None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("failed to read text from stdin")?;
                strip_line_ending(&buf).to_string()
            }
        };
        let mut request = SentimentRequest::new(text);
        request.entity_filter = self
            .entity
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        Ok((request, self.format))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    entity_sentiment::app_init()?;

    let settings = PipelineSettings::from_env()?;
    let pipeline = app::bootstrap(&settings).await?;

    let (request, format) = args.into_request()?;
    match app::run(&pipeline, request, format).await {
        Ok(output) => {
            print!("{}", output);
            if format == OutputFormat::Json {
                println!();
            }
            Ok(())
        }
        Err(e) => {
            error!("分析失败: {}", e);
            Err(e.into())
        }
    }
}
