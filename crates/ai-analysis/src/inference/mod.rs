//! 推理服务 HTTP 调用的公共部分

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

/// 推理服务通用选项
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct InferenceOptions {
    /// 模型冷启动时等待加载完成，而不是直接返回 503
    pub wait_for_model: bool,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            wait_for_model: true,
        }
    }
}

pub(crate) fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("failed to build inference http client")
}

/// POST JSON 并解析响应；非 2xx 状态码连同响应体一起作为错误返回
pub(crate) async fn post_json<B, R>(
    client: &Client,
    url: &str,
    token: Option<&str>,
    body: &B,
) -> Result<R>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let mut request = client.post(url).json(body);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .await
        .with_context(|| format!("POST {} failed", url))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .with_context(|| format!("failed to read response body from {}", url))?;

    if !status.is_success() {
        error!("推理服务返回错误: {} - {}", status, text);
        return Err(anyhow!("inference api error from {}: {} - {}", url, status, text));
    }

    debug!("推理服务响应: {} bytes", text.len());
    serde_json::from_str(&text)
        .with_context(|| format!("unexpected response format from {}: {}", url, text))
}
