//! # AI 补全客户端
//!
//! 封装唯一的一次出站网络调用：把系统提示 + 完整历史作为有序消息列表
//! POST 到 OpenRouter 兼容的 chat completions 接口，返回助手回复文本。
//!
//! - 单次请求，不重试、不流式
//! - 不设置显式超时，等待时长由底层网络栈决定
//! - 非 2xx 状态码 → `ChatError::Api`；网络异常 → `ChatError::Network`；
//!   响应体缺少 `choices[0].message.content` → `ChatError::Parse`

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::ChatError;
use crate::models::message::Message;

/// 默认补全接口地址
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
/// 默认模型
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct:free";
/// 客户端标识（`X-Title` 请求头）
pub const DEFAULT_TITLE: &str = "Code Syncer";
/// 默认来源页（`HTTP-Referer` 请求头）
pub const DEFAULT_REFERER: &str = "tauri://localhost";
/// 每次请求前置的系统提示
pub const SYSTEM_PROMPT: &str =
    "You are a helpful coding assistant. Answer questions and provide code snippets.";

/// 补全能力
///
/// 对话控制器只依赖此 trait，测试中以脚本化实现替换真实网络调用。
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// 基于完整历史请求一条助手回复
    ///
    /// # 参数
    /// - `history` - 完整的持久化历史（不截断、不加窗口）
    /// - `api_key` - Bearer 凭证
    async fn complete(&self, history: &[Message], api_key: &str) -> Result<String, ChatError>;
}

/// 客户端配置
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// 补全接口完整 URL
    pub endpoint: String,
    /// 模型标识
    pub model: String,
    /// `HTTP-Referer` 请求头
    pub referer: String,
    /// `X-Title` 请求头
    pub title: String,
    /// 系统提示
    pub system_prompt: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

impl ClientConfig {
    /// 替换接口地址（测试中指向 mock 服务器）
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// 请求体中的单条消息
#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// 请求体
#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
}

/// OpenRouter chat completions 客户端
pub struct OpenRouterClient {
    client: Client,
    config: ClientConfig,
}

impl OpenRouterClient {
    /// 使用给定配置创建客户端
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// 构造请求体：系统提示在前，随后是完整历史
    fn build_request<'a>(&'a self, history: &'a [Message]) -> CompletionRequest<'a> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(WireMessage {
            role: "system",
            content: &self.config.system_prompt,
        });
        messages.extend(history.iter().map(|m| WireMessage {
            role: m.role.as_str(),
            content: &m.content,
        }));
        CompletionRequest {
            model: &self.config.model,
            messages,
        }
    }
}

impl Default for OpenRouterClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, history: &[Message], api_key: &str) -> Result<String, ChatError> {
        let body = self.build_request(history);
        log::info!(
            "请求 AI 回复: model={}, 历史消息 {} 条",
            self.config.model,
            history.len()
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("AI 接口返回错误状态: {}", status);
            return Err(ChatError::Api {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        extract_reply(&text)
    }
}

/// 从响应体中取出 `choices[0].message.content`
fn extract_reply(body: &str) -> Result<String, ChatError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ChatError::Parse(format!("response is not JSON: {}", e)))?;

    value
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| ChatError::Parse("missing choices[0].message.content".to_string()))
}
