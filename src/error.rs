//! # 错误类型
//!
//! 对话回合中 AI 调用可能出现的全部失败，使用 `thiserror` 构建单一枚举。
//!
//! ## 分类
//! - **配置**（`MissingApiKey`）：未配置 API Key，控制器短路为提示消息，不发起网络请求
//! - **传输**（`Api` / `Network`）：非 2xx 状态码或网络异常
//! - **解析**（`Parse`）：响应体不是合法 JSON，或缺少 `choices[0].message.content`
//!
//! 三类错误在界面上渲染完全一致（通用错误气泡 + 重试按钮），
//! `kind()` 仅用于让分类在代码和测试中可检查。
//! 任何变体的消息都不包含 API Key。

use thiserror::Error;

/// 对话相关错误
#[derive(Debug, Error)]
pub enum ChatError {
    /// 未配置 API Key
    #[error("API Key is missing")]
    MissingApiKey,

    /// 接口返回非 2xx 状态码
    #[error("API Error: {status}")]
    Api { status: u16 },

    /// 网络层失败（连接、TLS、读取响应体等）
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 响应体无法解析出回复文本
    #[error("Invalid API response: {0}")]
    Parse(String),
}

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 配置缺失
    Configuration,
    /// 传输或接口层失败
    Transport,
    /// 响应解析失败
    Parse,
}

impl ChatError {
    /// 返回该错误所属的分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::MissingApiKey => ErrorKind::Configuration,
            ChatError::Api { .. } | ChatError::Network(_) => ErrorKind::Transport,
            ChatError::Parse(_) => ErrorKind::Parse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_carries_status() {
        let err = ChatError::Api { status: 500 };
        assert_eq!(err.to_string(), "API Error: 500");
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(ChatError::MissingApiKey.kind(), ErrorKind::Configuration);
        assert_eq!(
            ChatError::Parse("missing choices".into()).kind(),
            ErrorKind::Parse
        );
    }
}
