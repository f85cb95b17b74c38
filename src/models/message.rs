//! # 消息数据模型
//!
//! 定义对话历史中的单条消息（Message）和发送者角色（Role）。
//!
//! 历史记录以 JSON 数组整体存放在存储键 `chat_history` 下，
//! 数组下标即时间顺序，只追加、不重排。
//! 消息内容是纯文本，其中的围栏代码块和行内代码只是渲染提示，
//! 仅在渲染阶段解析，不会拆成独立字段存储。

use serde::{Deserialize, Serialize};

/// 消息发送者角色
///
/// 序列化为小写字符串，与 chat completions 接口的 `role` 字段一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 用户输入
    User,
    /// AI 回复
    Assistant,
}

impl Role {
    /// 接口中的角色字符串
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// 发送者显示名：用户为 "You"，其余为 "AI"
    pub fn sender_label(self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "AI",
        }
    }

    /// 消息气泡的样式类名（assistant 映射为 `ai`）
    pub fn style_class(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "ai",
        }
    }
}

/// 单条对话消息
///
/// 存储格式：`{"role": "user", "content": "hello"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// 发送者角色
    pub role: Role,
    /// 消息原文（未转义、未格式化）
    pub content: String,
}

impl Message {
    /// 构造一条用户消息
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// 构造一条 AI 回复消息
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// 对话历史：按时间顺序排列的消息列表
pub type History = Vec<Message>;
