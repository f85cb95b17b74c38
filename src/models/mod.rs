//! # 数据模型模块
//!
//! 定义与前端一一对应的 Rust 数据结构，均通过 `serde` 序列化用于存储和 IPC 传输。
//! - `message` - 对话消息和角色
//! - `settings` - 存储键名、主题和壁纸设置
//! - `thread` - 聊天窗口的线程视图模型

pub mod message;
pub mod settings;
pub mod thread;
