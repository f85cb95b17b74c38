//! # Tauri Command 处理模块
//!
//! 本模块包含所有注册到 Tauri 的 command 处理函数。
//! 每个子模块对应一个功能域：
//! - `chat` - 对话线程：加载、发送、重试、清空、复制代码、导出
//! - `settings` - 设置：API Key、主题、壁纸

pub mod chat;
pub mod settings;
