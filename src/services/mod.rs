//! # 业务逻辑服务模块
//!
//! 包含核心业务逻辑的实现，与 Tauri command 层解耦：
//! - `store` - 键值存储能力（内存 / JSON 文件）和历史记录读写
//! - `renderer` - 消息渲染：HTML 转义、代码块提取、行内格式化
//! - `ai_client` - chat completions 补全客户端
//! - `controller` - 对话回合控制器：发送 → 等待 → 渲染 → 持久化 → 失败重试
//! - `config` - 设置读写（API Key、主题、壁纸）
//! - `clipboard` - 代码块复制与按钮文案
//! - `focus` - 点击聚焦输入框的策略
//! - `export` - 对话导出：Markdown / JSON / HTML
//! - `state` - 应用全局状态

pub mod ai_client;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod export;
pub mod focus;
pub mod renderer;
pub mod state;
pub mod store;
