//! # Code Syncer Chat - 应用核心
//!
//! 一个 AI 编程助手聊天窗口：渲染对话线程，把历史和设置持久化到本地存储，
//! 把用户输入连同完整历史转发给远端 chat completions 接口，并支持主题和壁纸配置。
//!
//! ## 模块结构
//! - `models/` - 数据模型（对应前端类型）
//! - `services/` - 核心业务逻辑（存储、渲染、AI 客户端、对话回合控制器）
//! - `commands/` - Tauri command 处理函数（IPC 接口层，仅 `desktop` 特性）
//! - `utils/` - 通用工具函数
//! - `error` - 错误类型
//!
//! ## 架构说明
//! 核心逻辑不依赖 Tauri，可在无 WebView 的环境下编译和测试；
//! `desktop` 特性在其上包一层 Tauri 窗口和 IPC commands。

pub mod error;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
use tauri::{Emitter, Manager};

#[cfg(feature = "desktop")]
use crate::models::thread::Thread;
#[cfg(feature = "desktop")]
use crate::services::ai_client::ClientConfig;
#[cfg(feature = "desktop")]
use crate::services::controller::ThreadListener;
#[cfg(feature = "desktop")]
use crate::services::state::AppState;

/// 线程变化事件名：回合中的每一步都会推送完整线程
#[cfg(feature = "desktop")]
pub const THREAD_EVENT: &str = "chat://thread";

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
/// Tauri 应用启动函数
///
/// 构建并运行 Tauri 应用实例：
/// 1. 注册插件（对话框；调试模式下额外注册日志）
/// 2. 在 `setup` 钩子中打开存储、创建对话控制器并注册为 managed state，
///    控制器的线程变化通过 `chat://thread` 事件推送给前端
/// 3. 注册所有自定义 Tauri commands
/// 4. 生成应用上下文并启动主事件循环
///
/// # Panics
/// 如果 Tauri 应用启动失败（例如配置文件缺失或窗口创建失败），
/// 将通过 `.expect()` 触发 panic 并输出错误信息。
pub fn run() {
    tauri::Builder::default()
        // 对话框插件：导出对话时的原生保存对话框
        .plugin(tauri_plugin_dialog::init())
        .invoke_handler(tauri::generate_handler![
            // 对话 commands
            commands::chat::load_history,
            commands::chat::send_message,
            commands::chat::retry_last_message,
            commands::chat::clear_history,
            commands::chat::copy_code,
            commands::chat::export_history,
            commands::chat::should_focus_input,
            // 设置 commands
            commands::settings::get_storage_path,
            commands::settings::read_config,
            commands::settings::save_api_key,
            commands::settings::set_theme,
            commands::settings::save_wallpaper,
        ])
        .setup(|app| {
            // 仅在开发调试模式下启用日志插件
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }

            let handle = app.handle().clone();
            let listener: ThreadListener = Box::new(move |thread: &Thread| {
                if let Err(e) = handle.emit(THREAD_EVENT, thread) {
                    log::warn!("推送线程状态失败: {}", e);
                }
            });
            let state = AppState::open_default(ClientConfig::default(), Some(listener))?;
            app.manage(state);
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
