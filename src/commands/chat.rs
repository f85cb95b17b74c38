//! # 对话 Tauri Commands
//!
//! 提供聊天窗口的 Tauri command 处理函数：
//! - `load_history` - 按历史重建线程
//! - `send_message` - 提交一回合用户输入
//! - `retry_last_message` - 重试最近一次失败的回合
//! - `clear_history` - 清空历史（需前端确认）
//! - `copy_code` - 复制代码块到系统剪贴板
//! - `export_history` - 导出历史到用户选择的文件
//! - `should_focus_input` - 点击聚焦策略
//!
//! 回合进行中的中间状态（用户气泡、"Thinking..." 占位）通过 `chat://thread` 事件推送，
//! command 返回值是回合结束后的最终线程。

use serde::Serialize;
use tauri::{AppHandle, Emitter, State};
use tauri_plugin_dialog::DialogExt;

use crate::models::thread::Thread;
use crate::services::clipboard::{self, CopyOutcome, SystemClipboard};
use crate::services::export::{self, ExportFormat};
use crate::services::focus::{self, ClickTarget};
use crate::services::state::AppState;
use crate::services::store;
use crate::utils::path;

/// 复制按钮文案变化事件
pub const COPY_LABEL_EVENT: &str = "chat://copy-label";

/// 复制按钮文案事件负载
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CopyLabelPayload {
    node_id: u64,
    block_index: usize,
    label: &'static str,
}

/// 按历史记录重建线程并返回
#[tauri::command]
pub async fn load_history(state: State<'_, AppState>) -> Result<Thread, String> {
    let mut controller = state.controller.lock().await;
    controller.load_history();
    Ok(controller.thread().clone())
}

/// 提交一回合用户输入
///
/// 空白输入不做任何事，直接返回当前线程。
/// AI 调用失败不会作为 command 错误返回，而是以错误气泡的形式出现在线程中。
///
/// # 参数
/// - `input` - 输入框原文
/// - `state` - Tauri managed state
#[tauri::command]
pub async fn send_message(input: String, state: State<'_, AppState>) -> Result<Thread, String> {
    let mut controller = state.controller.lock().await;
    let outcome = controller.submit(&input).await;
    log::debug!("回合结束: {:?}", outcome);
    Ok(controller.thread().clone())
}

/// 重试最近一次失败的回合
#[tauri::command]
pub async fn retry_last_message(state: State<'_, AppState>) -> Result<Thread, String> {
    let mut controller = state.controller.lock().await;
    let outcome = controller.retry().await;
    log::debug!("重试结束: {:?}", outcome);
    Ok(controller.thread().clone())
}

/// 清空历史记录
///
/// # 参数
/// - `confirmed` - 用户是否已在确认对话框中同意；未确认时什么也不做
#[tauri::command]
pub async fn clear_history(confirmed: bool, state: State<'_, AppState>) -> Result<Thread, String> {
    let mut controller = state.controller.lock().await;
    controller.clear_history(confirmed);
    Ok(controller.thread().clone())
}

/// 复制指定消息中的代码块
///
/// 按钮文案的变化（"Copied!" → 2 秒后 "Copy"，或 "Error"）通过 `chat://copy-label` 事件推送。
/// 只读代码块索引，不等待进行中的回合。
///
/// # 参数
/// - `node_id` - 消息节点 id
/// - `block_index` - 代码块在该消息中的序号
///
/// # 错误
/// 节点或代码块不存在时返回错误
#[tauri::command]
pub async fn copy_code(
    node_id: u64,
    block_index: usize,
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<CopyOutcome, String> {
    let block = state
        .code_blocks
        .get(node_id, block_index)
        .ok_or_else(|| format!("代码块不存在: {}#{}", node_id, block_index))?;

    let outcome = clipboard::copy_code(&SystemClipboard, &block, |label| {
        let payload = CopyLabelPayload {
            node_id,
            block_index,
            label,
        };
        if let Err(e) = app.emit(COPY_LABEL_EVENT, payload) {
            log::warn!("推送复制按钮状态失败: {}", e);
        }
    })
    .await;

    Ok(outcome)
}

/// 导出历史记录
///
/// 弹出原生保存对话框，用户确认后写入所选文件。
///
/// # 参数
/// - `format` - 导出格式：`markdown` | `json` | `html`
///
/// # 返回值
/// 保存的文件路径；用户取消时返回 None
///
/// # 错误
/// 路径无效或文件写入失败时返回错误
#[tauri::command]
pub async fn export_history(
    format: ExportFormat,
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<Option<String>, String> {
    let history = store::read_history(state.store.as_ref());
    let content = export::export(&history, format);

    let extension = format.extension();
    let Some(file_path) = app
        .dialog()
        .file()
        .add_filter(extension.to_uppercase(), &[extension])
        .set_file_name(path::default_export_file_name(extension))
        .blocking_save_file()
    else {
        return Ok(None);
    };

    let target = file_path
        .into_path()
        .map_err(|e| format!("无效的保存路径: {}", e))?;
    tokio::fs::write(&target, content)
        .await
        .map_err(|e| format!("写入导出文件失败: {}", e))?;

    log::info!("已导出 {} 条消息到 {}", history.len(), target.display());
    Ok(Some(target.to_string_lossy().to_string()))
}

/// 判断一次点击后是否应聚焦输入框
#[tauri::command]
pub fn should_focus_input(target: ClickTarget) -> bool {
    focus::should_focus_input(&target)
}
