//! # 设置 Tauri Commands
//!
//! 提供设置面板、主题切换器和壁纸合成器使用的 command 处理函数：
//! - `get_storage_path` - 获取存储文件路径
//! - `read_config` - 读取 API Key / 主题 / 壁纸的完整快照
//! - `save_api_key` - 保存或清除 API Key
//! - `set_theme` - 切换主题
//! - `save_wallpaper` - 保存壁纸设置

use tauri::State;

use crate::models::settings::{AppConfig, WallpaperSettings};
use crate::services::config;
use crate::services::state::AppState;
use crate::utils::path;

/// 获取存储文件的绝对路径
///
/// # 错误
/// 如果无法确定用户主目录，返回错误信息
#[tauri::command]
pub async fn get_storage_path() -> Result<String, String> {
    let path = path::get_storage_path()?;
    Ok(path.to_string_lossy().to_string())
}

/// 读取配置快照
///
/// 首次读取时若尚未设置主题，会写入默认主题。
#[tauri::command]
pub async fn read_config(state: State<'_, AppState>) -> Result<AppConfig, String> {
    Ok(config::read_config(state.store.as_ref()))
}

/// 保存 API Key
///
/// # 参数
/// - `value` - 设置面板输入框原文；去除空白后为空则清除已保存的 Key
///
/// # 返回值
/// 给用户的提示文案（"Configuration Saved." 或 "Configuration Cleared."）
#[tauri::command]
pub async fn save_api_key(value: String, state: State<'_, AppState>) -> Result<String, String> {
    let notice = config::save_api_key(state.store.as_ref(), &value);
    Ok(notice.message().to_string())
}

/// 切换主题，返回实际保存的主题名
#[tauri::command]
pub async fn set_theme(theme: String, state: State<'_, AppState>) -> Result<String, String> {
    Ok(config::set_theme(state.store.as_ref(), &theme))
}

/// 保存壁纸设置
#[tauri::command]
pub async fn save_wallpaper(
    wallpaper: WallpaperSettings,
    state: State<'_, AppState>,
) -> Result<(), String> {
    config::save_wallpaper(state.store.as_ref(), &wallpaper);
    Ok(())
}
