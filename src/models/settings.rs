//! # 设置数据模型
//!
//! 定义存储键名以及主题、壁纸、配置快照等结构体。
//!
//! 每个设置项都是独立的字符串键值对，互不关联，后写覆盖先写，
//! 除去首尾空白外不做任何校验。与对话历史仅共享同一个存储介质。

use serde::{Deserialize, Serialize};

/// 对话历史（JSON 数组）
pub const KEY_CHAT_HISTORY: &str = "chat_history";
/// API Key（Bearer 凭证，明文）
pub const KEY_API_KEY: &str = "ai_api_key";
/// 主题标识符，作为全局样式作用域类名
pub const KEY_THEME: &str = "theme";
/// 壁纸图片 URL
pub const KEY_WALLPAPER_URL: &str = "wallpaper_url";
/// 壁纸图片数据（data URL）
pub const KEY_WALLPAPER_IMAGE_DATA: &str = "wallpaper_image_data";
/// 壁纸效果：`normal` | `blur`
pub const KEY_WALLPAPER_EFFECT: &str = "wallpaper_effect";
/// 模糊半径（像素）
pub const KEY_WALLPAPER_BLUR: &str = "wallpaper_blur";
/// 透明模式：值为 `"true"` 时开启
pub const KEY_WALLPAPER_TRANSPARENT: &str = "wallpaper_transparent";
/// 不透明度：0–100 的整数字符串
pub const KEY_WALLPAPER_OPACITY: &str = "wallpaper_opacity";

/// 未设置主题时使用的默认主题（黑白命令行风格）
pub const DEFAULT_THEME: &str = "theme-cmd-white";

/// 壁纸显示效果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WallpaperEffect {
    /// 原样显示
    #[default]
    Normal,
    /// 高斯模糊
    Blur,
}

impl WallpaperEffect {
    /// 从存储值解析，未知值回退为 `Normal`
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "blur" => WallpaperEffect::Blur,
            _ => WallpaperEffect::Normal,
        }
    }

    /// 存储用字符串
    pub fn as_str(self) -> &'static str {
        match self {
            WallpaperEffect::Normal => "normal",
            WallpaperEffect::Blur => "blur",
        }
    }
}

/// 壁纸设置
///
/// 对应前端壁纸合成器读取的六个存储键。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallpaperSettings {
    /// 壁纸图片 URL（可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// 本地上传的图片数据（可选，优先于 URL）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    /// 显示效果
    pub effect: WallpaperEffect,
    /// 模糊半径（像素），仅 `Blur` 效果使用
    pub blur: u32,
    /// 是否启用界面透明
    pub transparent: bool,
    /// 不透明度百分比（0–100）
    pub opacity: u8,
}

impl Default for WallpaperSettings {
    fn default() -> Self {
        Self {
            url: None,
            image_data: None,
            effect: WallpaperEffect::Normal,
            blur: 0,
            transparent: false,
            opacity: 100,
        }
    }
}

/// 前端设置面板一次性读取的配置快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// 当前 API Key（未配置时为 None）
    pub api_key: Option<String>,
    /// 当前主题
    pub theme: String,
    /// 壁纸设置
    pub wallpaper: WallpaperSettings,
}
