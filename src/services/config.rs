//! # 设置读写服务
//!
//! 设置面板、主题切换器和壁纸合成器通过此模块读写存储中的独立设置键。
//! 每个键独立、后写覆盖先写，除去首尾空白外不做校验；解析失败的值回退为默认值。

use crate::models::settings::{
    AppConfig, DEFAULT_THEME, KEY_API_KEY, KEY_THEME, KEY_WALLPAPER_BLUR,
    KEY_WALLPAPER_EFFECT, KEY_WALLPAPER_IMAGE_DATA, KEY_WALLPAPER_OPACITY,
    KEY_WALLPAPER_TRANSPARENT, KEY_WALLPAPER_URL, WallpaperEffect, WallpaperSettings,
};
use crate::services::store::Store;

/// 保存 API Key 后给用户的提示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyNotice {
    /// 已保存
    Saved,
    /// 输入为空，已清除
    Cleared,
}

impl ApiKeyNotice {
    /// 提示文案
    pub fn message(self) -> &'static str {
        match self {
            ApiKeyNotice::Saved => "Configuration Saved.",
            ApiKeyNotice::Cleared => "Configuration Cleared.",
        }
    }
}

/// 读取去除空白后的非空值
fn read_trimmed(store: &dyn Store, key: &str) -> Option<String> {
    store
        .get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 写入去除空白后的值；为空时删除键
fn write_trimmed(store: &dyn Store, key: &str, value: Option<&str>) {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => store.set(key, v),
        None => store.remove(key),
    }
}

/// 读取 API Key
pub fn read_api_key(store: &dyn Store) -> Option<String> {
    read_trimmed(store, KEY_API_KEY)
}

/// 保存 API Key
///
/// 去除首尾空白后非空则保存，否则删除已保存的 Key。
pub fn save_api_key(store: &dyn Store, value: &str) -> ApiKeyNotice {
    let value = value.trim();
    if value.is_empty() {
        store.remove(KEY_API_KEY);
        log::info!("API Key 已清除");
        ApiKeyNotice::Cleared
    } else {
        store.set(KEY_API_KEY, value);
        log::info!("API Key 已保存");
        ApiKeyNotice::Saved
    }
}

/// 读取当前主题；未设置时写入并返回默认主题
pub fn load_theme(store: &dyn Store) -> String {
    match read_trimmed(store, KEY_THEME) {
        Some(theme) => theme,
        None => set_theme(store, DEFAULT_THEME),
    }
}

/// 切换主题，返回实际保存的主题名
pub fn set_theme(store: &dyn Store, theme: &str) -> String {
    let theme = theme.trim();
    let theme = if theme.is_empty() { DEFAULT_THEME } else { theme };
    store.set(KEY_THEME, theme);
    theme.to_string()
}

/// 读取壁纸设置
pub fn load_wallpaper(store: &dyn Store) -> WallpaperSettings {
    let defaults = WallpaperSettings::default();
    WallpaperSettings {
        url: read_trimmed(store, KEY_WALLPAPER_URL),
        image_data: read_trimmed(store, KEY_WALLPAPER_IMAGE_DATA),
        effect: read_trimmed(store, KEY_WALLPAPER_EFFECT)
            .map(|v| WallpaperEffect::parse(&v))
            .unwrap_or(defaults.effect),
        blur: read_trimmed(store, KEY_WALLPAPER_BLUR)
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.blur),
        transparent: read_trimmed(store, KEY_WALLPAPER_TRANSPARENT).as_deref() == Some("true"),
        opacity: read_trimmed(store, KEY_WALLPAPER_OPACITY)
            .and_then(|v| v.parse::<i64>().ok())
            .map(|v| v.clamp(0, 100) as u8)
            .unwrap_or(defaults.opacity),
    }
}

/// 保存壁纸设置（六个键逐一覆盖）
pub fn save_wallpaper(store: &dyn Store, wallpaper: &WallpaperSettings) {
    write_trimmed(store, KEY_WALLPAPER_URL, wallpaper.url.as_deref());
    write_trimmed(store, KEY_WALLPAPER_IMAGE_DATA, wallpaper.image_data.as_deref());
    store.set(KEY_WALLPAPER_EFFECT, wallpaper.effect.as_str());
    store.set(KEY_WALLPAPER_BLUR, &wallpaper.blur.to_string());
    store.set(
        KEY_WALLPAPER_TRANSPARENT,
        if wallpaper.transparent { "true" } else { "false" },
    );
    store.set(KEY_WALLPAPER_OPACITY, &wallpaper.opacity.min(100).to_string());
}

/// 读取设置面板所需的完整配置快照
pub fn read_config(store: &dyn Store) -> AppConfig {
    AppConfig {
        api_key: read_api_key(store),
        theme: load_theme(store),
        wallpaper: load_wallpaper(store),
    }
}
