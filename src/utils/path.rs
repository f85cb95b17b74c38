//! # 路径工具函数
//!
//! 提供应用数据目录相关的路径解析：
//! - 获取应用数据目录（`~/.code-syncer/`）
//! - 获取持久化存储文件路径（`~/.code-syncer/local-storage.json`）

use std::path::{Path, PathBuf};

/// 应用数据目录名
const APP_DIR_NAME: &str = ".code-syncer";

/// 存储文件名
const STORAGE_FILE_NAME: &str = "local-storage.json";

/// 获取应用数据目录的绝对路径
///
/// 使用 `dirs` crate 获取跨平台的主目录路径。
///
/// # 错误
/// 如果无法确定用户主目录（极端情况，如无 HOME 环境变量），返回错误信息。
///
/// # 示例
/// - Windows: `C:\Users\username\.code-syncer`
/// - Linux/macOS: `/home/username/.code-syncer`
pub fn get_app_data_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or_else(|| "无法获取用户主目录".to_string())?;
    Ok(home.join(APP_DIR_NAME))
}

/// 获取存储文件的绝对路径
pub fn get_storage_path() -> Result<PathBuf, String> {
    Ok(storage_file_in(&get_app_data_path()?))
}

/// 在指定数据目录下定位存储文件
pub fn storage_file_in(data_dir: &Path) -> PathBuf {
    data_dir.join(STORAGE_FILE_NAME)
}

/// 导出文件的默认文件名（如 `chat-history.md`）
pub fn default_export_file_name(extension: &str) -> String {
    format!("chat-history.{}", extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_file_in() {
        let path = storage_file_in(Path::new("/tmp/app"));
        assert_eq!(path, Path::new("/tmp/app").join("local-storage.json"));
    }

    #[test]
    fn test_default_export_file_name() {
        assert_eq!(default_export_file_name("md"), "chat-history.md");
    }
}
