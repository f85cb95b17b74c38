//! # 持久化存储服务
//!
//! 提供扁平的字符串键值存储能力（对应浏览器的 localStorage），
//! 以 `Store` trait 的形式注入到对话控制器、渲染空状态检查和设置面板中，
//! 不存在任何全局可变状态。
//!
//! ## 实现
//! - `MemoryStore` - 纯内存实现，用于测试
//! - `FileStore` - 内存映射 + 写穿到 JSON 文件（`~/.code-syncer/local-storage.json`）
//!
//! ## 契约
//! 所有操作同步完成且不向调用方暴露失败：文件写入失败只记录日志。
//! 没有事务：相关联的两次写入之间崩溃，会停留在第一次写入之前的状态。
//!
//! ## 历史记录辅助函数
//! 历史记录整体序列化存放在 `chat_history` 键下，追加采用"读全量 → push → 写全量"，
//! 不是原子追加；多个窗口同时写入时后写覆盖先写。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::models::message::{History, Message};
use crate::models::settings::KEY_CHAT_HISTORY;

/// 键值存储能力
pub trait Store: Send + Sync {
    /// 读取键值，不存在时返回 None
    fn get(&self, key: &str) -> Option<String>;

    /// 写入键值（覆盖）
    fn set(&self, key: &str, value: &str);

    /// 删除键
    fn remove(&self, key: &str);
}

// ============ 内存实现 ============

/// 纯内存存储
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// 创建空的内存存储
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}

// ============ 文件实现 ============

/// JSON 文件存储
///
/// 启动时一次性加载文件内容到内存，之后每次 `set` / `remove` 都把完整映射写回文件。
/// 文件内容为格式化后的 JSON 对象，键值均为字符串。
///
/// 写入是同步的：`set` / `remove` 返回时文件已写完，写锁覆盖整个写入过程，
/// 两次写入不会乱序落盘。在异步上下文中调用会短暂阻塞当前工作线程。
pub struct FileStore {
    /// 存储文件的绝对路径
    path: PathBuf,
    /// 内存中的键值映射
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// 打开（或准备创建）指定路径的存储文件
    ///
    /// 文件不存在时以空映射开始；文件损坏时记录警告并同样以空映射开始，
    /// 原文件保留到下一次写入时才被覆盖。
    ///
    /// # 参数
    /// - `path` - 存储文件路径，父目录不存在时会在首次写入时创建
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        log::info!("存储已加载: {} ({} 个键)", path.display(), entries.len());
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// 将当前映射写回文件
    fn flush(&self, entries: &HashMap<String, String>) {
        if let Err(e) = write_entries(&self.path, entries) {
            log::error!("写入存储文件失败 {}: {}", self.path.display(), e);
        }
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), value.to_string());
            self.flush(&entries);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            if entries.remove(key).is_some() {
                self.flush(&entries);
            }
        }
    }
}

/// 从文件加载键值映射
fn load_entries(path: &Path) -> HashMap<String, String> {
    if !path.exists() {
        return HashMap::new();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            log::warn!("读取存储文件失败 {}: {}", path.display(), e);
            return HashMap::new();
        }
    };

    serde_json::from_str(&content).unwrap_or_else(|e| {
        log::warn!("解析存储文件失败 {}: {}", path.display(), e);
        HashMap::new()
    })
}

/// 将键值映射序列化写入文件，必要时创建父目录
fn write_entries(path: &Path, entries: &HashMap<String, String>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, content)
}

// ============ 历史记录辅助函数 ============

/// 读取完整历史记录
///
/// 键不存在时视为空数组；内容不是合法的消息数组时记录警告并同样视为空历史。
pub fn read_history(store: &dyn Store) -> History {
    let Some(raw) = store.get(KEY_CHAT_HISTORY) else {
        return Vec::new();
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        log::warn!("历史记录已损坏，按空历史处理: {}", e);
        Vec::new()
    })
}

/// 用给定历史整体覆盖存储中的历史记录
pub fn write_history(store: &dyn Store, history: &[Message]) {
    match serde_json::to_string(history) {
        Ok(json) => store.set(KEY_CHAT_HISTORY, &json),
        Err(e) => log::error!("序列化历史记录失败: {}", e),
    }
}

/// 追加一条消息：读取全量历史、push、写回全量，返回追加后的历史
pub fn append_message(store: &dyn Store, message: Message) -> History {
    let mut history = read_history(store);
    history.push(message);
    write_history(store, &history);
    history
}

/// 清空历史记录（删除存储键）
pub fn clear_history(store: &dyn Store) {
    store.remove(KEY_CHAT_HISTORY);
}
