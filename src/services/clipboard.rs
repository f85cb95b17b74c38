//! # 代码块复制
//!
//! 复制按钮的完整交互：把代码块纯文本写入系统剪贴板，
//! 成功时按钮显示 "Copied!" 并在 2 秒后恢复原文案，失败时显示 "Error"（不恢复）。
//! 复制失败只影响按钮本身，不会在对话线程中产生错误气泡。

use std::time::Duration;

use serde::Serialize;

use crate::services::renderer::CodeBlock;

/// 按钮默认文案
pub const LABEL_COPY: &str = "Copy";
/// 复制成功文案
pub const LABEL_COPIED: &str = "Copied!";
/// 复制失败文案
pub const LABEL_ERROR: &str = "Error";
/// "Copied!" 的显示时长
pub const COPIED_DISPLAY: Duration = Duration::from_secs(2);

/// 系统剪贴板能力
pub trait Clipboard: Send + Sync {
    /// 写入纯文本
    fn write_text(&self, text: &str) -> Result<(), String>;
}

/// 复制结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyOutcome {
    /// 已写入剪贴板
    Copied,
    /// 写入失败
    Failed,
}

/// 复制代码块并驱动按钮文案变化
///
/// # 参数
/// - `clipboard` - 剪贴板实现
/// - `block` - 要复制的代码块
/// - `set_label` - 按钮文案回调；成功时依次收到 "Copied!"、"Copy"，失败时收到 "Error"
pub async fn copy_code<F>(clipboard: &dyn Clipboard, block: &CodeBlock, mut set_label: F) -> CopyOutcome
where
    F: FnMut(&'static str),
{
    match clipboard.write_text(&block.plain_text()) {
        Ok(()) => {
            set_label(LABEL_COPIED);
            tokio::time::sleep(COPIED_DISPLAY).await;
            set_label(LABEL_COPY);
            CopyOutcome::Copied
        }
        Err(e) => {
            log::error!("复制代码失败: {}", e);
            set_label(LABEL_ERROR);
            CopyOutcome::Failed
        }
    }
}

/// 系统剪贴板（桌面端）
///
/// 每次写入时重新打开剪贴板句柄，不跨线程持有。
#[cfg(feature = "desktop")]
pub struct SystemClipboard;

#[cfg(feature = "desktop")]
impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), String> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| format!("打开剪贴板失败: {}", e))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| format!("写入剪贴板失败: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::message::Role;
    use crate::services::renderer::render_message;
    use std::sync::RwLock;

    /// 内存剪贴板（测试用）
    #[derive(Default)]
    struct MemoryClipboard {
        contents: RwLock<Option<String>>,
        fail: bool,
    }

    impl MemoryClipboard {
        /// 正常工作的剪贴板
        fn new() -> Self {
            Self::default()
        }

        /// 每次写入都失败的剪贴板
        fn failing() -> Self {
            Self {
                contents: RwLock::new(None),
                fail: true,
            }
        }

        /// 当前内容
        fn contents(&self) -> Option<String> {
            self.contents.read().ok()?.clone()
        }
    }

    impl Clipboard for MemoryClipboard {
        fn write_text(&self, text: &str) -> Result<(), String> {
            if self.fail {
                return Err("clipboard unavailable".to_string());
            }
            let mut contents = self
                .contents
                .write()
                .map_err(|_| "clipboard lock poisoned".to_string())?;
            *contents = Some(text.to_string());
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_yields_original_body_and_reverts_label() {
        let body = "let x = a < b && c > d;";
        let rendered = render_message(Role::Assistant, &format!("```rust\n{}```", body));
        let clipboard = MemoryClipboard::new();
        let mut labels = Vec::new();

        let started = tokio::time::Instant::now();
        let outcome = copy_code(&clipboard, &rendered.code_blocks[0], |l| labels.push(l)).await;

        assert_eq!(outcome, CopyOutcome::Copied);
        assert_eq!(clipboard.contents().as_deref(), Some(body));
        assert_eq!(labels, vec![LABEL_COPIED, LABEL_COPY]);
        assert!(started.elapsed() >= COPIED_DISPLAY);
    }

    #[tokio::test]
    async fn test_copy_failure_shows_error_label() {
        let rendered = render_message(Role::Assistant, "```\nx```");
        let clipboard = MemoryClipboard::failing();
        let mut labels = Vec::new();

        let outcome = copy_code(&clipboard, &rendered.code_blocks[0], |l| labels.push(l)).await;

        assert_eq!(outcome, CopyOutcome::Failed);
        assert_eq!(labels, vec![LABEL_ERROR]);
        assert_eq!(clipboard.contents(), None);
    }
}
