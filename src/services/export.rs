//! # 对话导出服务
//!
//! 将对话历史导出为 Markdown、JSON 或带样式的独立 HTML 文档字符串。
//! 导出只读取历史，不修改任何状态。
//!
//! ## 导出策略
//! - **Markdown**：每条消息一个二级标题（发送者）+ 原文
//! - **JSON**：与存储格式一致的消息数组，美化输出
//! - **HTML**：复用消息渲染器生成气泡，内联样式，可直接打印为 PDF

use serde::Deserialize;

use crate::models::message::Message;
use crate::services::renderer;

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Json,
    Html,
}

impl ExportFormat {
    /// 文件扩展名
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        }
    }
}

/// 导出文档使用的标题
const DOCUMENT_TITLE: &str = "Code Syncer Chat";

/// 按指定格式导出
pub fn export(history: &[Message], format: ExportFormat) -> String {
    match format {
        ExportFormat::Markdown => to_markdown(history, DOCUMENT_TITLE),
        ExportFormat::Json => to_json(history),
        ExportFormat::Html => to_html(history, DOCUMENT_TITLE),
    }
}

/// 将历史导出为 Markdown 格式字符串
///
/// # 参数
/// - `history` - 对话历史
/// - `title` - 文档标题
pub fn to_markdown(history: &[Message], title: &str) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# {}", title));
    lines.push(String::new());
    lines.push(format!("消息数: {}", history.len()));
    lines.push(String::new());
    lines.push("---".into());
    lines.push(String::new());

    for msg in history {
        lines.push(format!("## {}", msg.role.sender_label()));
        lines.push(String::new());
        if !msg.content.is_empty() {
            lines.push(msg.content.clone());
        }
        lines.push(String::new());
        lines.push("---".into());
        lines.push(String::new());
    }

    lines.join("\n")
}

/// 将历史导出为美化的 JSON 数组（2 空格缩进）
pub fn to_json(history: &[Message]) -> String {
    serde_json::to_string_pretty(history).unwrap_or_else(|_| "[]".to_string())
}

/// 将历史导出为独立的 HTML 文档
///
/// 每条消息通过 `renderer::render_message` 生成，与聊天窗口中的显示保持一致；
/// 复制按钮在静态文档中没有意义，统一隐藏。
pub fn to_html(history: &[Message], title: &str) -> String {
    let body: String = history
        .iter()
        .map(|msg| {
            let fragment = renderer::render_message(msg.role, &msg.content).fragment;
            format!(
                "<div class=\"{}\">{}</div>\n",
                fragment.class_name, fragment.html
            )
        })
        .collect();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body{{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;max-width:820px;margin:32px auto;color:#111;line-height:1.5}}
h1{{font-size:20px;border-bottom:1px solid #ccc;padding-bottom:8px}}
.chat-message{{margin:14px 0;page-break-inside:avoid}}
.chat-sender{{font-weight:600;font-size:12px;text-transform:uppercase;color:#555;margin-bottom:4px}}
.chat-bubble{{border:1px solid #ddd;border-radius:8px;padding:10px 14px}}
.chat-message.user .chat-bubble{{background:#f4f6fb}}
code{{font-family:ui-monospace,Menlo,Consolas,monospace;background:#f0f0f0;padding:0 3px;border-radius:3px}}
.code-block-wrapper{{margin:8px 0;border:1px solid #ddd;border-radius:6px;overflow:hidden}}
.code-block-header{{background:#eee;padding:4px 10px;font-size:12px}}
.copy-code-btn{{display:none}}
pre{{margin:0;padding:10px;overflow-x:auto;white-space:pre-wrap}}
pre code{{background:none;padding:0}}
</style>
</head>
<body>
<h1>{title}</h1>
{body}</body>
</html>
"##,
        title = renderer::escape_html(title),
        body = body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Message> {
        vec![
            Message::user("how do I print?"),
            Message::assistant("```rust\nprintln!(\"<hi>\");```"),
        ]
    }

    #[test]
    fn test_markdown_lists_every_message() {
        let md = to_markdown(&sample(), "Chat");
        assert!(md.starts_with("# Chat\n"));
        assert!(md.contains("## You\n\nhow do I print?"));
        assert!(md.contains("## AI\n\n```rust"));
    }

    #[test]
    fn test_json_matches_storage_format() {
        let json = to_json(&sample());
        let parsed: Vec<Message> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_html_document_escapes_and_renders_blocks() {
        let html = to_html(&sample(), "Chat");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<div class="chat-message user">"#));
        assert!(html.contains("println!(\"&lt;hi&gt;\");"));
        assert!(!html.contains("<hi>"));
    }

    #[test]
    fn test_export_dispatch() {
        assert_eq!(export(&[], ExportFormat::Json), "[]");
        assert_eq!(ExportFormat::Html.extension(), "html");
    }
}
