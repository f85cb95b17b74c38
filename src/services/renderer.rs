//! # 消息渲染器
//!
//! 将一条消息（角色 + 原文）渲染为可直接插入聊天窗口的 HTML 片段。
//! 渲染是纯函数，不读写任何状态。
//!
//! ## 渲染步骤（顺序不可调换，否则会引入 XSS 或格式错误）
//! 1. 转义 `&`、`<`、`>`（仅此三个字符，引号不转义）
//! 2. 提取围栏代码块（三个反引号 + 可选语言标记 + 代码 + 三个反引号，非贪婪、可跨行），
//!    按出现顺序存入列表，原位置替换为编号占位符
//! 3. 对剩余文本：单反引号包裹的片段替换为 `<code>`，换行替换为 `<br>`
//! 4. 将占位符还原为代码块结构：头部（语言标签 + 复制按钮）+ `<pre><code>` 代码体。
//!    代码体已在第 1 步转义，不会重复转义，也不会插入 `<br>`
//!
//! ## 正则
//! 三个模式均通过 `LazyLock` 全局预编译一次。

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::models::message::Role;
use crate::models::thread::Fragment;

/// 围栏代码块
///
/// 语言标记之后紧跟的一个换行属于围栏本身，不计入代码体。
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(\w*)(?:\r?\n)?([\s\S]*?)```").unwrap());

/// 行内代码
static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

/// 代码块占位符
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"___CODE_BLOCK_(\d+)___").unwrap());

/// 未标注语言时显示的标签
const DEFAULT_LANGUAGE: &str = "text";

/// 从消息中提取出的代码块
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// 语言标签（未标注时为 "text"）
    pub language: String,
    /// 代码体（已 HTML 转义）
    pub code_html: String,
}

impl CodeBlock {
    /// 代码块的纯文本内容，即复制到剪贴板的文本
    pub fn plain_text(&self) -> String {
        unescape_html(&self.code_html)
    }
}

/// 一条消息的渲染结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMessage {
    /// 用于插入线程的片段
    pub fragment: Fragment,
    /// 按出现顺序排列的代码块（供复制操作定位）
    pub code_blocks: Vec<CodeBlock>,
}

/// 渲染一条消息
///
/// # 参数
/// - `role` - 发送者角色，决定发送者标签和样式类名
/// - `content` - 消息原文
pub fn render_message(role: Role, content: &str) -> RenderedMessage {
    let (body, code_blocks) = format_content(content);
    let html = bubble_html(role.sender_label(), &body);
    RenderedMessage {
        fragment: Fragment {
            class_name: format!("chat-message {}", role.style_class()),
            html,
        },
        code_blocks,
    }
}

/// 渲染历史为空时的欢迎占位
pub fn render_empty_state() -> Fragment {
    Fragment {
        class_name: "chat-welcome".to_string(),
        html: concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="48" viewBox="0 0 24 24" "#,
            r#"fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" "#,
            r#"stroke-linejoin="round"><rect width="18" height="10" x="3" y="11" rx="2"/>"#,
            r#"<circle cx="12" cy="5" r="2"/><path d="M12 7v4"/>"#,
            r#"<line x1="8" x2="8" y1="16" y2="16"/><line x1="16" x2="16" y1="16" y2="16"/></svg>"#,
            "<p>Start a conversation with the AI...</p>"
        )
        .to_string(),
    }
}

/// 渲染 "Thinking..." 占位
pub fn render_loading() -> Fragment {
    Fragment {
        class_name: "chat-message ai loading-msg".to_string(),
        html: bubble_html("AI", "Thinking..."),
    }
}

/// 渲染带重试按钮的错误气泡
///
/// # 参数
/// - `message` - 错误描述（会被转义）
pub fn render_error(message: &str) -> Fragment {
    let body = format!(
        concat!(
            "Error: {}",
            r#"<div class="error-actions">"#,
            r#"<button class="btn btn-small retry-btn" data-action="retry">Retry</button>"#,
            "</div>"
        ),
        escape_html(message)
    );
    Fragment {
        class_name: "chat-message system error-msg".to_string(),
        html: bubble_html("System", &body),
    }
}

/// 转义 `&`、`<`、`>`
///
/// `&` 必须最先替换，否则会把后两步生成的实体再次转义。
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// `escape_html` 的逆操作
///
/// `&amp;` 必须最后还原，避免把原文中的 `&amp;lt;` 还原成 `<`。
pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// 执行渲染步骤 1–4，返回气泡正文 HTML 和提取出的代码块
fn format_content(content: &str) -> (String, Vec<CodeBlock>) {
    // 1. 转义
    let escaped = escape_html(content);

    // 2. 提取代码块并替换为占位符
    let mut code_blocks: Vec<CodeBlock> = Vec::new();
    let without_blocks = FENCE_RE.replace_all(&escaped, |caps: &Captures| {
        let language = match caps.get(1).map(|m| m.as_str()) {
            Some(lang) if !lang.is_empty() => lang.to_string(),
            _ => DEFAULT_LANGUAGE.to_string(),
        };
        code_blocks.push(CodeBlock {
            language,
            code_html: caps[2].to_string(),
        });
        format!("___CODE_BLOCK_{}___", code_blocks.len() - 1)
    });

    // 3. 行内代码和换行
    let formatted = INLINE_CODE_RE
        .replace_all(&without_blocks, "<code>$1</code>")
        .replace('\n', "<br>");

    // 4. 还原代码块；编号越界的占位符（用户原文里恰好写了同样的文本）原样保留
    let body = PLACEHOLDER_RE
        .replace_all(&formatted, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| code_blocks.get(index))
                .map(code_block_html)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned();

    (body, code_blocks)
}

/// 代码块的 HTML 结构
fn code_block_html(block: &CodeBlock) -> String {
    format!(
        concat!(
            r#"<div class="code-block-wrapper">"#,
            r#"<div class="code-block-header">"#,
            r#"<span class="code-lang">{lang}</span>"#,
            r#"<button class="copy-code-btn" data-action="copy">Copy</button>"#,
            "</div>",
            r#"<pre><code class="language-{lang}">{code}</code></pre>"#,
            "</div>"
        ),
        lang = block.language,
        code = block.code_html
    )
}

/// 发送者标签 + 气泡
fn bubble_html(sender: &str, body: &str) -> String {
    format!(
        r#"<div class="chat-sender">{}</div><div class="chat-bubble">{}</div>"#,
        sender, body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_only_three_characters() {
        let rendered = render_message(Role::User, r#"<b>"Tom" & 'Jerry'</b>"#);
        assert!(rendered
            .fragment
            .html
            .contains(r#"&lt;b&gt;"Tom" &amp; 'Jerry'&lt;/b&gt;"#));
    }

    #[test]
    fn test_sender_and_class() {
        let user = render_message(Role::User, "hello");
        assert_eq!(user.fragment.class_name, "chat-message user");
        assert!(user.fragment.html.contains(r#"<div class="chat-sender">You</div>"#));

        let ai = render_message(Role::Assistant, "hi");
        assert_eq!(ai.fragment.class_name, "chat-message ai");
        assert!(ai.fragment.html.contains(r#"<div class="chat-sender">AI</div>"#));
    }

    #[test]
    fn test_fenced_block_with_language() {
        let rendered = render_message(Role::Assistant, "Use ```js\nconsole.log(1)```");

        assert_eq!(
            rendered.code_blocks,
            vec![CodeBlock {
                language: "js".into(),
                code_html: "console.log(1)".into(),
            }]
        );
        let html = &rendered.fragment.html;
        assert!(html.contains(r#"<span class="code-lang">js</span>"#));
        assert!(html.contains(r#"<pre><code class="language-js">console.log(1)</code></pre>"#));
    }

    #[test]
    fn test_no_line_breaks_inside_code_body() {
        let rendered = render_message(Role::Assistant, "a\nb\n```rust\nfn main() {\n}\n```\nc");
        let html = &rendered.fragment.html;

        assert!(html.starts_with(r#"<div class="chat-sender">AI</div><div class="chat-bubble">a<br>b<br>"#));
        assert!(html.contains("<code class=\"language-rust\">fn main() {\n}\n</code>"));
        assert!(html.ends_with("</div><br>c</div>"));
    }

    #[test]
    fn test_untagged_block_uses_text_label() {
        let rendered = render_message(Role::Assistant, "```\nplain\n```");
        assert_eq!(rendered.code_blocks[0].language, "text");
        assert!(rendered.fragment.html.contains("language-text"));
    }

    #[test]
    fn test_inline_code() {
        let rendered = render_message(Role::User, "run `cargo fmt` now");
        assert!(rendered.fragment.html.contains("run <code>cargo fmt</code> now"));
        assert!(rendered.code_blocks.is_empty());
    }

    #[test]
    fn test_backticks_inside_block_are_not_inline_code() {
        let rendered = render_message(Role::Assistant, "```sh\necho `date`\n```");
        assert_eq!(rendered.code_blocks[0].code_html, "echo `date`\n");
        assert!(!rendered.fragment.html.contains("<code>date</code>"));
    }

    #[test]
    fn test_multiple_blocks_keep_order() {
        let rendered = render_message(Role::Assistant, "```a\n1```x```b\n2```");
        let langs: Vec<&str> = rendered
            .code_blocks
            .iter()
            .map(|b| b.language.as_str())
            .collect();
        assert_eq!(langs, vec!["a", "b"]);
        let html = &rendered.fragment.html;
        assert!(html.find("language-a").unwrap() < html.find("language-b").unwrap());
    }

    #[test]
    fn test_literal_placeholder_without_block_is_kept() {
        let rendered = render_message(Role::User, "___CODE_BLOCK_3___");
        assert!(rendered.fragment.html.contains("___CODE_BLOCK_3___"));
    }

    #[test]
    fn test_code_block_plain_text_roundtrip() {
        let body = "if a < b && b > c {\n    print(\"&amp;\");\n}";
        let rendered = render_message(Role::Assistant, &format!("```c\n{}```", body));

        assert!(rendered.code_blocks[0].code_html.contains("&lt;"));
        assert_eq!(rendered.code_blocks[0].plain_text(), body);
    }

    #[test]
    fn test_empty_state_is_stable() {
        assert_eq!(render_empty_state(), render_empty_state());
        assert!(render_empty_state().html.contains("Start a conversation"));
    }

    #[test]
    fn test_error_bubble_has_retry() {
        let fragment = render_error("API Error: 500");
        assert_eq!(fragment.class_name, "chat-message system error-msg");
        assert!(fragment.html.contains("Error: API Error: 500"));
        assert!(fragment.html.contains(r#"data-action="retry""#));
    }
}
