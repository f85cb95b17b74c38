//! # 对话线程视图模型
//!
//! 描述聊天窗口中当前显示的全部节点，与存储中的历史记录完全解耦：
//! 线程里可以出现不会被持久化的节点（"Thinking..." 占位、错误气泡、缺少 API Key 的提示消息）。
//!
//! 每个节点携带样式类名和已渲染好的 HTML，前端只做插入，不做任何文本处理。
//!
//! ## 数据流
//! ```text
//! History → renderer::render_message → Fragment
//!         → Thread::push → ThreadNode { id, kind, class_name, html }
//!         → IPC / 事件 → 前端 innerHTML
//! ```

use serde::Serialize;

use crate::models::message::Role;

/// 渲染产物：外层容器类名 + 内部 HTML
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    /// 外层容器的样式类名
    pub class_name: String,
    /// 容器内部 HTML
    pub html: String,
}

/// 节点类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// 历史为空时的欢迎占位
    Welcome,
    /// 一条消息气泡（历史消息或未持久化的提示消息）
    Message { role: Role },
    /// 等待 AI 回复时的 "Thinking..." 占位
    Loading,
    /// 带重试按钮的错误气泡
    Error { message: String },
}

/// 线程中的单个节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadNode {
    /// 节点唯一标识（线程内自增），用作前端 DOM key
    pub id: u64,
    /// 节点类型
    pub kind: NodeKind,
    /// 外层容器的样式类名
    pub class_name: String,
    /// 容器内部 HTML
    pub html: String,
}

/// 当前回合所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// 空闲，可以输入
    #[default]
    Idle,
    /// 用户消息已渲染并写入历史
    Sent,
    /// AI 请求进行中，输入区隐藏
    AwaitingReply,
    /// 回复已渲染并写入历史
    Rendered,
    /// 请求失败，已渲染错误气泡
    Failed,
}

/// 对话线程
///
/// 节点顺序即显示顺序；输入区始终位于所有节点之后，仅通过 `input_visible` 控制显隐。
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    /// 按显示顺序排列的节点
    pub nodes: Vec<ThreadNode>,
    /// 输入区是否可见（等待回复期间隐藏）
    pub input_visible: bool,
    /// 请求聚焦输入框的累计次数，前端比较前后值决定是否 `focus()`
    pub focus_requests: u64,
    /// 当前回合阶段
    pub phase: TurnPhase,
    /// 下一个节点 id
    #[serde(skip)]
    next_id: u64,
}

impl Thread {
    /// 创建空线程（输入区可见）
    pub fn new() -> Self {
        Self {
            input_visible: true,
            ..Self::default()
        }
    }

    /// 清空所有节点
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// 追加一个节点，返回其 id
    ///
    /// 追加消息或错误节点前会先移除欢迎占位，保证欢迎节点不会与消息共存。
    pub fn push(&mut self, kind: NodeKind, fragment: Fragment) -> u64 {
        if kind != NodeKind::Welcome {
            self.nodes.retain(|n| n.kind != NodeKind::Welcome);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.push(ThreadNode {
            id,
            kind,
            class_name: fragment.class_name,
            html: fragment.html,
        });
        id
    }

    /// 按 id 移除节点，返回是否找到
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        self.nodes.len() != before
    }

    /// 移除当前的错误气泡（同一时刻至多一个），返回是否找到
    pub fn remove_error(&mut self) -> bool {
        match self
            .nodes
            .iter()
            .position(|n| matches!(n.kind, NodeKind::Error { .. }))
        {
            Some(index) => {
                self.nodes.remove(index);
                true
            }
            None => false,
        }
    }

    /// 隐藏输入区
    pub fn hide_input(&mut self) {
        self.input_visible = false;
    }

    /// 恢复输入区并请求聚焦
    pub fn restore_input(&mut self) {
        self.input_visible = true;
        self.focus_requests += 1;
    }

    /// 统计指定类型的节点数量
    pub fn count(&self, predicate: impl Fn(&NodeKind) -> bool) -> usize {
        self.nodes.iter().filter(|n| predicate(&n.kind)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(html: &str) -> Fragment {
        Fragment {
            class_name: "x".into(),
            html: html.into(),
        }
    }

    #[test]
    fn test_message_evicts_welcome() {
        let mut thread = Thread::new();
        thread.push(NodeKind::Welcome, fragment("welcome"));
        thread.push(NodeKind::Message { role: Role::User }, fragment("hi"));

        assert_eq!(thread.nodes.len(), 1);
        assert_eq!(thread.count(|k| *k == NodeKind::Welcome), 0);
    }

    #[test]
    fn test_remove_error_removes_only_error() {
        let mut thread = Thread::new();
        thread.push(NodeKind::Message { role: Role::User }, fragment("hi"));
        thread.push(
            NodeKind::Error {
                message: "API Error: 500".into(),
            },
            fragment("err"),
        );

        assert!(thread.remove_error());
        assert!(!thread.remove_error());
        assert_eq!(thread.nodes.len(), 1);
    }

    #[test]
    fn test_ids_are_unique_after_removal() {
        let mut thread = Thread::new();
        let a = thread.push(NodeKind::Loading, fragment("a"));
        assert!(thread.remove(a));
        let b = thread.push(NodeKind::Loading, fragment("b"));
        assert_ne!(a, b);
    }
}
