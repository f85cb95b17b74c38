//! # 对话回合控制器
//!
//! 编排一次 "用户 → AI" 的完整交互，是整个应用唯一有时序要求的部分。
//!
//! ## 状态流转
//! ```text
//! Idle ──submit(非空)──▶ Sent ──▶ AwaitingReply ──┬─▶ Rendered（回复已渲染并持久化）
//!  ▲   └─submit(空白)─▶ 原地不动                   ├─▶ Failed（错误气泡 + 重试，历史不改写）
//!  │                                               └─▶ Idle（缺少 API Key，提示消息不持久化）
//!  └──────────────────────── retry ◀── Failed
//! ```
//!
//! ## 关键约束
//! - 用户消息在任何网络活动之前渲染并写入历史（读全量 → push → 写全量）
//! - 等待回复期间输入区隐藏，回合严格串行；这是界面层约束，不是锁
//! - 无论成功、失败还是缺少 API Key，最终都会恢复输入区并请求聚焦
//! - 失败回合中 AI 一侧的消息永不持久化；重试时原样重发当前历史
//!
//! 线程每次变化后通知监听器，桌面端据此把 "Thinking..." 占位等中间状态推送给前端。
//!
//! 消息中的代码块登记在独立的 `CodeBlockIndex` 中，复制操作只读这份索引，
//! 不需要等待进行中的回合。

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::ChatError;
use crate::models::message::{History, Message, Role};
use crate::models::thread::{NodeKind, Thread, TurnPhase};
use crate::services::ai_client::CompletionClient;
use crate::services::config;
use crate::services::renderer::{self, CodeBlock};
use crate::services::store::{self, Store};

/// 缺少 API Key 时显示的提示消息（不持久化）
pub const ADVISORY_MESSAGE: &str = "I cannot reply because the API Key is missing. Please configure it in the full app or contact support.";

/// 线程变化监听器
pub type ThreadListener = Box<dyn Fn(&Thread) + Send + Sync>;

/// 一次提交或重试的结果
#[derive(Debug)]
pub enum TurnOutcome {
    /// 输入为空白，或重试时已没有错误气泡，未做任何事
    Ignored,
    /// AI 回复已渲染并写入历史
    Replied,
    /// 未配置 API Key，已显示提示消息
    Advisory,
    /// AI 调用失败，已显示错误气泡
    Failed(ChatError),
}

/// 消息节点中的代码块索引（节点 id → 按出现顺序排列的代码块）
///
/// 由控制器写入，复制操作并发读取。
#[derive(Default)]
pub struct CodeBlockIndex {
    blocks: RwLock<HashMap<u64, Vec<CodeBlock>>>,
}

impl CodeBlockIndex {
    /// 查找指定消息节点中的第 `index` 个代码块
    pub fn get(&self, node_id: u64, index: usize) -> Option<CodeBlock> {
        self.blocks.read().ok()?.get(&node_id)?.get(index).cloned()
    }

    fn insert(&self, node_id: u64, blocks: Vec<CodeBlock>) {
        if let Ok(mut map) = self.blocks.write() {
            map.insert(node_id, blocks);
        }
    }

    fn clear(&self) {
        if let Ok(mut map) = self.blocks.write() {
            map.clear();
        }
    }
}

/// 对话回合控制器
///
/// 持有注入的存储和补全客户端，以及当前线程视图。
pub struct ChatController {
    store: Arc<dyn Store>,
    client: Arc<dyn CompletionClient>,
    thread: Thread,
    code_blocks: Arc<CodeBlockIndex>,
    listener: Option<ThreadListener>,
}

impl ChatController {
    /// 创建控制器（线程为空，需调用 `load_history` 加载历史）
    pub fn new(store: Arc<dyn Store>, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            store,
            client,
            thread: Thread::new(),
            code_blocks: Arc::new(CodeBlockIndex::default()),
            listener: None,
        }
    }

    /// 注册线程变化监听器
    pub fn with_listener(mut self, listener: ThreadListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// 当前线程视图
    pub fn thread(&self) -> &Thread {
        &self.thread
    }

    /// 代码块索引的共享句柄
    pub fn code_blocks(&self) -> Arc<CodeBlockIndex> {
        self.code_blocks.clone()
    }

    /// 按历史记录重建整个线程
    ///
    /// 历史为空时只放一个欢迎占位（重复调用不会累积），否则每条消息一个节点。
    pub fn load_history(&mut self) {
        self.thread.clear();
        self.code_blocks.clear();

        let history = store::read_history(self.store.as_ref());
        if history.is_empty() {
            self.thread
                .push(NodeKind::Welcome, renderer::render_empty_state());
        } else {
            for message in &history {
                self.push_message(message.role, &message.content);
            }
        }
        log::debug!("已加载历史记录 {} 条", history.len());

        self.thread.phase = TurnPhase::Idle;
        self.thread.restore_input();
        self.notify();
    }

    /// 提交用户输入
    ///
    /// 去除首尾空白后为空则直接返回 `Ignored`，线程和历史均不变。
    pub async fn submit(&mut self, input: &str) -> TurnOutcome {
        let text = input.trim();
        if text.is_empty() {
            return TurnOutcome::Ignored;
        }

        self.thread.hide_input();
        self.push_message(Role::User, text);
        let history = store::append_message(self.store.as_ref(), Message::user(text));
        self.thread.phase = TurnPhase::Sent;
        self.notify();

        self.process_reply(history).await
    }

    /// 重试最近一次失败的回合
    ///
    /// 移除当前错误气泡，用存储中的历史原样重新请求（失败回合的用户消息已持久化，不会重复追加）。
    /// 线程中没有错误气泡时（例如重试按钮被连续点击，前一次已经成功）返回 `Ignored`。
    pub async fn retry(&mut self) -> TurnOutcome {
        if !self.thread.remove_error() {
            log::debug!("没有待重试的回合，忽略");
            return TurnOutcome::Ignored;
        }
        let history = store::read_history(self.store.as_ref());
        log::info!("重试上一回合，历史消息 {} 条", history.len());
        self.process_reply(history).await
    }

    /// 清空历史记录
    ///
    /// 破坏性操作，仅在用户确认后执行。返回是否实际清空。
    pub fn clear_history(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        store::clear_history(self.store.as_ref());
        log::info!("历史记录已清空");
        self.load_history();
        true
    }

    /// 等待并处理 AI 回复
    async fn process_reply(&mut self, mut history: History) -> TurnOutcome {
        let loading = self
            .thread
            .push(NodeKind::Loading, renderer::render_loading());
        self.thread.hide_input();
        self.thread.phase = TurnPhase::AwaitingReply;
        self.notify();

        let api_key = config::read_api_key(self.store.as_ref());

        let result = match api_key {
            Some(key) => self.client.complete(&history, &key).await,
            None => Err(ChatError::MissingApiKey),
        };

        self.thread.remove(loading);

        let outcome = match result {
            Ok(reply) => {
                self.push_message(Role::Assistant, &reply);
                history.push(Message::assistant(reply));
                store::write_history(self.store.as_ref(), &history);
                self.thread.phase = TurnPhase::Rendered;
                TurnOutcome::Replied
            }
            Err(ChatError::MissingApiKey) => {
                log::warn!("未配置 API Key，跳过 AI 请求");
                self.push_message(Role::Assistant, ADVISORY_MESSAGE);
                self.thread.phase = TurnPhase::Idle;
                TurnOutcome::Advisory
            }
            Err(e) => {
                log::warn!("AI 回复失败 ({:?}): {}", e.kind(), e);
                let message = e.to_string();
                self.thread.push(
                    NodeKind::Error {
                        message: message.clone(),
                    },
                    renderer::render_error(&message),
                );
                self.thread.phase = TurnPhase::Failed;
                TurnOutcome::Failed(e)
            }
        };

        self.thread.restore_input();
        self.notify();
        outcome
    }

    /// 渲染一条消息并追加到线程
    fn push_message(&mut self, role: Role, content: &str) {
        let rendered = renderer::render_message(role, content);
        let id = self
            .thread
            .push(NodeKind::Message { role }, rendered.fragment);
        if !rendered.code_blocks.is_empty() {
            self.code_blocks.insert(id, rendered.code_blocks);
        }
    }

    fn notify(&self) {
        if let Some(listener) = &self.listener {
            listener(&self.thread);
        }
    }
}
