//! # 应用全局状态
//!
//! 桌面端通过 Tauri 的 `manage()` 注册为应用状态，
//! 所有 command 函数通过 `State<AppState>` 参数注入访问。
//!
//! ## 并发
//! 对话控制器放在 `tokio::sync::Mutex` 中，锁在整个回合（含等待网络响应）期间持有，
//! 因此即使前端绕过隐藏的输入区直接调用，回合也不会交错。
//! 设置读写只走存储，复制代码只读代码块索引，两者都不需要拿控制器的锁。

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::services::ai_client::{ClientConfig, CompletionClient, OpenRouterClient};
use crate::services::controller::{ChatController, CodeBlockIndex, ThreadListener};
use crate::services::store::{FileStore, Store};
use crate::utils::path;

/// 应用全局状态
pub struct AppState {
    /// 持久化存储（与控制器共享同一实例）
    pub store: Arc<dyn Store>,
    /// 对话回合控制器
    pub controller: Mutex<ChatController>,
    /// 代码块索引（与控制器共享，回合进行中也可读取）
    pub code_blocks: Arc<CodeBlockIndex>,
}

impl AppState {
    /// 用给定的存储和补全客户端构建状态，并立即加载历史
    pub fn new(
        store: Arc<dyn Store>,
        client: Arc<dyn CompletionClient>,
        listener: Option<ThreadListener>,
    ) -> Self {
        let mut controller = ChatController::new(store.clone(), client);
        if let Some(listener) = listener {
            controller = controller.with_listener(listener);
        }
        controller.load_history();
        let code_blocks = controller.code_blocks();
        Self {
            store,
            controller: Mutex::new(controller),
            code_blocks,
        }
    }

    /// 使用默认存储文件（`~/.code-syncer/local-storage.json`）和 OpenRouter 客户端
    ///
    /// # 错误
    /// 无法确定用户主目录时返回错误
    pub fn open_default(
        client_config: ClientConfig,
        listener: Option<ThreadListener>,
    ) -> Result<Self, String> {
        let storage_path = path::get_storage_path()?;
        let store: Arc<dyn Store> = Arc::new(FileStore::open(storage_path));
        let client: Arc<dyn CompletionClient> = Arc::new(OpenRouterClient::new(client_config));
        Ok(Self::new(store, client, listener))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::error::ChatError;
    use crate::models::message::Message;
    use crate::models::settings::KEY_API_KEY;
    use crate::models::thread::NodeKind;
    use crate::services::store::{self, MemoryStore};

    /// 收到请求后一直挂起，直到测试放行
    #[derive(Default)]
    struct GatedClient {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl CompletionClient for GatedClient {
        async fn complete(&self, _history: &[Message], _api_key: &str) -> Result<String, ChatError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok("done".to_string())
        }
    }

    #[tokio::test]
    async fn test_new_loads_history() {
        let store = Arc::new(MemoryStore::new());
        store::write_history(store.as_ref(), &[Message::user("saved")]);

        let state = AppState::new(store, Arc::new(OpenRouterClient::default()), None);
        let controller = state.controller.lock().await;

        let thread = controller.thread();
        assert_eq!(thread.nodes.len(), 1);
        assert!(matches!(thread.nodes[0].kind, NodeKind::Message { .. }));
        assert!(thread.input_visible);
    }

    #[tokio::test]
    async fn test_code_blocks_readable_while_turn_in_flight() {
        let store = Arc::new(MemoryStore::new());
        store.set(KEY_API_KEY, "sk-test");
        store::write_history(
            store.as_ref(),
            &[Message::user("q"), Message::assistant("```py\nprint(1)```")],
        );
        let client = Arc::new(GatedClient::default());
        let state = Arc::new(AppState::new(store, client.clone(), None));
        let node_id = state.controller.lock().await.thread().nodes[1].id;

        let turn = tokio::spawn({
            let state = state.clone();
            async move {
                state.controller.lock().await.submit("hello").await;
            }
        });
        client.entered.notified().await;

        // 回合仍持有控制器的锁，代码块依然可以读取
        assert!(state.controller.try_lock().is_err());
        assert_eq!(
            state.code_blocks.get(node_id, 0).map(|b| b.plain_text()),
            Some("print(1)".to_string())
        );

        client.release.notify_one();
        turn.await.unwrap();
        assert!(state.controller.try_lock().is_ok());
    }
}
