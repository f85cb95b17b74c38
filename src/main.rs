//! # Code Syncer Chat - 桌面应用入口点
//!
//! 仅负责调用 `chat_lib::run()` 启动 Tauri 应用，核心逻辑位于 `lib.rs`。

// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    chat_lib::run();
}
