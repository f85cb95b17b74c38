//! # Code Syncer Chat - Cargo 构建脚本
//!
//! 启用 `desktop` 特性时调用 `tauri_build::build()`，根据 `tauri.conf.json`
//! 生成 Tauri 运行时所需的资源绑定代码（图标、权限清单、Windows 资源文件等）。
//!
//! 未启用 `desktop` 时本脚本不做任何事，核心库可以在没有 WebView 系统依赖的环境下构建。

/// 构建脚本入口函数
fn main() {
    #[cfg(feature = "desktop")]
    tauri_build::build()
}
