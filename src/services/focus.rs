//! # 点击聚焦策略
//!
//! 终端式交互：在窗口任意位置点击都把焦点还给输入框，
//! 但以下情况除外：点击按钮或链接、点击设置面板内部、当前有文本选区。
//! 前端在捕获阶段注册点击处理，把目标信息交给此策略判断。

use serde::Deserialize;

/// 点击目标描述
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickTarget {
    /// 目标元素标签名（如 "BUTTON"、"DIV"）
    pub tag_name: String,
    /// 目标是否位于设置面板内
    #[serde(default)]
    pub inside_settings_panel: bool,
    /// 当前选中文本的长度
    #[serde(default)]
    pub selection_length: usize,
}

/// 判断本次点击后是否应聚焦输入框
pub fn should_focus_input(target: &ClickTarget) -> bool {
    let tag = target.tag_name.to_ascii_uppercase();
    if tag == "BUTTON" || tag == "A" {
        return false;
    }
    !target.inside_settings_panel && target.selection_length == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(tag: &str) -> ClickTarget {
        ClickTarget {
            tag_name: tag.into(),
            ..ClickTarget::default()
        }
    }

    #[test]
    fn test_plain_click_focuses() {
        assert!(should_focus_input(&target("DIV")));
    }

    #[test]
    fn test_exclusions() {
        assert!(!should_focus_input(&target("BUTTON")));
        assert!(!should_focus_input(&target("a")));

        let mut in_panel = target("INPUT");
        in_panel.inside_settings_panel = true;
        assert!(!should_focus_input(&in_panel));

        let mut selecting = target("P");
        selecting.selection_length = 4;
        assert!(!should_focus_input(&selecting));
    }
}
