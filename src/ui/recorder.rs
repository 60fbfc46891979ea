use std::sync::Mutex;

use super::{Navigator, ReceiptViewer, UserFeedback};
use crate::models::ReceiptModal;
use crate::routes::Route;
use crate::util::lock;

/// 记录导航历史, 由调用方决定如何跳转
#[derive(Debug, Default)]
pub struct NavigationLog {
    history: Mutex<Vec<Route>>,
}

impl NavigationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Route> {
        lock(&self.history).clone()
    }

    pub fn last(&self) -> Option<Route> {
        lock(&self.history).last().copied()
    }
}

impl Navigator for NavigationLog {
    fn navigate(&self, route: Route) {
        tracing::debug!("navigate to '{}'", route.path());
        lock(&self.history).push(route);
    }
}

/// 记录提示信息与文件框清空次数
#[derive(Debug, Default)]
pub struct AlertLog {
    alerts: Mutex<Vec<String>>,
    cleared: Mutex<usize>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<String> {
        lock(&self.alerts).clone()
    }

    pub fn cleared_count(&self) -> usize {
        *lock(&self.cleared)
    }
}

impl UserFeedback for AlertLog {
    fn alert(&self, message: &str) {
        lock(&self.alerts).push(message.to_string());
    }

    fn clear_file_input(&self) {
        *lock(&self.cleared) += 1;
    }
}

/// 保存最近一次打开的弹窗
#[derive(Debug, Default)]
pub struct ModalSlot {
    current: Mutex<Option<ReceiptModal>>,
}

impl ModalSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Option<ReceiptModal> {
        lock(&self.current).take()
    }
}

impl ReceiptViewer for ModalSlot {
    fn show(&self, modal: ReceiptModal) {
        *lock(&self.current) = Some(modal);
    }
}
