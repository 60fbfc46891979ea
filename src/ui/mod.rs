pub mod recorder;

use crate::models::ReceiptModal;
use crate::routes::Route;

pub use recorder::{AlertLog, ModalSlot, NavigationLog};

/// 页面导航 (同步替换当前页面)
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// 表单上的用户反馈
pub trait UserFeedback: Send + Sync {
    /// 弹窗提示
    fn alert(&self, message: &str);

    /// 清空文件选择框
    fn clear_file_input(&self);
}

/// 票据图片预览弹窗
pub trait ReceiptViewer: Send + Sync {
    fn show(&self, modal: ReceiptModal);
}
