use serde::Serialize;
use std::sync::Arc;

use super::format::format_bills;
use crate::error::StoreError;
use crate::models::{DisplayBill, ReceiptModal};
use crate::routes::Route;
use crate::store::BillStore;
use crate::ui::{Navigator, ReceiptViewer};

/// 默认弹窗宽度 (像素)
pub const DEFAULT_MODAL_WIDTH: u32 = 800;

/// 列表页渲染结果: 票据行, 或查询失败时的错误信息
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BillsView {
    Bills(Vec<DisplayBill>),
    Error(String),
}

impl BillsView {
    /// 纯文本渲染
    pub fn render_text(&self) -> String {
        let lines: Vec<String> = match self {
            BillsView::Bills(bills) => std::iter::once("Mes notes de frais".to_string())
                .chain(bills.iter().map(|bill| {
                    let amount = bill
                        .amount
                        .map(|a| a.to_string())
                        .unwrap_or_else(|| "NaN".to_string());
                    format!(
                        "{} | {} | {} | {} € | {}",
                        bill.expense_type, bill.expense_name, bill.display_date, amount, bill.display_status
                    )
                }))
                .collect(),
            BillsView::Error(message) => vec!["Erreur".to_string(), message.clone()],
        };

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    pub fn rows(&self) -> &[DisplayBill] {
        match self {
            BillsView::Bills(bills) => bills,
            BillsView::Error(_) => &[],
        }
    }
}

/// 员工票据列表页
pub struct BillsPage {
    store: Option<Arc<dyn BillStore>>,
    navigator: Arc<dyn Navigator>,
    viewer: Arc<dyn ReceiptViewer>,
    modal_width: u32,
}

impl BillsPage {
    pub fn new(
        store: Option<Arc<dyn BillStore>>,
        navigator: Arc<dyn Navigator>,
        viewer: Arc<dyn ReceiptViewer>,
    ) -> Self {
        Self {
            store,
            navigator,
            viewer,
            modal_width: DEFAULT_MODAL_WIDTH,
        }
    }

    pub fn with_modal_width(mut self, modal_width: u32) -> Self {
        self.modal_width = modal_width;
        self
    }

    /// 点击 "新建票据"
    pub fn handle_click_new_bill(&self) {
        self.navigator.navigate(Route::NewBill);
    }

    /// 点击查看图标, 弹窗预览票据图片
    pub fn handle_click_icon_eye(&self, receipt_url: &str) {
        self.viewer.show(ReceiptModal::new(receipt_url, self.modal_width));
    }

    /// 查询并格式化票据; 未配置存储端时返回空列表
    pub async fn get_bills(&self) -> Result<Vec<DisplayBill>, StoreError> {
        let Some(store) = &self.store else {
            return Ok(Vec::new());
        };

        let raw_bills = store.list().await?;
        tracing::debug!("Fetched {} bills", raw_bills.len());
        Ok(format_bills(raw_bills))
    }

    /// 渲染列表页
    pub async fn load(&self) -> BillsView {
        match self.get_bills().await {
            Ok(bills) => BillsView::Bills(bills),
            Err(e) => {
                tracing::error!("Failed to fetch bills: {}", e);
                BillsView::Error(e.to_string())
            }
        }
    }
}
