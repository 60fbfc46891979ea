use serde::{Deserialize, Serialize};

/// 列表页展示用的票据 (每次渲染重新计算, 不持久化)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayBill {
    pub id: Option<String>,
    /// 原始 ISO 日期, 用于排序
    pub raw_date: String,
    pub display_date: String,
    pub display_status: String,
    pub expense_type: String,
    pub expense_name: String,
    pub amount: Option<i64>,
    pub receipt_url: Option<String>,
}

/// 票据详情弹窗
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptModal {
    pub receipt_url: String,
    pub image_width: u32,
}

impl ReceiptModal {
    /// 图片宽度为弹窗宽度的一半
    pub fn new(receipt_url: impl Into<String>, modal_width: u32) -> Self {
        Self {
            receipt_url: receipt_url.into(),
            image_width: modal_width / 2,
        }
    }
}
