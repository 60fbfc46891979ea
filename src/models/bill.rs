use serde::{Deserialize, Deserializer, Serialize};

use super::UploadedReceipt;

/// 未填写或无法解析时的默认增值税率
pub const DEFAULT_VAT_PERCENT: i64 = 20;

/// 票据状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    /// 列表中显示的标签
    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::Pending => "En attente",
            BillStatus::Accepted => "Accepté",
            BillStatus::Refused => "Refusé",
        }
    }
}

/// 报销票据 (持久化格式, 字段名与存储端一致)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "email", default)]
    pub owner_email: String,
    #[serde(rename = "type", default)]
    pub expense_type: String,
    #[serde(rename = "name", default)]
    pub expense_name: String,
    /// None 表示金额无法解析 (序列化为 null)
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub vat: String,
    #[serde(default = "default_pct")]
    pub pct: i64,
    #[serde(default)]
    pub commentary: String,
    #[serde(rename = "fileUrl", default)]
    pub file_url: Option<String>,
    #[serde(rename = "fileName", default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub status: BillStatus,
}

/// 新建票据表单提交的原始字段
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewBillForm {
    pub expense_type: String,
    pub expense_name: String,
    pub amount: String,
    pub date: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

impl BillRecord {
    /// 由表单字段构建待审核票据
    pub fn from_form(
        form: &NewBillForm,
        owner_email: &str,
        receipt: Option<&UploadedReceipt>,
    ) -> Self {
        Self {
            id: None,
            owner_email: owner_email.to_string(),
            expense_type: form.expense_type.clone(),
            expense_name: form.expense_name.clone(),
            amount: parse_int_prefix(&form.amount),
            date: form.date.clone(),
            vat: form.vat.clone(),
            // 0 同样回退到默认税率
            pct: parse_int_prefix(&form.pct)
                .filter(|pct| *pct != 0)
                .unwrap_or(DEFAULT_VAT_PERCENT),
            commentary: form.commentary.clone(),
            file_url: receipt.map(|r| r.url.clone()),
            file_name: receipt.map(|r| r.file_name.clone()),
            status: BillStatus::Pending,
        }
    }

    /// fileUrl 与 fileName 必须同时存在或同时为空
    pub fn has_consistent_receipt(&self) -> bool {
        self.file_url.is_some() == self.file_name.is_some()
    }
}

/// 解析整数前缀: 忽略前导空白, 可带符号, 读取到第一个非数字字符为止
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };

    let digits_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits_len == 0 {
        return None;
    }

    rest[..digits_len].parse::<i64>().ok().map(|n| sign * n)
}

fn default_pct() -> i64 {
    DEFAULT_VAT_PERCENT
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Null(()) => String::new(),
    })
}
