use chrono::{DateTime, Datelike, NaiveDate};

use crate::models::{BillRecord, DisplayBill};

/// 法语月份缩写的前三个字母 (首字母大写)
const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// 解析 ISO 日期, 也接受带时间的 RFC 3339 格式
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|err| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()).map_err(|_| err))
}

/// `2021-10-15` -> `15 Oct. 21`
pub fn format_date(raw: &str) -> Result<String, chrono::ParseError> {
    let date = parse_iso_date(raw)?;
    let month = MONTHS[date.month0() as usize];
    Ok(format!("{} {}. {:02}", date.day(), month, date.year().rem_euclid(100)))
}

/// 转换为展示记录, 并按原始日期倒序排列
pub fn format_bills(raw_bills: Vec<BillRecord>) -> Vec<DisplayBill> {
    let mut bills: Vec<DisplayBill> = raw_bills
        .into_iter()
        .map(|bill| {
            let display_date = format_date(&bill.date).unwrap_or_else(|e| {
                // 日期损坏时保留原值
                tracing::warn!("Unable to format date '{}': {}", bill.date, e);
                bill.date.clone()
            });

            DisplayBill {
                id: bill.id,
                display_status: bill.status.label().to_string(),
                raw_date: bill.date,
                display_date,
                expense_type: bill.expense_type,
                expense_name: bill.expense_name,
                amount: bill.amount,
                receipt_url: bill.file_url,
            }
        })
        .collect();

    // 稳定排序, ISO 日期可直接按字符串比较
    bills.sort_by(|a, b| b.raw_date.cmp(&a.raw_date));
    bills
}
