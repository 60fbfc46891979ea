use async_trait::async_trait;
use indexmap::IndexMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use super::BillStore;
use crate::error::StoreError;
use crate::models::{BillRecord, BillStatus, CreatedReceipt, ReceiptUpload};

/// 进程内票据存储 (保持插入顺序)
#[derive(Debug)]
pub struct MemoryBillStore {
    receipt_base_url: String,
    bills: RwLock<IndexMap<String, BillRecord>>,
    receipts: RwLock<IndexMap<String, Vec<u8>>>,
    next_key: AtomicU64,
}

impl MemoryBillStore {
    pub fn new(receipt_base_url: impl Into<String>) -> Self {
        Self {
            receipt_base_url: receipt_base_url.into().trim_end_matches('/').to_string(),
            bills: RwLock::new(IndexMap::new()),
            receipts: RwLock::new(IndexMap::new()),
            next_key: AtomicU64::new(1),
        }
    }

    /// 使用已有票据初始化, 没有 id 的票据分配新 key
    pub fn with_bills(receipt_base_url: impl Into<String>, bills: Vec<BillRecord>) -> Self {
        let mut store = Self::new(receipt_base_url);
        let mut map = IndexMap::with_capacity(bills.len());
        for mut bill in bills {
            let key = bill.id.clone().unwrap_or_else(|| store.allocate_key());
            bill.id = Some(key.clone());
            map.insert(key, bill);
        }
        store.bills = RwLock::new(map);
        store
    }

    /// 从 JSON 文件加载票据
    pub async fn from_fixtures(
        receipt_base_url: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, StoreError> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let bills: Vec<BillRecord> = serde_json::from_str(&raw)?;
        tracing::info!("Loaded {} bills from {}", bills.len(), path.as_ref().display());
        Ok(Self::with_bills(receipt_base_url, bills))
    }

    /// 按 key 查询票据
    pub async fn get(&self, key: &str) -> Option<BillRecord> {
        self.bills.read().await.get(key).cloned()
    }

    /// 已上传文件的字节数
    pub async fn receipt_size(&self, key: &str) -> Option<usize> {
        self.receipts.read().await.get(key).map(Vec::len)
    }

    fn allocate_key(&self) -> String {
        format!("{:08}", self.next_key.fetch_add(1, Ordering::Relaxed))
    }
}

#[async_trait]
impl BillStore for MemoryBillStore {
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError> {
        Ok(self.bills.read().await.values().cloned().collect())
    }

    /// 与后端行为一致: 上传即登记一张字段为空的待审核票据 (key 即票据 id),
    /// 表单提交后由 update 覆盖; 未提交的上传会以空行出现在 list 中
    async fn create(&self, upload: ReceiptUpload) -> Result<CreatedReceipt, StoreError> {
        let bytes = upload.file.load().await?.into_owned();
        let key = self.allocate_key();
        let file_url = format!("{}/{}/{}", self.receipt_base_url, key, upload.file.name);

        let bill = BillRecord {
            id: Some(key.clone()),
            owner_email: upload.email,
            expense_type: String::new(),
            expense_name: String::new(),
            amount: None,
            date: String::new(),
            vat: String::new(),
            pct: crate::models::DEFAULT_VAT_PERCENT,
            commentary: String::new(),
            file_url: Some(file_url.clone()),
            file_name: Some(upload.file.name.clone()),
            status: BillStatus::Pending,
        };

        tracing::debug!("Stored receipt {} ({} bytes)", key, bytes.len());
        self.receipts.write().await.insert(key.clone(), bytes);
        self.bills.write().await.insert(key.clone(), bill);

        Ok(CreatedReceipt { file_url, key })
    }

    async fn update(&self, data: String, selector: Option<String>) -> Result<(), StoreError> {
        let key = selector.ok_or_else(|| StoreError::NotFound("<none>".to_string()))?;
        let mut bill: BillRecord = serde_json::from_str(&data)?;

        let mut bills = self.bills.write().await;
        let slot = bills
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        bill.id = Some(key);
        *slot = bill;

        Ok(())
    }
}
