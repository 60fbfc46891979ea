pub mod memory;
pub mod session;

use async_trait::async_trait;

use crate::error::{SessionError, StoreError};
use crate::models::{BillRecord, CreatedReceipt, CurrentUser, ReceiptUpload};

pub use memory::MemoryBillStore;
pub use session::LocalStorageSession;

/// 票据存储端 (bills 子资源)
#[async_trait]
pub trait BillStore: Send + Sync {
    /// 查询全部票据
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError>;

    /// 上传票据文件, 返回文件地址与票据 key
    async fn create(&self, upload: ReceiptUpload) -> Result<CreatedReceipt, StoreError>;

    /// 以 JSON 更新 selector 指定的票据
    async fn update(&self, data: String, selector: Option<String>) -> Result<(), StoreError>;
}

/// 会话存储 (只读)
pub trait SessionStore: Send + Sync {
    fn current_user(&self) -> Result<CurrentUser, SessionError>;
}
