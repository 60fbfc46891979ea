use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

use super::validator::ReceiptValidator;
use crate::error::{FileRejection, SubmitError};
use crate::models::{
    file_name_from_path, BillRecord, NewBillForm, ReceiptFile, ReceiptUpload, UploadHeaders,
    UploadOutcome, UploadedReceipt,
};
use crate::routes::Route;
use crate::store::{BillStore, SessionStore};
use crate::ui::{Navigator, UserFeedback};
use crate::util::lock;

/// 进行中的票据上传; 丢弃不会取消上传
#[derive(Debug)]
pub enum UploadTask {
    Running(JoinHandle<UploadOutcome>),
    Finished(UploadOutcome),
}

impl UploadTask {
    pub async fn outcome(self) -> UploadOutcome {
        match self {
            UploadTask::Running(handle) => handle
                .await
                .unwrap_or_else(|e| UploadOutcome::failed(format!("upload task aborted: {}", e))),
            UploadTask::Finished(outcome) => outcome,
        }
    }
}

/// 表单提交结果; persistence 为后台写入任务 (未配置存储端时为 None)
#[derive(Debug)]
pub struct SubmittedBill {
    pub bill: BillRecord,
    pub persistence: Option<JoinHandle<()>>,
}

/// 新建票据页: 处理文件选择与表单提交
///
/// 所有方法都会 spawn 后台任务, 需在 tokio 运行时内调用。
pub struct NewBill {
    store: Option<Arc<dyn BillStore>>,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    feedback: Arc<dyn UserFeedback>,
    validator: ReceiptValidator,
    /// 上传成功后写入, 提交时读取 (不加门控)
    receipt: Arc<Mutex<Option<UploadedReceipt>>>,
}

impl NewBill {
    pub fn new(
        store: Option<Arc<dyn BillStore>>,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        feedback: Arc<dyn UserFeedback>,
    ) -> Self {
        Self {
            store,
            session,
            navigator,
            feedback,
            validator: ReceiptValidator::new(),
            receipt: Arc::new(Mutex::new(None)),
        }
    }

    /// 当前已上传的票据
    pub fn receipt(&self) -> Option<UploadedReceipt> {
        lock(&self.receipt).clone()
    }

    /// 选择文件: 校验通过后后台上传; 校验失败时提示用户并清空文件框, 不发起请求
    pub async fn on_file_chosen(
        &self,
        file: ReceiptFile,
        input_value: &str,
    ) -> Result<UploadTask, FileRejection> {
        if let Err(rejection) = self.validator.validate(&file).await {
            tracing::info!("Rejected receipt '{}': {}", file.name, rejection.reason());
            self.feedback.alert(&rejection.to_string());
            self.feedback.clear_file_input();
            return Err(rejection);
        }

        let file_name = file_name_from_path(input_value).to_string();

        let email = match self.session.current_user() {
            Ok(user) => user.email,
            Err(e) => {
                tracing::error!("Upload aborted: {}", e);
                return Ok(UploadTask::Finished(UploadOutcome::failed(e.to_string())));
            }
        };

        let Some(store) = self.store.clone() else {
            tracing::warn!("No bill store configured, receipt '{}' not uploaded", file_name);
            return Ok(UploadTask::Finished(UploadOutcome::failed("no bill store configured")));
        };

        let upload = ReceiptUpload {
            file,
            email,
            headers: UploadHeaders { no_content_type: true },
        };
        let slot = Arc::clone(&self.receipt);

        let handle = tokio::spawn(async move {
            match store.create(upload).await {
                Ok(created) => {
                    tracing::info!("{}", created.file_url);
                    *lock(&slot) = Some(UploadedReceipt {
                        url: created.file_url.clone(),
                        file_name,
                        key: created.key.clone(),
                    });
                    UploadOutcome::uploaded(&created)
                }
                Err(e) => {
                    tracing::error!("Receipt upload failed: {}", e);
                    UploadOutcome::failed(e.to_string())
                }
            }
        });

        Ok(UploadTask::Running(handle))
    }

    /// 提交表单: 构建票据, 后台写入存储端, 然后立即跳转到列表页
    pub fn on_submit(&self, form: &NewBillForm) -> Result<SubmittedBill, SubmitError> {
        let user = self.session.current_user()?;
        let receipt = self.receipt();
        let bill = BillRecord::from_form(form, &user.email, receipt.as_ref());
        debug_assert!(bill.has_consistent_receipt());

        let persistence = self.update_bill(&bill, receipt.map(|r| r.key))?;
        self.navigator.navigate(Route::Bills);

        Ok(SubmittedBill { bill, persistence })
    }

    /// 写入失败只记录日志, 不影响已发生的跳转
    fn update_bill(
        &self,
        bill: &BillRecord,
        selector: Option<String>,
    ) -> Result<Option<JoinHandle<()>>, SubmitError> {
        let Some(store) = self.store.clone() else {
            return Ok(None);
        };

        let data = serde_json::to_string(bill)?;
        let navigator = Arc::clone(&self.navigator);

        Ok(Some(tokio::spawn(async move {
            match store.update(data, selector).await {
                Ok(()) => navigator.navigate(Route::Bills),
                Err(e) => tracing::error!("Failed to update bill: {}", e),
            }
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::models::{CreatedReceipt, CurrentUser};
    use crate::store::LocalStorageSession;
    use crate::ui::{AlertLog, NavigationLog};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PNG: [u8; 4] = [0x89, 0x50, 0x4e, 0x47];

    /// 记录调用次数, 可配置 update 失败
    #[derive(Default)]
    struct CountingStore {
        creates: AtomicUsize,
        updates: Mutex<Vec<(String, Option<String>)>>,
        fail_update: bool,
        fail_create: bool,
    }

    #[async_trait]
    impl BillStore for CountingStore {
        async fn list(&self) -> Result<Vec<BillRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn create(&self, upload: ReceiptUpload) -> Result<CreatedReceipt, StoreError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            if self.fail_create {
                return Err(StoreError::Rejected("Erreur 500".to_string()));
            }
            assert!(upload.headers.no_content_type);
            Ok(CreatedReceipt {
                file_url: format!("https://localhost:3456/images/{}", upload.file.name),
                key: "1234".to_string(),
            })
        }

        async fn update(&self, data: String, selector: Option<String>) -> Result<(), StoreError> {
            lock(&self.updates).push((data, selector));
            if self.fail_update {
                return Err(StoreError::Rejected("Test error".to_string()));
            }
            Ok(())
        }
    }

    fn submitted_bill_has_receipt(data: &str) -> bool {
        let bill: BillRecord = serde_json::from_str(data).unwrap();
        bill.has_consistent_receipt() && bill.file_url.is_some()
    }

    struct Fixture {
        page: NewBill,
        navigator: Arc<NavigationLog>,
        feedback: Arc<AlertLog>,
    }

    fn fixture(store: Option<Arc<CountingStore>>) -> Fixture {
        let session = LocalStorageSession::with_user(&CurrentUser {
            role: "Employee".to_string(),
            email: "test@example.com".to_string(),
        })
        .unwrap();
        let navigator = Arc::new(NavigationLog::new());
        let feedback = Arc::new(AlertLog::new());
        let store = store.map(|s| s as Arc<dyn BillStore>);
        let page = NewBill::new(store, Arc::new(session), navigator.clone(), feedback.clone());
        Fixture { page, navigator, feedback }
    }

    fn form(pct: &str) -> NewBillForm {
        NewBillForm {
            expense_type: "Transports".to_string(),
            expense_name: "Flight ticket".to_string(),
            amount: "150".to_string(),
            date: "2024-01-01".to_string(),
            vat: "30".to_string(),
            pct: pct.to_string(),
            commentary: "Conference trip".to_string(),
        }
    }

    #[tokio::test]
    async fn invalid_file_alerts_and_clears_input() {
        let store = Arc::new(CountingStore::default());
        let f = fixture(Some(store.clone()));

        let file = ReceiptFile::from_bytes("test.txt", "text/plain", b"dummy content".to_vec());
        let err = f.page.on_file_chosen(file, r"C:\fakepath\test.txt").await.unwrap_err();

        assert!(matches!(err, FileRejection::InvalidExtension));
        assert_eq!(
            f.feedback.alerts(),
            ["Invalid file type. Please select a .jpg, .jpeg, or .png file."]
        );
        assert_eq!(f.feedback.cleared_count(), 1);
        assert_eq!(store.creates.load(Ordering::SeqCst), 0);
        assert!(f.page.receipt().is_none());
    }

    #[tokio::test]
    async fn valid_file_is_uploaded() {
        let store = Arc::new(CountingStore::default());
        let f = fixture(Some(store.clone()));

        let file = ReceiptFile::from_bytes("test.png", "image/png", PNG.to_vec());
        let task = f.page.on_file_chosen(file, r"C:\fakepath\test.png").await.unwrap();
        let outcome = task.outcome().await;

        assert!(outcome.accepted);
        assert_eq!(outcome.remote_key.as_deref(), Some("1234"));
        assert!(f.feedback.alerts().is_empty());
        assert_eq!(
            f.page.receipt(),
            Some(UploadedReceipt {
                url: "https://localhost:3456/images/test.png".to_string(),
                file_name: "test.png".to_string(),
                key: "1234".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn upload_failure_leaves_receipt_unset() {
        let store = Arc::new(CountingStore { fail_create: true, ..Default::default() });
        let f = fixture(Some(store.clone()));

        let file = ReceiptFile::from_bytes("test.png", "image/png", PNG.to_vec());
        let outcome = f.page.on_file_chosen(file, "test.png").await.unwrap().outcome().await;

        assert!(!outcome.accepted);
        assert_eq!(outcome.reason.as_deref(), Some("Erreur 500"));
        assert!(f.page.receipt().is_none());
        assert!(f.feedback.alerts().is_empty());
    }

    #[tokio::test]
    async fn submit_persists_and_navigates() {
        let store = Arc::new(CountingStore::default());
        let f = fixture(Some(store.clone()));

        let file = ReceiptFile::from_bytes("test.png", "image/png", PNG.to_vec());
        f.page.on_file_chosen(file, "test.png").await.unwrap().outcome().await;

        let submitted = f.page.on_submit(&form("20")).unwrap();
        assert_eq!(f.navigator.history(), [Route::Bills]);
        submitted.persistence.unwrap().await.unwrap();

        let updates = lock(&store.updates).clone();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].1.as_deref(), Some("1234"));

        assert!(submitted_bill_has_receipt(&updates[0].0));
        let stored: BillRecord = serde_json::from_str(&updates[0].0).unwrap();
        assert_eq!(stored.owner_email, "test@example.com");
        assert_eq!(stored.amount, Some(150));
        assert_eq!(stored.file_name.as_deref(), Some("test.png"));
        assert_eq!(stored.status, crate::models::BillStatus::Pending);

        // 写入成功后再次跳转
        assert_eq!(f.navigator.history(), [Route::Bills, Route::Bills]);
    }

    #[tokio::test]
    async fn submit_uses_default_percent() {
        let f = fixture(None);
        assert_eq!(f.page.on_submit(&form("")).unwrap().bill.pct, 20);
        assert_eq!(f.page.on_submit(&form("15")).unwrap().bill.pct, 15);
    }

    #[tokio::test]
    async fn submit_keeps_unparsable_amount() {
        let f = fixture(None);
        let mut values = form("20");
        values.amount = "cent".to_string();
        assert_eq!(f.page.on_submit(&values).unwrap().bill.amount, None);
    }

    #[tokio::test]
    async fn failed_update_still_navigates() {
        let store = Arc::new(CountingStore { fail_update: true, ..Default::default() });
        let f = fixture(Some(store.clone()));

        let submitted = f.page.on_submit(&form("20")).unwrap();
        submitted.persistence.unwrap().await.unwrap();

        assert_eq!(lock(&store.updates).len(), 1);
        assert_eq!(f.navigator.history(), [Route::Bills]);
    }

    #[tokio::test]
    async fn no_store_skips_update_and_navigates() {
        let f = fixture(None);
        let submitted = f.page.on_submit(&form("20")).unwrap();

        assert!(submitted.persistence.is_none());
        assert_eq!(f.navigator.history(), [Route::Bills]);
    }

    #[tokio::test]
    async fn submit_before_upload_has_no_receipt() {
        let store = Arc::new(CountingStore::default());
        let f = fixture(Some(store.clone()));

        let submitted = f.page.on_submit(&form("20")).unwrap();
        assert_eq!(submitted.bill.file_url, None);
        assert_eq!(submitted.bill.file_name, None);
        assert!(submitted.bill.has_consistent_receipt());
        submitted.persistence.unwrap().await.unwrap();
        assert_eq!(lock(&store.updates)[0].1, None);
    }

    #[tokio::test]
    async fn submit_without_session_user_fails_before_navigation() {
        let navigator = Arc::new(NavigationLog::new());
        let page = NewBill::new(
            None,
            Arc::new(LocalStorageSession::new()),
            navigator.clone(),
            Arc::new(AlertLog::new()),
        );

        assert!(matches!(page.on_submit(&form("20")), Err(SubmitError::Session(_))));
        assert!(navigator.history().is_empty());
    }
}
