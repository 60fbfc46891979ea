pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use dashmap::DashMap;
use std::sync::Arc;

use crate::service::NewBill;
use crate::store::{BillStore, LocalStorageSession};
use crate::ui::{AlertLog, NavigationLog};

pub use handlers::*;

/// 单个用户正在填写的新建票据表单
pub struct Draft {
    pub page: NewBill,
    pub navigator: Arc<NavigationLog>,
    pub feedback: Arc<AlertLog>,
}

impl Draft {
    pub fn new(store: Arc<dyn BillStore>, session: Arc<LocalStorageSession>) -> Self {
        let navigator = Arc::new(NavigationLog::new());
        let feedback = Arc::new(AlertLog::new());
        let page = NewBill::new(Some(store), session, navigator.clone(), feedback.clone());
        Self {
            page,
            navigator,
            feedback,
        }
    }
}

/// 共享状态: 存储端 + 按邮箱索引的草稿
pub struct AppState {
    pub store: Arc<dyn BillStore>,
    pub drafts: DashMap<String, Arc<Draft>>,
}

impl AppState {
    pub fn new(store: Arc<dyn BillStore>) -> Arc<Self> {
        Arc::new(Self {
            store,
            drafts: DashMap::new(),
        })
    }

    /// 取出用户草稿, 不存在时新建
    pub fn draft_for(&self, email: &str, session: Arc<LocalStorageSession>) -> Arc<Draft> {
        self.drafts
            .entry(email.to_string())
            .or_insert_with(|| Arc::new(Draft::new(self.store.clone(), session)))
            .clone()
    }
}

/// 构建路由
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/bills", get(list_bills).post(submit_bill))
        .route("/api/bills/new", post(new_bill))
        .route("/api/bills/receipt", post(upload_receipt))
        .route("/api/bills/preview", get(preview_receipt))
        .with_state(state)
}
