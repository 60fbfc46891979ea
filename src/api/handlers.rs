use axum::{
    extract::{Json, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{AppState, Draft};
use crate::error::ApiError;
use crate::models::{file_name_from_path, BillRecord, CurrentUser, NewBillForm, ReceiptFile};
use crate::service::{BillsPage, BillsView};
use crate::store::{LocalStorageSession, SessionStore};
use crate::ui::{ModalSlot, NavigationLog};

/// 携带会话用户 JSON 的请求头
pub const USER_HEADER: &str = "x-user";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub url: String,
}

/// 请求体: 用户选择的票据文件
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    /// 文件框的值, 如 `C:\fakepath\receipt.png`
    pub path: String,
    pub mime_type: String,
    pub content_base64: String,
}

/// 响应体: 前端需要跳转的路由
#[derive(Debug, Serialize)]
pub struct RedirectResponse {
    pub redirect: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill: Option<BillRecord>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 票据列表
pub async fn list_bills(State(state): State<Arc<AppState>>, Query(query): Query<ListQuery>) -> Response {
    let page = BillsPage::new(
        Some(state.store.clone()),
        Arc::new(NavigationLog::new()),
        Arc::new(ModalSlot::new()),
    );
    let view = page.load().await;

    let status = match view {
        BillsView::Bills(_) => StatusCode::OK,
        BillsView::Error(_) => StatusCode::BAD_GATEWAY,
    };

    if query.format.as_deref() == Some("text") {
        (status, view.render_text()).into_response()
    } else {
        (status, Json(view)).into_response()
    }
}

/// 点击新建票据: 为当前用户创建新草稿
pub async fn new_bill(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<RedirectResponse>, ApiError> {
    let (session, user) = session_from(&headers)?;
    let navigator = Arc::new(NavigationLog::new());
    let page = BillsPage::new(
        Some(state.store.clone()),
        navigator.clone(),
        Arc::new(ModalSlot::new()),
    );
    page.handle_click_new_bill();

    state
        .drafts
        .insert(user.email.clone(), Arc::new(Draft::new(state.store.clone(), session)));
    tracing::info!("New bill draft for {}", user.email);

    Ok(Json(RedirectResponse {
        redirect: navigator.last().map(|r| r.path()).unwrap_or_default(),
        bill: None,
    }))
}

/// 选择票据文件: 校验并在后台上传
pub async fn upload_receipt(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ReceiptRequest>,
) -> Result<Response, ApiError> {
    let (session, user) = session_from(&headers)?;
    let draft = state.draft_for(&user.email, session);

    let content = STANDARD
        .decode(req.content_base64.as_bytes())
        .map_err(|e| ApiError::MalformedPayload(e.to_string()))?;
    let file = ReceiptFile::from_bytes(file_name_from_path(&req.path), req.mime_type, content);

    // 上传在后台完成, 不等待结果
    let _task = draft.page.on_file_chosen(file, &req.path).await?;

    Ok((StatusCode::ACCEPTED, Json(serde_json::json!({ "accepted": true }))).into_response())
}

/// 提交票据表单
pub async fn submit_bill(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(form): Json<NewBillForm>,
) -> Result<Json<RedirectResponse>, ApiError> {
    let (session, user) = session_from(&headers)?;
    let draft = state.draft_for(&user.email, session);

    let submitted = draft.page.on_submit(&form)?;
    // 离开表单页后草稿作废
    state.drafts.remove(&user.email);

    Ok(Json(RedirectResponse {
        redirect: draft.navigator.last().map(|r| r.path()).unwrap_or_default(),
        bill: Some(submitted.bill),
    }))
}

/// 票据图片预览
pub async fn preview_receipt(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    let viewer = Arc::new(ModalSlot::new());
    let page = BillsPage::new(
        Some(state.store.clone()),
        Arc::new(NavigationLog::new()),
        viewer.clone(),
    );
    page.handle_click_icon_eye(&query.url);

    match viewer.take() {
        Some(modal) => Json(modal).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn session_from(headers: &HeaderMap) -> Result<(Arc<LocalStorageSession>, CurrentUser), ApiError> {
    let session = match headers.get(USER_HEADER).and_then(|v| v.to_str().ok()) {
        Some(raw) => LocalStorageSession::with_user_json(raw),
        None => LocalStorageSession::new(),
    };
    let user = session.current_user()?;
    Ok((Arc::new(session), user))
}
