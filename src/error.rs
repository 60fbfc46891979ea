use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

const INVALID_FILE_TYPE: &str = "Invalid file type. Please select a .jpg, .jpeg, or .png file.";
const INVALID_IMAGE: &str = "Invalid file type. Please select a valid image file.";

/// 票据文件校验失败 (Display 为提示给用户的文本)
#[derive(Error, Debug)]
pub enum FileRejection {
    #[error("{}", INVALID_FILE_TYPE)]
    InvalidExtension,

    #[error("{}", INVALID_IMAGE)]
    InvalidMimeType,

    #[error("{}", INVALID_FILE_TYPE)]
    InvalidSignature,

    #[error("Unable to read the selected file: {0}")]
    Unreadable(#[from] std::io::Error),
}

impl FileRejection {
    /// 简短的拒绝原因
    pub fn reason(&self) -> &'static str {
        match self {
            FileRejection::InvalidExtension => "invalid extension",
            FileRejection::InvalidMimeType => "invalid MIME type",
            FileRejection::InvalidSignature => "invalid signature",
            FileRejection::Unreadable(_) => "unreadable file",
        }
    }
}

/// 存储端调用失败
#[derive(Error, Debug)]
pub enum StoreError {
    /// 存储端返回的原始错误描述, 原样展示
    #[error("{0}")]
    Rejected(String),

    #[error("Bill not found: {0}")]
    NotFound(String),

    #[error("Malformed bill payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unable to read fixtures: {0}")]
    Io(#[from] std::io::Error),
}

/// 会话存储读取失败
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No user in session")]
    MissingUser,

    #[error("Malformed session user: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// 提交表单失败 (发生在导航之前)
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Unable to encode bill: {0}")]
    Encode(#[from] serde_json::Error),
}

/// HTTP 层错误
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] SessionError),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("{0}")]
    Rejected(#[from] FileRejection),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Submit(SubmitError::Session(_)) => StatusCode::UNAUTHORIZED,
            ApiError::Submit(SubmitError::Encode(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            ApiError::Rejected(rejection) => json!({
                "error": self.to_string(),
                "reason": rejection.reason(),
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
