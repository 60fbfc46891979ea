use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

/// 票据图片内容: 已在内存中, 或需要从磁盘读取
#[derive(Debug, Clone)]
pub enum ReceiptContent {
    Loaded(Vec<u8>),
    OnDisk(PathBuf),
}

/// 用户选择的票据文件
#[derive(Debug, Clone)]
pub struct ReceiptFile {
    pub name: String,
    pub mime_type: String,
    pub content: ReceiptContent,
}

impl ReceiptFile {
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content: ReceiptContent::Loaded(bytes),
        }
    }

    pub fn from_path(path: impl AsRef<Path>, mime_type: impl Into<String>) -> Self {
        let path = path.as_ref();
        Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            mime_type: mime_type.into(),
            content: ReceiptContent::OnDisk(path.to_path_buf()),
        }
    }

    /// 完整读取文件内容
    pub async fn load(&self) -> io::Result<Cow<'_, [u8]>> {
        match &self.content {
            ReceiptContent::Loaded(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
            ReceiptContent::OnDisk(path) => tokio::fs::read(path).await.map(Cow::Owned),
        }
    }
}

/// 浏览器上报的路径形如 `C:\fakepath\receipt.png`, 取最后一段
pub fn file_name_from_path(raw_path: &str) -> &str {
    raw_path.rsplit('\\').next().unwrap_or(raw_path)
}

/// 上传请求头
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadHeaders {
    pub no_content_type: bool,
}

/// 上传到存储端的表单: 文件 + 当前用户邮箱
#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    pub file: ReceiptFile,
    pub email: String,
    pub headers: UploadHeaders,
}

/// 存储端创建票据后的返回
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedReceipt {
    #[serde(rename = "fileUrl")]
    pub file_url: String,
    pub key: String,
}

/// 上传成功后保存在提交状态中的票据引用
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedReceipt {
    pub url: String,
    pub file_name: String,
    pub key: String,
}

/// 一次文件选择的最终结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub accepted: bool,
    pub reason: Option<String>,
    pub remote_url: Option<String>,
    pub remote_key: Option<String>,
}

impl UploadOutcome {
    pub fn uploaded(created: &CreatedReceipt) -> Self {
        Self {
            accepted: true,
            reason: None,
            remote_url: Some(created.file_url.clone()),
            remote_key: Some(created.key.clone()),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: Some(reason.into()),
            remote_url: None,
            remote_key: None,
        }
    }
}
