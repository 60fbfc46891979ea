use crate::error::FileRejection;
use crate::models::ReceiptFile;

const ALLOWED_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];
const ALLOWED_MIME_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// 已知文件头 (前 4 字节的十六进制)
const MAGIC_NUMBERS: [(&str, &str); 3] = [
    ("jpg", "ffd8ffe0"),
    ("jpeg", "ffd8ffe0"),
    ("png", "89504e47"),
];

const SIGNATURE_LEN: usize = 4;

/// 票据文件校验: 扩展名 -> MIME -> 文件头, 遇到第一个失败即返回
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceiptValidator;

impl ReceiptValidator {
    pub fn new() -> Self {
        Self
    }

    pub async fn validate(&self, file: &ReceiptFile) -> Result<(), FileRejection> {
        // 1. 扩展名
        if !has_allowed_extension(&file.name) {
            return Err(FileRejection::InvalidExtension);
        }

        // 2. 声明的 MIME 类型
        if !ALLOWED_MIME_TYPES.contains(&file.mime_type.as_str()) {
            return Err(FileRejection::InvalidMimeType);
        }

        // 3. 读取完整内容后检查文件头
        let content = file.load().await?;
        let header = signature_header(&content);
        match detect_format(&header) {
            Some(format) => {
                tracing::debug!("{} recognised as {} ({})", file.name, format, header);
                Ok(())
            }
            None => Err(FileRejection::InvalidSignature),
        }
    }
}

/// 扩展名不区分大小写
pub fn has_allowed_extension(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// 前 4 字节的小写十六进制, 不足 4 字节时取全部
pub fn signature_header(content: &[u8]) -> String {
    hex::encode(&content[..content.len().min(SIGNATURE_LEN)])
}

/// 按文件头识别格式, 与扩展名无关
pub fn detect_format(header: &str) -> Option<&'static str> {
    MAGIC_NUMBERS
        .iter()
        .find(|(_, magic)| header.starts_with(magic))
        .map(|(format, _)| *format)
}
