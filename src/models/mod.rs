pub mod bill;
pub mod display;
pub mod receipt;
pub mod user;

pub use bill::{parse_int_prefix, BillRecord, BillStatus, NewBillForm, DEFAULT_VAT_PERCENT};
pub use display::{DisplayBill, ReceiptModal};
pub use receipt::{
    file_name_from_path, CreatedReceipt, ReceiptContent, ReceiptFile, ReceiptUpload,
    UploadHeaders, UploadOutcome, UploadedReceipt,
};
pub use user::CurrentUser;
