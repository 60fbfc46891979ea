pub mod bills;
pub mod format;
pub mod new_bill;
pub mod validator;

pub use bills::{BillsPage, BillsView, DEFAULT_MODAL_WIDTH};
pub use format::{format_bills, format_date};
pub use new_bill::{NewBill, SubmittedBill, UploadTask};
pub use validator::ReceiptValidator;
