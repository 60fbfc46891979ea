pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;
pub mod ui;
mod util;

pub use config::AppConfig;
pub use routes::Route;
pub use service::{BillsPage, NewBill, ReceiptValidator};
pub use store::{BillStore, MemoryBillStore};
