pub mod database;
pub mod entity;
pub mod repository;

pub use database::{ensure_schema, init_db};
pub use repository::{DlrApply, MessageRepository, StoreError};
