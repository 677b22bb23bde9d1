// src/db/mod.rs
pub mod records_db_conn;
pub mod records_db_ops;

pub use records_db_conn::{open_records_db, open_records_db_in_memory};
pub use records_db_ops::{PendingPosting, PendingRecord, PostingHit};
