// src/demo.rs
//! Demo dataset: thirty customer accounts keyed by account number

use tracing::info;

use crate::error::{CoreError, CoreResult};
use crate::record::Record;
use crate::storage::StorageEngine;

pub const DEMO_ID_FIELD: &str = "acc_no";

const CUSTOMERS: [(&str, &str, &str); 30] = [
    ("Aarav Sharma", "20001", "7500"),
    ("Diya Patel", "20002", "12000"),
    ("Rohan Mehta", "20003", "5600"),
    ("Ananya Iyer", "20004", "9800"),
    ("Kabir Singh", "20005", "1500"),
    ("Meera Nair", "20006", "6400"),
    ("Arjun Reddy", "20007", "22000"),
    ("Sneha Kulkarni", "20008", "3400"),
    ("Vikram Rao", "20009", "8800"),
    ("Ishita Verma", "20010", "4300"),
    ("Rahul Das", "20011", "17000"),
    ("Pooja Menon", "20012", "3900"),
    ("Nikhil Jain", "20013", "8100"),
    ("Kavya Shetty", "20014", "2600"),
    ("Aditya Kapoor", "20015", "9900"),
    ("Tanya Bhat", "20016", "5400"),
    ("Siddharth Malhotra", "20017", "12500"),
    ("Neha Agarwal", "20018", "7100"),
    ("Yash Thakur", "20019", "600"),
    ("Ritika Sinha", "20020", "14300"),
    ("Manish Choudhary", "20021", "4700"),
    ("Shruti Desai", "20022", "8300"),
    ("Karan Oberoi", "20023", "11200"),
    ("Bhavna Rao", "20024", "2900"),
    ("Harsh Vardhan", "20025", "5200"),
    ("Divya Joshi", "20026", "4600"),
    ("Pranav Kulkarni", "20027", "15000"),
    ("Aishwarya Pillai", "20028", "9200"),
    ("Gaurav Mishra", "20029", "6800"),
    ("Sanya Kapoor", "20030", "10400"),
];

pub fn customers() -> Vec<Record> {
    CUSTOMERS
        .iter()
        .map(|&(name, acc_no, balance)| {
            Record::new(DEMO_ID_FIELD, acc_no)
                .with_field("name", name)
                .with_field("balance", balance)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreloadSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Insert every demo customer; accounts already present are skipped, not errors
pub fn preload(engine: &StorageEngine) -> CoreResult<PreloadSummary> {
    let mut summary = PreloadSummary::default();

    for record in customers() {
        match engine.insert(&record) {
            Ok(_) => summary.inserted += 1,
            Err(CoreError::DuplicateIdentifier(_)) => summary.skipped += 1,
            Err(err) => return Err(err),
        }
    }

    info!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        "demo customers loaded"
    );
    Ok(summary)
}
