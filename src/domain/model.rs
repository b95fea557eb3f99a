use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row as delivered by a source API page. Shape is not guaranteed:
/// fields may be absent or malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub data: HashMap<String, serde_json::Value>,
}

/// A parking-violation record in the fixed destination shape.
///
/// Invariant: all six monetary fields parsed as numbers, or the whole record
/// was discarded. There are no partial records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub plate: String,
    pub state: String,
    pub summons_number: String,
    pub license_type: String,
    /// Kept as "mm/dd/yyyy" text; the destination mapping declares the format.
    pub issue_date: String,
    pub violation_time: String,
    pub violation: String,
    pub fine_amount: f64,
    pub penalty_amount: f64,
    pub interest_amount: f64,
    pub reduction_amount: f64,
    pub payment_amount: f64,
    pub amount_due: f64,
    pub precinct: String,
    pub county: String,
    pub issuing_agency: String,
}
