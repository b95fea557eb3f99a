use crate::domain::model::{NormalizedRecord, RawRecord};
use crate::utils::error::{EtlError, Result};

/// Map one raw source row into the fixed destination shape.
///
/// Field-by-field copy/cast: the ten string fields are taken verbatim and the
/// six monetary fields must parse as numbers. Any missing key or unparsable
/// amount fails the whole record; the caller drops it and moves on.
pub fn normalize(raw: &RawRecord) -> Result<NormalizedRecord> {
    Ok(NormalizedRecord {
        plate: string_field(raw, "plate")?,
        state: string_field(raw, "state")?,
        summons_number: string_field(raw, "summons_number")?,
        license_type: string_field(raw, "license_type")?,
        issue_date: string_field(raw, "issue_date")?,
        violation_time: string_field(raw, "violation_time")?,
        violation: string_field(raw, "violation")?,
        fine_amount: money_field(raw, "fine_amount")?,
        penalty_amount: money_field(raw, "penalty_amount")?,
        interest_amount: money_field(raw, "interest_amount")?,
        reduction_amount: money_field(raw, "reduction_amount")?,
        payment_amount: money_field(raw, "payment_amount")?,
        amount_due: money_field(raw, "amount_due")?,
        precinct: string_field(raw, "precinct")?,
        county: string_field(raw, "county")?,
        issuing_agency: string_field(raw, "issuing_agency")?,
    })
}

fn malformed(field: &str) -> EtlError {
    EtlError::MalformedRecordError {
        field: field.to_string(),
    }
}

fn string_field(raw: &RawRecord, field: &str) -> Result<String> {
    match raw.data.get(field) {
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        // Socrata occasionally delivers numeric-looking columns as numbers.
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        _ => Err(malformed(field)),
    }
}

fn money_field(raw: &RawRecord, field: &str) -> Result<f64> {
    match raw.data.get(field) {
        Some(serde_json::Value::String(s)) => {
            s.trim().parse::<f64>().map_err(|_| malformed(field))
        }
        Some(serde_json::Value::Number(n)) => n.as_f64().ok_or_else(|| malformed(field)),
        _ => Err(malformed(field)),
    }
}
