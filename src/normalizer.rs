use crate::error::{FleetError, Result};
use crate::status::LicenseStatus;
use crate::types::{NormalizeReport, RawRow, VehicleRecord};
use crate::util::{days_until, extract_brand, parse_cost, parse_date_safe, parse_mileage};
use chrono::NaiveDateTime;
use tracing::{debug, info};

/// Turn raw spreadsheet rows into typed vehicle records.
///
/// `reference` is the "now" every day count is measured from; it is taken
/// once by the caller so the whole pass sees the same instant. The function
/// is pure: same rows and reference, same output.
///
/// A mileage or cost cell that cannot be parsed fails the whole pass. A bad
/// or missing expiration date only makes that row `Unknown`.
pub fn normalize(
    raw: &[RawRow],
    reference: NaiveDateTime,
) -> Result<(Vec<VehicleRecord>, NormalizeReport)> {
    let mut records = Vec::with_capacity(raw.len());
    let mut unknown_expirations = 0usize;

    for (idx, row) in raw.iter().enumerate() {
        let row_no = idx + 1;

        let mileage = parse_mileage(row.mileage.as_deref())
            .ok_or_else(|| malformed(row_no, "mileage", &row.mileage))?;
        let cost =
            parse_cost(row.cost.as_deref()).ok_or_else(|| malformed(row_no, "cost", &row.cost))?;

        let license_expiration = parse_date_safe(row.license_expiration.as_deref());
        if license_expiration.is_none() {
            unknown_expirations += 1;
            debug!(
                "Row {}: no usable license expiration ({:?}), status Unknown",
                row_no, row.license_expiration
            );
        }
        let days_until_expiration = license_expiration.map(|d| days_until(d, reference));
        let status = LicenseStatus::from_days(days_until_expiration);

        let name = row.name.as_deref().unwrap_or("").trim().to_string();
        let brand = extract_brand(&name);
        let observation = row.observation.as_deref().unwrap_or("").trim().to_string();

        records.push(VehicleRecord {
            name,
            brand,
            mileage,
            license_expiration,
            days_until_expiration,
            status,
            cost,
            observation,
        });
    }

    let report = NormalizeReport {
        total_rows: records.len(),
        unknown_expirations,
    };
    info!(
        "Normalized {} rows ({} without a usable expiration) against {}",
        report.total_rows, report.unknown_expirations, reference
    );
    Ok((records, report))
}

fn malformed(row: usize, column: &'static str, value: &Option<String>) -> FleetError {
    FleetError::MalformedField {
        row,
        column,
        value: value.clone().unwrap_or_default(),
    }
}
