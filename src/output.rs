use crate::error::Result;
use crate::types::{
    BrandCostRow, DashboardView, FilterOptions, MeanCost, StatusCountRow, SummaryRow,
    VehicleRecord, VehicleRow,
};
use crate::util::{format_int, format_number};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Render the first `max_rows` rows as a markdown table.
pub fn table_string<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", table_string(rows, max_rows));
    if rows.len() > max_rows {
        println!("({} more rows not shown)\n", format_int(rows.len() - max_rows));
    }
}

pub fn format_mean_cost(mean: MeanCost, currency: &str) -> String {
    match mean {
        MeanCost::Value(v) => format!("{} {}", currency, format_number(v, 2)),
        MeanCost::NoData => "no data".to_string(),
    }
}

pub fn vehicle_row(r: &VehicleRecord, currency: &str) -> VehicleRow {
    VehicleRow {
        name: r.name.clone(),
        brand: r.brand.clone(),
        mileage: format!("{} km", format_int(r.mileage)),
        expiration: r
            .license_expiration
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string()),
        days_left: r
            .days_until_expiration
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string()),
        status: r.status.label().to_string(),
        cost: format!("{} {}", currency, format_number(r.cost, 2)),
        observation: r.observation.clone(),
    }
}

pub fn summary_row(view: &DashboardView<'_>, currency: &str) -> SummaryRow {
    let s = &view.summary;
    SummaryRow {
        total: format_int(s.total),
        expired_or_critical: format_int(s.expired_or_critical),
        warning: format_int(s.warning),
        mean_cost: format_mean_cost(s.mean_cost, currency),
    }
}

pub fn status_rows(view: &DashboardView<'_>) -> Vec<StatusCountRow> {
    view.charts
        .status_distribution
        .iter()
        .map(|s| StatusCountRow {
            status: s.status.label().to_string(),
            count: format_int(s.count),
            color: s.color.to_string(),
        })
        .collect()
}

pub fn brand_rows(view: &DashboardView<'_>, currency: &str) -> Vec<BrandCostRow> {
    view.charts
        .cost_by_brand
        .iter()
        .map(|b| BrandCostRow {
            brand: b.brand.to_string(),
            mean_cost: format!("{} {}", currency, format_number(b.mean_cost, 2)),
        })
        .collect()
}

/// Print the whole dashboard to stdout.
pub fn render_dashboard(view: &DashboardView<'_>, currency: &str, preview_rows: usize) {
    println!("Fleet Management Dashboard\n");
    preview_table_rows(&[summary_row(view, currency)], 1);

    println!("License Status");
    let statuses = status_rows(view);
    preview_table_rows(&statuses, statuses.len());

    println!("Average Cost by Brand");
    let brands = brand_rows(view, currency);
    preview_table_rows(&brands, brands.len());

    println!("Vehicles with Licenses Close to Expiration");
    let alerts: Vec<VehicleRow> = view.alerts.iter().map(|r| vehicle_row(r, currency)).collect();
    preview_table_rows(&alerts, preview_rows);

    println!("Filtered Vehicles");
    let filtered: Vec<VehicleRow> = view
        .filtered
        .iter()
        .map(|r| vehicle_row(r, currency))
        .collect();
    preview_table_rows(&filtered, preview_rows);
}

pub fn render_filter_options(opts: &FilterOptions) {
    let statuses: Vec<&str> = opts.statuses.iter().map(|s| s.label()).collect();
    println!("Statuses: All, {}", statuses.join(", "));
    println!("Brands: All, {}", opts.brands.join(", "));
    println!("Observations: All, {}", opts.observations.join(", "));
    println!("Max mileage: 0 - {}\n", format_int(opts.max_mileage));
}

/// Write every part of the view into `dir`. Returns the files written.
pub fn export_dashboard(view: &DashboardView<'_>, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let path = dir.join("filtered.csv");
    write_csv(&path, &view.filtered)?;
    written.push(path);

    let path = dir.join("alerts.csv");
    write_csv(&path, &view.alerts)?;
    written.push(path);

    let path = dir.join("status_distribution.csv");
    write_csv(&path, &view.charts.status_distribution)?;
    written.push(path);

    let path = dir.join("cost_by_brand.csv");
    write_csv(&path, &view.charts.cost_by_brand)?;
    written.push(path);

    let path = dir.join("expiration_timeline.csv");
    write_csv(&path, &view.charts.expiration_timeline)?;
    written.push(path);

    let path = dir.join("summary.json");
    write_json(&path, &view.summary)?;
    written.push(path);

    info!("Exported {} files to {}", written.len(), dir.display());
    Ok(written)
}
