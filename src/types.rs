use crate::error::Result;
use crate::status::LicenseStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Borrow;
use tabled::Tabled;

/// One row of the fleet spreadsheet export, exactly as read.
///
/// Headers follow the source spreadsheet; English aliases are accepted too.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Nome do Carro", alias = "name")]
    pub name: Option<String>,
    #[serde(rename = "KM da Última Revisão", alias = "mileage")]
    pub mileage: Option<String>,
    #[serde(rename = "Vencimento da Licença", alias = "license_expiration")]
    pub license_expiration: Option<String>,
    #[serde(rename = "Gastos com o Veículo (R$)", alias = "cost")]
    pub cost: Option<String>,
    #[serde(rename = "Observações do Veículo", alias = "observation")]
    pub observation: Option<String>,
}

/// A normalized vehicle with its derived fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleRecord {
    pub name: String,
    pub brand: String,
    pub mileage: u64,
    pub license_expiration: Option<NaiveDate>,
    pub days_until_expiration: Option<i64>,
    pub status: LicenseStatus,
    pub cost: f64,
    pub observation: String,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    pub total_rows: usize,
    pub unknown_expirations: usize,
}

/// A single filter criterion: either everything, or one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Selection<T> {
    pub fn matches<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted.borrow() == value,
        }
    }

    /// Parse user input. "All" (and the source's "Todos"/"Todas") selects
    /// everything; anything else goes through `parse`.
    pub fn parse_with<F>(input: &str, parse: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Result<T>,
    {
        let trimmed = input.trim();
        if is_all_keyword(trimmed) {
            Ok(Selection::All)
        } else {
            parse(trimmed).map(Selection::Only)
        }
    }
}

fn is_all_keyword(s: &str) -> bool {
    ["all", "todos", "todas"]
        .iter()
        .any(|k| s.eq_ignore_ascii_case(k))
}

/// The only external control input of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub status: Selection<LicenseStatus>,
    pub brand: Selection<String>,
    pub observation: Selection<String>,
    /// Inclusive upper bound.
    pub max_mileage: u64,
}

impl FilterSpec {
    /// Conjunction of every criterion.
    pub fn matches(&self, r: &VehicleRecord) -> bool {
        self.status.matches(&r.status)
            && self.brand.matches(r.brand.as_str())
            && self.observation.matches(r.observation.as_str())
            && r.mileage <= self.max_mileage
    }
}

/// Values offered to the user when choosing a filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub statuses: Vec<LicenseStatus>,
    pub brands: Vec<String>,
    pub observations: Vec<String>,
    pub max_mileage: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: LicenseStatus,
    pub count: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandCost<'a> {
    pub brand: &'a str,
    pub mean_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint<'a> {
    pub name: &'a str,
    pub expiration: NaiveDate,
    pub status: LicenseStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData<'a> {
    pub status_distribution: Vec<StatusCount>,
    pub cost_by_brand: Vec<BrandCost<'a>>,
    pub expiration_timeline: Vec<TimelinePoint<'a>>,
}

/// A mean that may have nothing to average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeanCost {
    Value(f64),
    NoData,
}

impl From<Option<f64>> for MeanCost {
    fn from(v: Option<f64>) -> Self {
        v.map_or(MeanCost::NoData, MeanCost::Value)
    }
}

impl Serialize for MeanCost {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            MeanCost::Value(v) => serializer.serialize_f64(*v),
            MeanCost::NoData => serializer.serialize_str("no data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCards {
    pub total: usize,
    pub expired_or_critical: usize,
    pub warning: usize,
    pub mean_cost: MeanCost,
}

/// Everything the rendering surface needs for one filter state. Borrows
/// from the normalized rows and is dropped after rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView<'a> {
    pub filtered: Vec<&'a VehicleRecord>,
    pub charts: ChartData<'a>,
    pub alerts: Vec<&'a VehicleRecord>,
    pub summary: SummaryCards,
}

#[derive(Debug, Tabled, Clone)]
pub struct VehicleRow {
    #[tabled(rename = "Vehicle")]
    pub name: String,
    #[tabled(rename = "Brand")]
    pub brand: String,
    #[tabled(rename = "Mileage")]
    pub mileage: String,
    #[tabled(rename = "Expiration")]
    pub expiration: String,
    #[tabled(rename = "DaysLeft")]
    pub days_left: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Cost")]
    pub cost: String,
    #[tabled(rename = "Observation")]
    pub observation: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct StatusCountRow {
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Vehicles")]
    pub count: String,
    #[tabled(rename = "Color")]
    pub color: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct BrandCostRow {
    #[tabled(rename = "Brand")]
    pub brand: String,
    #[tabled(rename = "AvgCost")]
    pub mean_cost: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct SummaryRow {
    #[tabled(rename = "TotalVehicles")]
    pub total: String,
    #[tabled(rename = "ExpiredOrCritical")]
    pub expired_or_critical: String,
    #[tabled(rename = "Warning")]
    pub warning: String,
    #[tabled(rename = "AvgCost")]
    pub mean_cost: String,
}
