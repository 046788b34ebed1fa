use crate::engine;
use crate::error::Result;
use crate::loader;
use crate::normalizer::normalize;
use crate::status::LicenseStatus;
use crate::types::{DashboardView, FilterOptions, FilterSpec, NormalizeReport, RawRow, Selection, VehicleRecord};
use chrono::NaiveDateTime;
use std::collections::BTreeSet;
use std::path::Path;

/// The normalized fleet, built once and read-only afterwards.
///
/// Views borrow from it, so a context outlives every view it produces.
#[derive(Debug, Clone)]
pub struct FleetContext {
    rows: Vec<VehicleRecord>,
    reference_time: NaiveDateTime,
    report: NormalizeReport,
}

impl FleetContext {
    pub fn from_raw(raw: &[RawRow], reference_time: NaiveDateTime) -> Result<Self> {
        let (rows, report) = normalize(raw, reference_time)?;
        Ok(Self {
            rows,
            reference_time,
            report,
        })
    }

    /// Read a CSV export and normalize it.
    pub fn load(path: &Path, reference_time: NaiveDateTime) -> Result<Self> {
        let raw = loader::read_rows(path)?;
        Self::from_raw(&raw, reference_time)
    }

    pub fn rows(&self) -> &[VehicleRecord] {
        &self.rows
    }

    pub fn reference_time(&self) -> NaiveDateTime {
        self.reference_time
    }

    pub fn report(&self) -> &NormalizeReport {
        &self.report
    }

    /// Highest mileage in the fleet; upper bound for the mileage filter.
    pub fn max_mileage(&self) -> u64 {
        self.rows.iter().map(|r| r.mileage).max().unwrap_or(0)
    }

    /// Distinct filter values, sorted. Empty brands and tags are left out.
    pub fn filter_options(&self) -> FilterOptions {
        let brands: BTreeSet<&str> = self
            .rows
            .iter()
            .map(|r| r.brand.as_str())
            .filter(|b| !b.is_empty())
            .collect();
        let observations: BTreeSet<&str> = self
            .rows
            .iter()
            .map(|r| r.observation.as_str())
            .filter(|o| !o.is_empty())
            .collect();
        FilterOptions {
            statuses: LicenseStatus::ALL.to_vec(),
            brands: brands.into_iter().map(str::to_string).collect(),
            observations: observations.into_iter().map(str::to_string).collect(),
            max_mileage: self.max_mileage(),
        }
    }

    /// The filter shown right after loading: nothing excluded.
    pub fn default_filter(&self) -> FilterSpec {
        FilterSpec {
            status: Selection::All,
            brand: Selection::All,
            observation: Selection::All,
            max_mileage: self.max_mileage(),
        }
    }

    pub fn view(&self, filter: &FilterSpec) -> DashboardView<'_> {
        engine::apply(&self.rows, filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn context() -> FleetContext {
        let raw = |name: &str, km: &str, exp: &str, cost: &str, obs: &str| RawRow {
            name: Some(name.to_string()),
            mileage: Some(km.to_string()),
            license_expiration: Some(exp.to_string()),
            cost: Some(cost.to_string()),
            observation: Some(obs.to_string()),
        };
        let rows = vec![
            raw("Toyota Corolla", "15000 km", "2025-06-06", "500", "Revisão em dia"),
            raw("Honda Civic", "42000 km", "2025-06-21", "700", "Troca de pneus"),
            raw("Toyota Hilux", "80000 km", "", "1200", ""),
        ];
        let now = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        FleetContext::from_raw(&rows, now).unwrap()
    }

    #[test]
    fn test_default_filter_shows_everything() {
        let ctx = context();
        let spec = ctx.default_filter();
        assert_eq!(spec.max_mileage, 80_000);
        let view = ctx.view(&spec);
        assert_eq!(view.filtered.len(), ctx.rows().len());
    }

    #[test]
    fn test_filter_options() {
        let ctx = context();
        let opts = ctx.filter_options();
        assert_eq!(opts.statuses.len(), 5);
        assert_eq!(opts.brands, vec!["Honda", "Toyota"]);
        assert_eq!(opts.observations, vec!["Revisão em dia", "Troca de pneus"]);
        assert_eq!(opts.max_mileage, 80_000);
    }

    #[test]
    fn test_reference_time_is_captured_once() {
        let ctx = context();
        // 2025-06-06 00:00 is 4 days 15 hours after 2025-06-01 09:00
        assert_eq!(ctx.rows()[0].days_until_expiration, Some(4));
        assert_eq!(ctx.report().unknown_expirations, 1);
        let first = ctx.view(&ctx.default_filter());
        let second = ctx.view(&ctx.default_filter());
        assert_eq!(first, second);
    }
}
