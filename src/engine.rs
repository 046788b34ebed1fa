use crate::status::LicenseStatus;
use crate::types::{
    BrandCost, ChartData, DashboardView, FilterSpec, StatusCount, SummaryCards, TimelinePoint,
    VehicleRecord,
};
use crate::util::average;
use std::collections::BTreeMap;
use tracing::debug;

/// Build the dashboard view for one filter state.
///
/// Everything except `alerts` is computed over the filtered rows; alerts
/// always cover the whole fleet so the risk table ignores active filters.
pub fn apply<'a>(rows: &'a [VehicleRecord], filter: &FilterSpec) -> DashboardView<'a> {
    let filtered: Vec<&VehicleRecord> = rows.iter().filter(|r| filter.matches(r)).collect();
    debug!("Filter {:?} kept {}/{} rows", filter, filtered.len(), rows.len());

    let charts = ChartData {
        status_distribution: status_distribution(&filtered),
        cost_by_brand: cost_by_brand(&filtered),
        expiration_timeline: expiration_timeline(&filtered),
    };
    let summary = summarize(&filtered);
    let alerts = collect_alerts(rows);

    DashboardView {
        filtered,
        charts,
        alerts,
        summary,
    }
}

/// Count per status, all five present in urgency order.
pub fn status_distribution(rows: &[&VehicleRecord]) -> Vec<StatusCount> {
    LicenseStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: rows.iter().filter(|r| r.status == status).count(),
            color: status.color(),
        })
        .collect()
}

/// Mean cost per brand, sorted by brand. Brands without rows are omitted.
pub fn cost_by_brand<'a>(rows: &[&'a VehicleRecord]) -> Vec<BrandCost<'a>> {
    let mut map: BTreeMap<&'a str, Vec<f64>> = BTreeMap::new();
    for r in rows {
        map.entry(r.brand.as_str()).or_default().push(r.cost);
    }
    map.into_iter()
        .filter_map(|(brand, costs)| {
            average(&costs).map(|mean_cost| BrandCost { brand, mean_cost })
        })
        .collect()
}

pub fn expiration_timeline<'a>(rows: &[&'a VehicleRecord]) -> Vec<TimelinePoint<'a>> {
    rows.iter()
        .filter_map(|r| {
            r.license_expiration.map(|expiration| TimelinePoint {
                name: r.name.as_str(),
                expiration,
                status: r.status,
            })
        })
        .collect()
}

pub fn summarize(rows: &[&VehicleRecord]) -> SummaryCards {
    let costs: Vec<f64> = rows.iter().map(|r| r.cost).collect();
    SummaryCards {
        total: rows.len(),
        expired_or_critical: rows.iter().filter(|r| r.status.is_urgent()).count(),
        warning: rows
            .iter()
            .filter(|r| r.status == LicenseStatus::Warning)
            .count(),
        mean_cost: average(&costs).into(),
    }
}

/// Expired, critical and warning vehicles from the full fleet, most urgent
/// first. The sort is stable, so ties keep dataset order.
pub fn collect_alerts(rows: &[VehicleRecord]) -> Vec<&VehicleRecord> {
    let mut alerts: Vec<&VehicleRecord> = rows.iter().filter(|r| r.status.is_alert()).collect();
    alerts.sort_by_key(|r| r.days_until_expiration);
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MeanCost, Selection};
    use chrono::NaiveDate;

    fn vehicle(name: &str, mileage: u64, days: Option<i64>, cost: f64, obs: &str) -> VehicleRecord {
        let base = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        VehicleRecord {
            name: name.to_string(),
            brand: crate::util::extract_brand(name),
            mileage,
            license_expiration: days.map(|d| base + chrono::Duration::days(d)),
            days_until_expiration: days,
            status: LicenseStatus::from_days(days),
            cost,
            observation: obs.to_string(),
        }
    }

    fn fleet() -> Vec<VehicleRecord> {
        vec![
            vehicle("Toyota Corolla", 15_000, Some(5), 500.0, "Revisão em dia"),
            vehicle("Honda Civic", 42_000, Some(20), 700.0, "Troca de pneus"),
            vehicle("Toyota Hilux", 80_000, Some(-3), 1_200.0, "Revisão em dia"),
            vehicle("Fiat Uno", 120_000, None, 300.0, "Troca de óleo"),
            vehicle("Honda Fit", 9_000, Some(90), 450.0, "Troca de pneus"),
        ]
    }

    fn all(max_mileage: u64) -> FilterSpec {
        FilterSpec {
            status: Selection::All,
            brand: Selection::All,
            observation: Selection::All,
            max_mileage,
        }
    }

    #[test]
    fn test_all_filter_keeps_everything() {
        let rows = fleet();
        let view = apply(&rows, &all(u64::MAX));
        assert_eq!(view.filtered.len(), rows.len());
        assert_eq!(view.summary.total, 5);
        assert_eq!(view.summary.expired_or_critical, 2);
        assert_eq!(view.summary.warning, 1);
        assert_eq!(view.summary.mean_cost, MeanCost::Value(630.0));
    }

    #[test]
    fn test_zero_mileage_scenario() {
        let rows = vec![vehicle("Toyota Corolla", 15_000, Some(5), 500.0, "Revisão em dia")];
        let view = apply(&rows, &all(0));
        assert!(view.filtered.is_empty());
        assert_eq!(view.summary.total, 0);
        assert_eq!(view.summary.mean_cost, MeanCost::NoData);
        assert!(view.charts.cost_by_brand.is_empty());
        assert!(view.charts.expiration_timeline.is_empty());
        assert_eq!(view.alerts.len(), 1);
        assert_eq!(view.alerts[0].status, LicenseStatus::Critical);
    }

    #[test]
    fn test_cost_by_brand_scenario() {
        let rows = vec![
            vehicle("Toyota Corolla", 100, Some(40), 500.0, ""),
            vehicle("Honda Civic", 100, Some(40), 700.0, ""),
        ];
        let view = apply(&rows, &all(1_000));
        assert_eq!(
            view.charts.cost_by_brand,
            vec![
                BrandCost { brand: "Honda", mean_cost: 700.0 },
                BrandCost { brand: "Toyota", mean_cost: 500.0 },
            ]
        );
    }

    #[test]
    fn test_cost_by_brand_averages_and_omits() {
        let rows = fleet();
        let mut spec = all(100_000);
        spec.observation = Selection::Only("Revisão em dia".to_string());
        let view = apply(&rows, &spec);
        assert_eq!(
            view.charts.cost_by_brand,
            vec![BrandCost { brand: "Toyota", mean_cost: 850.0 }]
        );
    }

    #[test]
    fn test_status_distribution_is_complete_and_sums() {
        let rows = fleet();
        for spec in [all(0), all(50_000), all(u64::MAX)] {
            let view = apply(&rows, &spec);
            let dist = &view.charts.status_distribution;
            let statuses: Vec<_> = dist.iter().map(|s| s.status).collect();
            assert_eq!(statuses, LicenseStatus::ALL.to_vec());
            let total: usize = dist.iter().map(|s| s.count).sum();
            assert_eq!(total, view.filtered.len());
        }
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let rows = fleet();
        let spec = FilterSpec {
            status: Selection::Only(LicenseStatus::Critical),
            brand: Selection::Only("Toyota".to_string()),
            observation: Selection::All,
            max_mileage: 100_000,
        };
        let view = apply(&rows, &spec);
        let names: Vec<_> = view.filtered.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Toyota Corolla"]);
    }

    #[test]
    fn test_max_mileage_is_inclusive() {
        let rows = fleet();
        let view = apply(&rows, &all(15_000));
        let names: Vec<_> = view.filtered.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Toyota Corolla", "Honda Fit"]);
    }

    #[test]
    fn test_filter_is_idempotent_subset() {
        let rows = fleet();
        let spec = FilterSpec {
            status: Selection::All,
            brand: Selection::Only("Honda".to_string()),
            observation: Selection::Only("Troca de pneus".to_string()),
            max_mileage: 50_000,
        };
        let first = apply(&rows, &spec);
        let second = apply(&rows, &spec);
        assert_eq!(first, second);
        assert!(first.filtered.len() <= rows.len());
        assert!(first.filtered.iter().all(|r| rows.contains(r)));
    }

    #[test]
    fn test_alerts_ignore_filters() {
        let rows = fleet();
        let baseline = apply(&rows, &all(u64::MAX)).alerts;
        let narrowed = FilterSpec {
            status: Selection::All,
            brand: Selection::Only("Fiat".to_string()),
            observation: Selection::Only("Troca de óleo".to_string()),
            max_mileage: 0,
        };
        assert_eq!(apply(&rows, &narrowed).alerts, baseline);

        let names: Vec<_> = baseline.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Toyota Hilux", "Toyota Corolla", "Honda Civic"]);
    }

    #[test]
    fn test_timeline_skips_unknown_dates() {
        let rows = fleet();
        let view = apply(&rows, &all(u64::MAX));
        let names: Vec<_> = view
            .charts
            .expiration_timeline
            .iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(
            names,
            vec!["Toyota Corolla", "Honda Civic", "Toyota Hilux", "Honda Fit"]
        );
    }

    #[test]
    fn test_view_serializes_deterministically() {
        let rows = fleet();
        let a = serde_json::to_string(&apply(&rows, &all(u64::MAX))).unwrap();
        let b = serde_json::to_string(&apply(&rows, &all(u64::MAX))).unwrap();
        assert_eq!(a, b);
    }
}
