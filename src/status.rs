//! License status buckets.
//!
//! Buckets are half-open and left-inclusive on the day count:
//! `(-inf, 0)` expired, `[0, 7)` critical, `[7, 30)` warning, `[30, inf)` ok.
use crate::error::FleetError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Days below which a license is critical.
pub const CRITICAL_DAYS: i64 = 7;
/// Days below which a license needs attention.
pub const WARNING_DAYS: i64 = 30;

/// License status, ordered by urgency (most urgent first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum LicenseStatus {
    Expired,
    Critical,
    Warning,
    #[serde(rename = "OK")]
    Ok,
    Unknown,
}

impl LicenseStatus {
    /// Every status in urgency order. Charts iterate this so all five
    /// categories are always present.
    pub const ALL: [LicenseStatus; 5] = [
        LicenseStatus::Expired,
        LicenseStatus::Critical,
        LicenseStatus::Warning,
        LicenseStatus::Ok,
        LicenseStatus::Unknown,
    ];

    /// Classify a day count. `None` (no usable expiration date) is `Unknown`.
    pub fn from_days(days: Option<i64>) -> Self {
        match days {
            None => LicenseStatus::Unknown,
            Some(d) if d < 0 => LicenseStatus::Expired,
            Some(d) if d < CRITICAL_DAYS => LicenseStatus::Critical,
            Some(d) if d < WARNING_DAYS => LicenseStatus::Warning,
            Some(_) => LicenseStatus::Ok,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LicenseStatus::Expired => "Expired",
            LicenseStatus::Critical => "Critical",
            LicenseStatus::Warning => "Warning",
            LicenseStatus::Ok => "OK",
            LicenseStatus::Unknown => "Unknown",
        }
    }

    /// Chart colour used by the rendering surface.
    pub fn color(self) -> &'static str {
        match self {
            LicenseStatus::Expired => "red",
            LicenseStatus::Critical => "orange",
            LicenseStatus::Warning => "yellow",
            LicenseStatus::Ok => "green",
            LicenseStatus::Unknown => "grey",
        }
    }

    /// Statuses that belong in the alert table.
    pub fn is_alert(self) -> bool {
        matches!(
            self,
            LicenseStatus::Expired | LicenseStatus::Critical | LicenseStatus::Warning
        )
    }

    /// Expired or critical: counted together on the summary cards.
    pub fn is_urgent(self) -> bool {
        matches!(self, LicenseStatus::Expired | LicenseStatus::Critical)
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LicenseStatus {
    type Err = FleetError;

    /// Accepts the English labels and the Portuguese labels of the source
    /// spreadsheet (`Vencida`, `Crítico (≤7 dias)`, `Atenção (≤30 dias)`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let status = match lower.as_str() {
            "expired" | "vencida" => LicenseStatus::Expired,
            "critical" | "crítico" | "critico" | "crítico (≤7 dias)" | "critico (≤7 dias)" => {
                LicenseStatus::Critical
            }
            "warning" | "atenção" | "atencao" | "atenção (≤30 dias)" | "atencao (≤30 dias)" => {
                LicenseStatus::Warning
            }
            "ok" => LicenseStatus::Ok,
            "unknown" | "desconhecido" => LicenseStatus::Unknown,
            _ => return Err(FleetError::InvalidFilter(format!("unknown status {:?}", s))),
        };
        Ok(status)
    }
}
