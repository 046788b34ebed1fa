use chrono::NaiveDate;
use clap::Parser;
use fleet_report::{AppConfig, FilterSpec, FleetContext, LicenseStatus, Result, Selection};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fleet_report", version, about = "Fleet license and cost dashboard")]
pub struct Cli {
    #[arg(long, help = "TOML config file (default: fleet_report.toml if present)")]
    pub config: Option<PathBuf>,
    #[arg(long, help = "CSV export of the fleet spreadsheet")]
    pub data: Option<PathBuf>,
    #[arg(long, help = "Directory for CSV/JSON exports")]
    pub output_dir: Option<PathBuf>,
    #[arg(long, help = "Treat this date (YYYY-MM-DD) as today")]
    pub reference_date: Option<NaiveDate>,
    #[arg(long, help = "Log level (error, warn, info, debug, trace)")]
    pub log_level: Option<String>,
    #[arg(long, help = "Load, print and export once, then exit")]
    pub batch: bool,
    #[arg(long, default_value = "All", help = "License status or All")]
    pub status: String,
    #[arg(long, default_value = "All", help = "Brand or All")]
    pub brand: String,
    #[arg(long, default_value = "All", help = "Observation tag or All")]
    pub observation: String,
    #[arg(long, help = "Inclusive mileage limit (default: fleet maximum)")]
    pub max_mileage: Option<u64>,
}

impl Cli {
    /// Flags win over the config file.
    pub fn apply_to(&self, cfg: &mut AppConfig) {
        if let Some(p) = &self.data {
            cfg.data_path = p.clone();
        }
        if let Some(p) = &self.output_dir {
            cfg.output_dir = p.clone();
        }
        if let Some(d) = self.reference_date {
            cfg.reference_date = Some(d);
        }
        if let Some(l) = &self.log_level {
            cfg.log_level = l.clone();
        }
    }

    /// Filter requested on the command line. Without flags this is the
    /// context's default filter.
    pub fn filter(&self, ctx: &FleetContext) -> Result<FilterSpec> {
        Ok(FilterSpec {
            status: Selection::parse_with(&self.status, |s| s.parse::<LicenseStatus>())?,
            brand: Selection::parse_with(&self.brand, |s| Ok(s.to_string()))?,
            observation: Selection::parse_with(&self.observation, |s| Ok(s.to_string()))?,
            max_mileage: self.max_mileage.unwrap_or_else(|| ctx.max_mileage()),
        })
    }
}
