//! Fleet license and cost reporting.
//!
//! Reads a fleet spreadsheet export, normalizes it once against a fixed
//! reference time, and builds dashboard views (filtered table, status and
//! cost charts, alert table, summary cards) for each filter change.

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod loader;
pub mod normalizer;
pub mod output;
pub mod status;
pub mod types;
pub mod util;

pub use config::AppConfig;
pub use context::FleetContext;
pub use engine::apply;
pub use error::{FleetError, Result};
pub use normalizer::normalize;
pub use status::LicenseStatus;
pub use types::{DashboardView, FilterSpec, MeanCost, RawRow, Selection, VehicleRecord};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the global tracing subscriber. Logs go to stderr so console
/// tables on stdout stay readable. Unknown levels fall back to `info`.
pub fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
