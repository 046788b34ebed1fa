// Entry point and high-level CLI flow.
//
// - Option [1] loads and normalizes the fleet CSV, then shows the dashboard
//   for the initial filter.
// - Option [2] changes the filter; every change recomputes the dashboard.
// - Option [3] exports the current view as CSV/JSON.
// - `--batch` does load, render and export once without the menu.
mod cli;

use chrono::{Local, NaiveDateTime, NaiveTime};
use clap::Parser;
use cli::Cli;
use fleet_report::util::format_int;
use fleet_report::{
    init_logging, output, AppConfig, FilterSpec, FleetContext, LicenseStatus, Result, Selection,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

/// Everything one run of the program owns: settings, the normalized fleet
/// and the active filter.
struct Session {
    config: AppConfig,
    context: Option<FleetContext>,
    filter: Option<FilterSpec>,
}

impl Session {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            context: None,
            filter: None,
        }
    }

    /// "Now" for a normalization pass: the configured date at midnight, or
    /// the wall clock. Read once per load.
    fn reference_time(&self) -> NaiveDateTime {
        match self.config.reference_date {
            Some(d) => d.and_time(NaiveTime::default()),
            None => Local::now().naive_local(),
        }
    }

    /// Load and normalize the fleet. Does not render; the caller follows up
    /// with [`Session::set_filter`].
    fn load(&mut self) -> Result<&FleetContext> {
        let ctx = FleetContext::load(&self.config.data_path, self.reference_time())?;
        println!(
            "Processing dataset... ({} vehicles loaded, {} without a license date)\n",
            format_int(ctx.report().total_rows),
            format_int(ctx.report().unknown_expirations)
        );
        self.filter = None;
        Ok(self.context.insert(ctx))
    }

    /// The single recompute trigger: store the filter and redraw.
    fn set_filter(&mut self, filter: FilterSpec) {
        if let Some(ctx) = &self.context {
            let view = ctx.view(&filter);
            output::render_dashboard(&view, &self.config.currency_symbol, self.config.preview_rows);
        }
        self.filter = Some(filter);
    }

    fn export(&self) -> Result<Option<Vec<PathBuf>>> {
        match (&self.context, &self.filter) {
            (Some(ctx), Some(filter)) => {
                let view = ctx.view(filter);
                output::export_dashboard(&view, &self.config.output_dir).map(Some)
            }
            _ => Ok(None),
        }
    }
}

/// Read a single line of input after printing `prompt`.
///
/// `None` at end of input or on a read error, so callers can stop asking.
fn read_line<R: BufRead>(input: &mut R, prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) => None,
        Ok(_) => Some(buf.trim().to_string()),
        Err(e) => {
            warn!("Could not read input: {}", e);
            None
        }
    }
}

fn handle_load(session: &mut Session, cli: &Cli) {
    let filter = match session.load() {
        Ok(ctx) => cli.filter(ctx),
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
            return;
        }
    };
    match filter {
        Ok(f) => session.set_filter(f),
        Err(e) => {
            eprintln!("{}; showing all vehicles\n", e);
            if let Some(f) = session.context.as_ref().map(FleetContext::default_filter) {
                session.set_filter(f);
            }
        }
    }
}

/// Ask for each filter field; a blank answer keeps the current value.
/// `None` if input ends before every field was asked.
fn prompt_filter<R: BufRead>(input: &mut R, current: &FilterSpec) -> Option<FilterSpec> {
    let mut next = current.clone();

    let answer = read_line(input, "Status: ")?;
    if !answer.is_empty() {
        match Selection::parse_with(&answer, |s| s.parse::<LicenseStatus>()) {
            Ok(s) => next.status = s,
            Err(e) => warn!("Keeping status filter: {}", e),
        }
    }
    let answer = read_line(input, "Brand: ")?;
    if !answer.is_empty() {
        match Selection::parse_with(&answer, |s| Ok(s.to_string())) {
            Ok(s) => next.brand = s,
            Err(e) => warn!("Keeping brand filter: {}", e),
        }
    }
    let answer = read_line(input, "Observation: ")?;
    if !answer.is_empty() {
        match Selection::parse_with(&answer, |s| Ok(s.to_string())) {
            Ok(s) => next.observation = s,
            Err(e) => warn!("Keeping observation filter: {}", e),
        }
    }
    let answer = read_line(input, "Max mileage: ")?;
    if !answer.is_empty() {
        match fleet_report::util::parse_mileage(Some(&answer)) {
            Some(km) => next.max_mileage = km,
            None => warn!("Keeping mileage filter: {:?} is not a mileage", answer),
        }
    }
    Some(next)
}

fn handle_change_filters<R: BufRead>(session: &mut Session, input: &mut R) {
    let (Some(ctx), Some(current)) = (&session.context, &session.filter) else {
        println!("Error: No data loaded. Please load the fleet file first (option 1).\n");
        return;
    };
    output::render_filter_options(&ctx.filter_options());
    let Some(next) = prompt_filter(input, current) else {
        println!("\nInput closed; filters unchanged.\n");
        return;
    };
    println!();
    session.set_filter(next);
}

fn handle_export(session: &Session) {
    match session.export() {
        Ok(Some(files)) => {
            for f in files {
                println!("Saved {}", f.display());
            }
            println!();
        }
        Ok(None) => println!("Error: No data loaded. Please load the fleet file first (option 1).\n"),
        Err(e) => eprintln!("Write error: {}\n", e),
    }
}

fn run_batch(session: &mut Session, cli: &Cli) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let filter = cli.filter(session.load()?)?;
    session.set_filter(filter);
    if let Some(files) = session.export()? {
        info!("Wrote {} files", files.len());
    }
    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    init_logging(&config.log_level);
    info!("fleet_report v{}", env!("CARGO_PKG_VERSION"));

    let mut session = Session::new(config);
    if cli.batch {
        return run_batch(&mut session, &cli);
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        println!("Fleet Management Dashboard");
        println!("[1] Load the fleet file");
        println!("[2] Change filters");
        println!("[3] Export dashboard");
        println!("[4] Exit\n");
        let Some(choice) = read_line(&mut input, "Enter choice: ") else {
            println!("\nExiting the program.");
            break;
        };
        match choice.as_str() {
            "1" => handle_load(&mut session, &cli),
            "2" => handle_change_filters(&mut session, &mut input),
            "3" => handle_export(&session),
            "4" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 1, 2, 3 or 4.\n"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn current() -> FilterSpec {
        FilterSpec {
            status: Selection::All,
            brand: Selection::All,
            observation: Selection::All,
            max_mileage: 100_000,
        }
    }

    #[test]
    fn test_read_line_stops_at_end_of_input() {
        let mut input = Cursor::new("2\n");
        assert_eq!(read_line(&mut input, "> ").as_deref(), Some("2"));
        assert_eq!(read_line(&mut input, "> "), None);
        assert_eq!(read_line(&mut Cursor::new(""), "> "), None);
    }

    #[test]
    fn test_read_line_keeps_blank_answers() {
        let mut input = Cursor::new("\n");
        assert_eq!(read_line(&mut input, "> ").as_deref(), Some(""));
    }

    #[test]
    fn test_prompt_filter_reads_every_field() {
        let mut input = Cursor::new("Critical\nToyota\n\n15.000 km\n");
        let next = prompt_filter(&mut input, &current()).unwrap();
        assert_eq!(next.status, Selection::Only(LicenseStatus::Critical));
        assert_eq!(next.brand, Selection::Only("Toyota".to_string()));
        assert_eq!(next.observation, Selection::All);
        assert_eq!(next.max_mileage, 15_000);
    }

    #[test]
    fn test_prompt_filter_keeps_values_on_bad_answers() {
        let mut input = Cursor::new("soon\nAll\nTodas\nfar\n");
        let next = prompt_filter(&mut input, &current()).unwrap();
        assert_eq!(next, current());
    }

    #[test]
    fn test_prompt_filter_gives_up_when_input_ends() {
        let mut input = Cursor::new("Warning\n");
        assert_eq!(prompt_filter(&mut input, &current()), None);
        assert_eq!(prompt_filter(&mut Cursor::new(""), &current()), None);
    }
}
