// Entry point and console flow.
//
// The binary stands in for the dashboard's presentation layer: a menu loop
// where every choice is one interaction event, and each event triggers one
// full synchronous pipeline re-run (filter -> aggregate -> render).
mod aggregate;
mod clean;
mod filter;
mod geo;
mod loader;
mod output;
mod session;
mod types;
mod util;

use clean::CleanReport;
use filter::FilterSelection;
use loader::SourceKind;
use session::{Event, PlotStyle, SessionState};
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use types::{OrderRecord, RawTable};

const DEFAULT_DATASET: &str = "Global_Superstore2.csv";

/// Everything derived from one load. The session keeps no other state
/// between interactions; aggregations are recomputed from scratch each time.
struct Dataset {
    table: RawTable,
    records: Vec<OrderRecord>,
    /// All-selected filter for the loaded data, kept as the option lists
    /// shown when editing a filter.
    full_selection: FilterSelection,
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    prompt("Enter choice: ")
}

fn prompt(message: &str) -> String {
    print!("{}", message);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Handle loading: an explicitly supplied path wins over the bundled default;
/// with neither available the session stays empty and nothing renders.
fn handle_load() -> Option<(Dataset, SessionState)> {
    let answer = prompt("Dataset path (blank for bundled default): ");
    let uploaded: Option<PathBuf> = if answer.is_empty() {
        None
    } else {
        Some(PathBuf::from(answer))
    };

    let outcome = match loader::load(uploaded.as_deref(), Path::new(DEFAULT_DATASET)) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Failed to load dataset: {}\n", e);
            return None;
        }
    };
    match outcome.source {
        SourceKind::Default => println!("Using default dataset: {}", DEFAULT_DATASET),
        SourceKind::Uploaded => println!("Loaded uploaded dataset."),
    }

    let mut table = outcome.table;
    let report: CleanReport = clean::clean(&mut table);
    println!(
        "Processing dataset... ({} rows loaded, {} after cleaning, {} duplicates removed)",
        util::format_int(report.rows_in as i64),
        util::format_int(report.rows_out as i64),
        util::format_int(report.duplicates_removed as i64)
    );
    if report.dates_nulled > 0 {
        println!(
            "Note: {} unparseable date cells set to null.",
            util::format_int(report.dates_nulled as i64)
        );
    }
    println!();

    let records = clean::to_records(&table);
    let session = SessionState::new(&records);
    let full_selection = session.selection.clone();
    Some((
        Dataset {
            table,
            records,
            full_selection,
        },
        session,
    ))
}

fn handle_dashboard(data: &Dataset, state: &SessionState) {
    let (filtered, agg) = session::run_pipeline(&data.records, &state.selection);
    println!(
        "Showing {} of {} rows.",
        util::format_int(filtered.len() as i64),
        util::format_int(data.records.len() as i64)
    );
    if let Some(state_name) = &state.selection.drilldown_state {
        println!("Drill-down active: {}", state_name);
    }
    println!();

    println!(
        "KPIs: Total Sales ${}  |  Total Profit ${}  |  Orders {}  |  Margin {}%\n",
        util::format_number(agg.kpis.total_sales, 2),
        util::format_number(agg.kpis.total_profit, 2),
        util::format_int(agg.kpis.total_orders as i64),
        util::format_number(agg.kpis.profit_margin, 2)
    );

    output::preview_table("Top 5 Customers by Sales", &agg.top_customers, 5);
    output::preview_table("Top 5 Products by Sales", &agg.top_products, 5);
    output::preview_table("Sales by Region", &agg.sales_by_region, 10);
    output::preview_table("Profit by Category", &agg.profit_by_category, 10);
    output::preview_table(
        "Sales by Sub-Category",
        &agg.sales_by_sub_category,
        20,
    );
    output::preview_table("Monthly Sales", &agg.monthly_sales, 12);
    let style = match state.plot_style {
        PlotStyle::Box => "box",
        PlotStyle::Violin => "violin",
    };
    output::preview_table(
        &format!("Profit by Discount Bucket ({} plot)", style),
        &agg.discount_profit,
        5,
    );
    output::preview_table("Sales by State (map)", &agg.sales_by_state, 10);
}

/// Prompt for a comma-separated subset of the available values. Blank keeps
/// the current selection; `*` selects everything.
fn prompt_value_set(label: &str, available: &BTreeSet<String>) -> Option<BTreeSet<String>> {
    println!(
        "Available {}: {}",
        label,
        available.iter().cloned().collect::<Vec<_>>().join(", ")
    );
    let answer = prompt("Select values (comma-separated, * for all, blank to keep): ");
    if answer.is_empty() {
        return None;
    }
    if answer == "*" {
        return Some(available.clone());
    }
    Some(
        answer
            .split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect(),
    )
}

fn handle_filter_edit(data: &Dataset, state: &SessionState, which: usize) -> SessionState {
    let (label, options) = match which {
        0 => ("regions", &data.full_selection.regions),
        1 => ("categories", &data.full_selection.categories),
        _ => ("sub-categories", &data.full_selection.sub_categories),
    };
    let Some(options) = options else {
        println!("That column is not present in this dataset.\n");
        return state.clone();
    };
    let Some(values) = prompt_value_set(label, options) else {
        return state.clone();
    };
    let event = match which {
        0 => Event::SetRegions(values),
        1 => Event::SetCategories(values),
        _ => Event::SetSubCategories(values),
    };
    session::update(state, &event)
}

fn handle_export(data: &Dataset, state: &SessionState) {
    let (filtered, agg) = session::run_pipeline(&data.records, &state.selection);
    match output::export_filtered(&data.table, &filtered, Path::new(".")) {
        Ok(path) => println!("Filtered dataset written to {}", path.display()),
        Err(e) => eprintln!("Write error: {}", e),
    }
    if let Err(e) = output::write_json(Path::new("summary.json"), &agg.kpis) {
        eprintln!("Write error: {}", e);
    } else {
        println!("KPI summary written to summary.json\n");
    }
}

fn main() {
    // Session state lives here, in locals: one dataset and one filter
    // selection, passed explicitly through every update.
    let mut loaded: Option<(Dataset, SessionState)> = None;

    loop {
        println!("Superstore Dashboard");
        println!("[1] Load dataset");
        println!("[2] Show dashboard");
        println!("[3] Filter regions");
        println!("[4] Filter categories");
        println!("[5] Filter sub-categories");
        println!("[6] Map click (drill down by state)");
        println!("[7] Reset drill-down");
        println!("[8] Toggle box/violin plot");
        println!("[9] Export filtered CSV");
        println!("[0] Exit\n");

        let choice = read_choice();
        if choice == "1" {
            loaded = handle_load();
            continue;
        }
        if choice == "0" {
            println!("Exiting.");
            break;
        }

        let Some((data, state)) = loaded.as_mut() else {
            println!("Error: No dataset loaded. Please load one first (option 1).\n");
            continue;
        };

        match choice.as_str() {
            "2" => handle_dashboard(data, state),
            "3" | "4" | "5" => {
                let which = choice.parse::<usize>().unwrap_or(3) - 3;
                *state = handle_filter_edit(data, state, which);
            }
            "6" => {
                let label = prompt("Clicked state (abbreviation or name): ");
                let next = session::update(state, &Event::MapClick(label.clone()));
                if next.selection.drilldown_state == state.selection.drilldown_state
                    && geo::name_for(&label).is_none()
                {
                    println!("Unknown state '{}'; click ignored.\n", label);
                }
                *state = next;
            }
            "7" => {
                *state = session::update(state, &Event::ResetDrilldown);
                println!("Drill-down cleared; category filters kept.\n");
            }
            "8" => {
                let style = match state.plot_style {
                    PlotStyle::Box => PlotStyle::Violin,
                    PlotStyle::Violin => PlotStyle::Box,
                };
                *state = session::update(state, &Event::SetPlotStyle(style));
                println!("Plot style set to {:?}.\n", state.plot_style);
            }
            "9" => handle_export(data, state),
            _ => println!("Invalid choice.\n"),
        }
    }
}
