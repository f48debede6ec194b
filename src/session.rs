// Session state and the Interaction Bridge boundary. Each user interaction
// becomes one `Event`; `update` is a pure transition and `run_pipeline` is
// one full synchronous recompute. Nothing here is a process-wide singleton:
// the state is owned by the caller and passed through every invocation.
use crate::aggregate::{self, AggregationSet};
use crate::filter::{self, FilterSelection};
use crate::types::OrderRecord;
use std::collections::BTreeSet;

/// The two plot modes the distribution chart can toggle between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotStyle {
    Box,
    Violin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub selection: FilterSelection,
    pub plot_style: PlotStyle,
}

impl SessionState {
    /// Fresh session for a newly loaded dataset: everything selected, no
    /// drill-down, box plot.
    pub fn new(records: &[OrderRecord]) -> SessionState {
        SessionState {
            selection: FilterSelection::for_dataset(records),
            plot_style: PlotStyle::Box,
        }
    }
}

/// An interaction surfaced by the hosting layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SetRegions(BTreeSet<String>),
    SetCategories(BTreeSet<String>),
    SetSubCategories(BTreeSet<String>),
    /// A map click carrying the clicked label (abbreviation or full name).
    MapClick(String),
    ResetDrilldown,
    SetPlotStyle(PlotStyle),
}

/// Apply one event. A selection event for a column the dataset does not have
/// is a no-op, as is a map click that fails to resolve.
pub fn update(state: &SessionState, event: &Event) -> SessionState {
    let mut next = state.clone();
    match event {
        Event::SetRegions(values) => {
            if next.selection.regions.is_some() {
                next.selection.regions = Some(values.clone());
            }
        }
        Event::SetCategories(values) => {
            if next.selection.categories.is_some() {
                next.selection.categories = Some(values.clone());
            }
        }
        Event::SetSubCategories(values) => {
            if next.selection.sub_categories.is_some() {
                next.selection.sub_categories = Some(values.clone());
            }
        }
        Event::MapClick(label) => {
            next.selection.drill_down(label);
        }
        Event::ResetDrilldown => next.selection.reset(),
        Event::SetPlotStyle(style) => next.plot_style = *style,
    }
    next
}

/// One full recompute: filter, then the whole aggregation battery. Pure with
/// respect to the inputs; callers rerun it after every event.
pub fn run_pipeline(
    records: &[OrderRecord],
    selection: &FilterSelection,
) -> (Vec<OrderRecord>, AggregationSet) {
    let filtered = filter::apply(records, selection);
    let aggregations = aggregate::compute(&filtered);
    (filtered, aggregations)
}
