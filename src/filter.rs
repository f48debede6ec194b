// Filter engine: strict conjunction of the three category selections plus an
// optional map drill-down on a single state.
use crate::geo;
use crate::types::OrderRecord;
use std::collections::BTreeSet;

/// The session's active filter. For each categorical clause, `None` means the
/// dataset has no such column and the clause does not apply; `Some(set)`
/// means the clause is active and only listed values pass — an empty set
/// passes nothing, it does not mean "all".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSelection {
    pub regions: Option<BTreeSet<String>>,
    pub categories: Option<BTreeSet<String>>,
    pub sub_categories: Option<BTreeSet<String>>,
    /// Full state name, set only via a resolved map click.
    pub drilldown_state: Option<String>,
}

impl FilterSelection {
    /// Initial selection for a freshly loaded dataset: every distinct value
    /// selected, no drill-down.
    pub fn for_dataset(records: &[OrderRecord]) -> FilterSelection {
        FilterSelection {
            regions: distinct(records, |r| r.region.as_deref()),
            categories: distinct(records, |r| r.category.as_deref()),
            sub_categories: distinct(records, |r| r.sub_category.as_deref()),
            drilldown_state: None,
        }
    }

    /// Resolve a clicked map label (abbreviation or full name) and store the
    /// full state name. An unknown label is a no-op: prior drill-down state
    /// is retained and `false` is returned.
    pub fn drill_down(&mut self, label: &str) -> bool {
        match geo::name_for(label) {
            Some(name) => {
                self.drilldown_state = Some(name.to_string());
                true
            }
            None => false,
        }
    }

    /// Reset clears the drill-down only; the three category selections are
    /// deliberately untouched.
    pub fn reset(&mut self) {
        self.drilldown_state = None;
    }
}

fn distinct<F>(records: &[OrderRecord], get: F) -> Option<BTreeSet<String>>
where
    F: Fn(&OrderRecord) -> Option<&str>,
{
    let set: BTreeSet<String> = records
        .iter()
        .filter_map(|r| get(r).map(|v| v.to_string()))
        .collect();
    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}

fn in_set(value: &Option<String>, set: &Option<BTreeSet<String>>) -> bool {
    match set {
        None => true,
        Some(s) => value.as_ref().is_some_and(|v| s.contains(v)),
    }
}

/// Apply the selection. A row survives only if it passes every active clause;
/// the drill-down, when set, narrows further as an additional AND.
pub fn apply(records: &[OrderRecord], sel: &FilterSelection) -> Vec<OrderRecord> {
    records
        .iter()
        .filter(|r| {
            in_set(&r.region, &sel.regions)
                && in_set(&r.category, &sel.categories)
                && in_set(&r.sub_category, &sel.sub_categories)
                && match &sel.drilldown_state {
                    None => true,
                    Some(state) => r.state.as_deref() == Some(state.as_str()),
                }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(region: &str, category: &str, sub: &str, state: &str) -> OrderRecord {
        OrderRecord {
            row: 0,
            region: Some(region.to_string()),
            category: Some(category.to_string()),
            sub_category: Some(sub.to_string()),
            state: Some(state.to_string()),
            customer_name: None,
            product_name: None,
            order_id: None,
            order_date: None,
            ship_date: None,
            sales: None,
            profit: None,
            discount: None,
            postal_code: 0,
        }
    }

    fn sample() -> Vec<OrderRecord> {
        vec![
            record("East", "Furniture", "Chairs", "New York"),
            record("East", "Technology", "Phones", "New York"),
            record("West", "Furniture", "Tables", "California"),
            record("West", "Technology", "Phones", "California"),
        ]
    }

    #[test]
    fn initial_selection_keeps_everything() {
        let data = sample();
        let sel = FilterSelection::for_dataset(&data);
        let out = apply(&data, &sel);
        assert_eq!(out, data);
    }

    #[test]
    fn clauses_are_conjunctive() {
        let data = sample();
        let mut sel = FilterSelection::for_dataset(&data);
        sel.regions = Some(["West".to_string()].into());
        sel.categories = Some(["Technology".to_string()].into());
        let out = apply(&data, &sel);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].region.as_deref(), Some("West"));
        assert_eq!(out[0].category.as_deref(), Some("Technology"));
        // Every survivor is a row of the input.
        assert!(out.iter().all(|r| data.contains(r)));
    }

    #[test]
    fn empty_set_yields_empty_not_all() {
        let data = sample();
        let mut sel = FilterSelection::for_dataset(&data);
        sel.regions = Some(BTreeSet::new());
        assert!(apply(&data, &sel).is_empty());
    }

    #[test]
    fn absent_column_disables_its_clause() {
        let mut data = sample();
        for r in &mut data {
            r.region = None;
        }
        let sel = FilterSelection::for_dataset(&data);
        assert_eq!(sel.regions, None);
        assert_eq!(apply(&data, &sel).len(), 4);
    }

    #[test]
    fn drill_down_layers_on_top_of_category_filters() {
        let data = sample();
        let mut sel = FilterSelection::for_dataset(&data);
        assert!(sel.drill_down("CA"));
        assert_eq!(sel.drilldown_state.as_deref(), Some("California"));
        let out = apply(&data, &sel);
        assert_eq!(out.len(), 2);
        assert!(out
            .iter()
            .all(|r| r.state.as_deref() == Some("California")));
    }

    #[test]
    fn unresolved_click_is_ignored() {
        let data = sample();
        let mut sel = FilterSelection::for_dataset(&data);
        assert!(sel.drill_down("NY"));
        assert!(!sel.drill_down("not a state"));
        // Prior drill-down is retained.
        assert_eq!(sel.drilldown_state.as_deref(), Some("New York"));
    }

    #[test]
    fn reset_clears_drilldown_only() {
        let data = sample();
        let mut sel = FilterSelection::for_dataset(&data);
        sel.regions = Some(["West".to_string()].into());
        sel.drill_down("California");
        sel.reset();
        assert_eq!(sel.drilldown_state, None);
        assert_eq!(sel.regions, Some(["West".to_string()].into()));
    }

    #[test]
    fn null_cell_fails_an_active_clause() {
        let mut data = sample();
        data[0].region = None;
        let sel = FilterSelection::for_dataset(&data);
        // Region clause is active (other rows carry values), so the null row drops.
        let out = apply(&data, &sel);
        assert_eq!(out.len(), 3);
    }
}
