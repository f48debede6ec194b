// The fixed aggregation battery. Every function reads the filtered records
// and nothing else; results are recomputed in full on each interaction and
// never cached. Groupings use `BTreeMap` so output order is key-sorted and
// identical across runs.
use crate::geo;
use crate::types::{
    CategoryProfitRow, DiscountBucketRow, Kpis, MonthlySalesRow, OrderRecord, RankedSalesRow,
    RegionSalesRow, StateSalesRow, SubCategorySalesRow,
};
use crate::util::{mean, median, sample_std};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

const TOP_N: usize = 5;

/// Discount bins: five fixed half-open ranges, upper edge exclusive except
/// for the last bin which is closed at 1.0. A discount of exactly 0.1 falls
/// in the second bin.
const DISCOUNT_BINS: &[(f64, f64, &str)] = &[
    (0.0, 0.1, "[0.0, 0.1)"),
    (0.1, 0.2, "[0.1, 0.2)"),
    (0.2, 0.3, "[0.2, 0.3)"),
    (0.3, 0.4, "[0.3, 0.4)"),
    (0.4, 1.0, "[0.4, 1.0]"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct AggregationSet {
    pub kpis: Kpis,
    pub top_customers: Vec<RankedSalesRow>,
    pub top_products: Vec<RankedSalesRow>,
    pub sales_by_region: Vec<RegionSalesRow>,
    pub profit_by_category: Vec<CategoryProfitRow>,
    pub sales_by_sub_category: Vec<SubCategorySalesRow>,
    pub monthly_sales: Vec<MonthlySalesRow>,
    pub discount_profit: Vec<DiscountBucketRow>,
    pub sales_by_state: Vec<StateSalesRow>,
}

pub fn compute(records: &[OrderRecord]) -> AggregationSet {
    AggregationSet {
        kpis: kpis(records),
        top_customers: top_sales_by(records, |r| r.customer_name.as_deref()),
        top_products: top_sales_by(records, |r| r.product_name.as_deref()),
        sales_by_region: sales_by_region(records),
        profit_by_category: profit_by_category(records),
        sales_by_sub_category: sales_by_sub_category(records),
        monthly_sales: monthly_sales(records),
        discount_profit: discount_profit(records),
        sales_by_state: sales_by_state(records),
    }
}

pub fn kpis(records: &[OrderRecord]) -> Kpis {
    let total_sales: f64 = records.iter().filter_map(|r| r.sales).sum();
    let total_profit: f64 = records.iter().filter_map(|r| r.profit).sum();
    let orders: HashSet<&str> = records.iter().filter_map(|r| r.order_id.as_deref()).collect();
    // Margin is a percentage; zero sales means zero margin, never NaN/Inf.
    let profit_margin = if total_sales == 0.0 {
        0.0
    } else {
        total_profit / total_sales * 100.0
    };
    Kpis {
        total_sales,
        total_profit,
        total_orders: orders.len(),
        profit_margin,
    }
}

/// Group by an entity name, sum Sales, and keep the five largest. Ties keep
/// the grouping's key order; beyond "stable within a run" the tie order is
/// an accepted ambiguity.
pub fn top_sales_by<F>(records: &[OrderRecord], entity: F) -> Vec<RankedSalesRow>
where
    F: Fn(&OrderRecord) -> Option<&str>,
{
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for r in records {
        if let Some(name) = entity(r) {
            *sums.entry(name.to_string()).or_insert(0.0) += r.sales.unwrap_or(0.0);
        }
    }
    let mut ranked: Vec<(String, f64)> = sums.into_iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked
        .into_iter()
        .take(TOP_N)
        .enumerate()
        .map(|(i, (name, sales))| RankedSalesRow {
            rank: i + 1,
            name,
            sales,
        })
        .collect()
}

pub fn sales_by_region(records: &[OrderRecord]) -> Vec<RegionSalesRow> {
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for r in records {
        if let Some(region) = &r.region {
            *sums.entry(region.clone()).or_insert(0.0) += r.sales.unwrap_or(0.0);
        }
    }
    sums.into_iter()
        .map(|(region, sales)| RegionSalesRow { region, sales })
        .collect()
}

pub fn profit_by_category(records: &[OrderRecord]) -> Vec<CategoryProfitRow> {
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for r in records {
        if let Some(category) = &r.category {
            *sums.entry(category.clone()).or_insert(0.0) += r.profit.unwrap_or(0.0);
        }
    }
    sums.into_iter()
        .map(|(category, profit)| CategoryProfitRow { category, profit })
        .collect()
}

pub fn sales_by_sub_category(records: &[OrderRecord]) -> Vec<SubCategorySalesRow> {
    let mut sums: BTreeMap<(String, String), f64> = BTreeMap::new();
    for r in records {
        if let (Some(category), Some(sub)) = (&r.category, &r.sub_category) {
            *sums.entry((category.clone(), sub.clone())).or_insert(0.0) +=
                r.sales.unwrap_or(0.0);
        }
    }
    sums.into_iter()
        .map(|((category, sub_category), sales)| SubCategorySalesRow {
            category,
            sub_category,
            sales,
        })
        .collect()
}

/// Sales per calendar month of Order Date. Rows with a null date are
/// excluded; months with no orders are simply absent, not zero-filled.
pub fn monthly_sales(records: &[OrderRecord]) -> Vec<MonthlySalesRow> {
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for r in records {
        if let Some(date) = r.order_date {
            let month = date.format("%Y-%m").to_string();
            *sums.entry(month).or_insert(0.0) += r.sales.unwrap_or(0.0);
        }
    }
    sums.into_iter()
        .map(|(month, sales)| MonthlySalesRow { month, sales })
        .collect()
}

fn bin_index(discount: f64) -> Option<usize> {
    // Out-of-range discounts are not bucketed; the rows still count
    // everywhere else.
    DISCOUNT_BINS.iter().position(|(lo, hi, _)| {
        if *hi == 1.0 {
            discount >= *lo && discount <= *hi
        } else {
            discount >= *lo && discount < *hi
        }
    })
}

/// Profit statistics per discount bin. Std is the sample deviation (n-1);
/// buckets with fewer than two rows report 0. When no row carries a usable
/// discount the table is empty; otherwise all five bins appear, empty ones
/// with zeroed statistics.
pub fn discount_profit(records: &[OrderRecord]) -> Vec<DiscountBucketRow> {
    let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); DISCOUNT_BINS.len()];
    let mut any = false;
    for r in records {
        let Some(discount) = r.discount else { continue };
        let Some(idx) = bin_index(discount) else { continue };
        any = true;
        if let Some(profit) = r.profit {
            buckets[idx].push(profit);
        }
    }
    if !any {
        return Vec::new();
    }
    DISCOUNT_BINS
        .iter()
        .zip(buckets)
        .map(|((_, _, label), profits)| {
            let (min, max) = if profits.is_empty() {
                (0.0, 0.0)
            } else {
                profits.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
                    (lo.min(*p), hi.max(*p))
                })
            };
            DiscountBucketRow {
                bucket: label.to_string(),
                count: profits.len(),
                mean: mean(&profits),
                median: median(profits.clone()),
                std: sample_std(&profits),
                min,
                max,
            }
        })
        .collect()
}

/// Sales per state, joined against the abbreviation table. States with no
/// mapping are dropped here only; they still count in every other
/// aggregation.
pub fn sales_by_state(records: &[OrderRecord]) -> Vec<StateSalesRow> {
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for r in records {
        if let Some(state) = &r.state {
            *sums.entry(state.clone()).or_insert(0.0) += r.sales.unwrap_or(0.0);
        }
    }
    sums.into_iter()
        .filter_map(|(state, sales)| {
            let abbr = geo::abbr_for(&state)?;
            let (lat, lon) = geo::label_coords(abbr)?;
            Some(StateSalesRow {
                state,
                abbr: abbr.to_string(),
                lat,
                lon,
                sales,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(region: &str, sales: f64, profit: f64) -> OrderRecord {
        OrderRecord {
            row: 0,
            region: Some(region.to_string()),
            category: None,
            sub_category: None,
            state: None,
            customer_name: None,
            product_name: None,
            order_id: None,
            order_date: None,
            ship_date: None,
            sales: Some(sales),
            profit: Some(profit),
            discount: None,
            postal_code: 0,
        }
    }

    #[test]
    fn kpis_match_worked_example() {
        let data = vec![
            record("East", 100.0, 10.0),
            record("East", 50.0, -5.0),
            record("West", 200.0, 40.0),
        ];
        let k = kpis(&data);
        assert_eq!(k.total_sales, 350.0);
        assert_eq!(k.total_profit, 45.0);
        assert!((k.profit_margin - 45.0 / 350.0 * 100.0).abs() < 1e-12);

        let regions = sales_by_region(&data);
        assert_eq!(
            regions,
            vec![
                RegionSalesRow { region: "East".into(), sales: 150.0 },
                RegionSalesRow { region: "West".into(), sales: 200.0 },
            ]
        );
    }

    #[test]
    fn margin_is_zero_on_zero_sales() {
        assert_eq!(kpis(&[]).profit_margin, 0.0);
        let data = vec![record("East", 0.0, 10.0)];
        assert_eq!(kpis(&data).profit_margin, 0.0);
    }

    #[test]
    fn total_sales_equals_region_sum() {
        let data = vec![
            record("East", 100.0, 10.0),
            record("West", 200.0, 40.0),
            record("South", 33.5, 1.0),
        ];
        let k = kpis(&data);
        let regions = sales_by_region(&data);
        let sum: f64 = regions.iter().map(|r| r.sales).sum();
        assert_eq!(k.total_sales, sum);
    }

    #[test]
    fn distinct_order_count() {
        let mut a = record("East", 10.0, 1.0);
        a.order_id = Some("A-1".into());
        let mut b = record("East", 20.0, 2.0);
        b.order_id = Some("A-1".into());
        let mut c = record("West", 30.0, 3.0);
        c.order_id = Some("B-2".into());
        assert_eq!(kpis(&[a, b, c]).total_orders, 2);
    }

    #[test]
    fn top_n_is_capped_and_descending() {
        let mut data = Vec::new();
        for (name, sales) in [
            ("Ann", 10.0),
            ("Bob", 60.0),
            ("Cy", 30.0),
            ("Dee", 50.0),
            ("Ed", 20.0),
            ("Flo", 40.0),
        ] {
            let mut r = record("East", sales, 0.0);
            r.customer_name = Some(name.to_string());
            data.push(r);
        }
        let top = top_sales_by(&data, |r| r.customer_name.as_deref());
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].name, "Bob");
        assert_eq!(top[0].rank, 1);
        assert!(top.windows(2).all(|w| w[0].sales >= w[1].sales));
        // "Ann" is the smallest and falls off.
        assert!(top.iter().all(|r| r.name != "Ann"));
    }

    #[test]
    fn monthly_series_skips_null_dates_and_gap_months() {
        let mut jan = record("East", 100.0, 0.0);
        jan.order_date = NaiveDate::from_ymd_opt(2015, 1, 10);
        let mut jan2 = record("East", 50.0, 0.0);
        jan2.order_date = NaiveDate::from_ymd_opt(2015, 1, 20);
        let mut mar = record("East", 70.0, 0.0);
        mar.order_date = NaiveDate::from_ymd_opt(2015, 3, 1);
        let undated = record("East", 999.0, 0.0);

        let series = monthly_sales(&[jan, jan2, mar, undated]);
        assert_eq!(
            series,
            vec![
                MonthlySalesRow { month: "2015-01".into(), sales: 150.0 },
                MonthlySalesRow { month: "2015-03".into(), sales: 70.0 },
            ]
        );
    }

    #[test]
    fn discount_bin_boundaries() {
        assert_eq!(bin_index(0.0), Some(0));
        // Exactly 0.1 belongs to the second bin, not the first.
        assert_eq!(bin_index(0.1), Some(1));
        assert_eq!(bin_index(0.39999), Some(3));
        assert_eq!(bin_index(0.4), Some(4));
        assert_eq!(bin_index(1.0), Some(4));
        assert_eq!(bin_index(1.5), None);
        assert_eq!(bin_index(-0.1), None);
    }

    #[test]
    fn discount_stats_per_bucket() {
        let mut rows = Vec::new();
        for (discount, profit) in [(0.0, 10.0), (0.05, 20.0), (0.1, -5.0)] {
            let mut r = record("East", 0.0, profit);
            r.discount = Some(discount);
            rows.push(r);
        }
        let table = discount_profit(&rows);
        assert_eq!(table.len(), 5);
        let first = &table[0];
        assert_eq!(first.count, 2);
        assert_eq!(first.mean, 15.0);
        assert_eq!(first.median, 15.0);
        assert_eq!(first.min, 10.0);
        assert_eq!(first.max, 20.0);
        let second = &table[1];
        assert_eq!(second.count, 1);
        assert_eq!(second.std, 0.0);
        // Untouched buckets are present with zeroed stats.
        assert_eq!(table[4].count, 0);
        assert_eq!(table[4].min, 0.0);
    }

    #[test]
    fn unmapped_states_drop_from_map_only() {
        let mut ca = record("West", 100.0, 0.0);
        ca.state = Some("California".into());
        let mut xx = record("West", 50.0, 0.0);
        xx.state = Some("Atlantis".into());
        let data = vec![ca, xx];

        let map = sales_by_state(&data);
        assert_eq!(map.len(), 1);
        assert_eq!(map[0].abbr, "CA");
        assert_eq!(map[0].sales, 100.0);
        // The unmapped row still counts in the KPIs.
        assert_eq!(kpis(&data).total_sales, 150.0);
    }

    #[test]
    fn empty_input_gives_zero_kpis_and_empty_tables() {
        let agg = compute(&[]);
        assert_eq!(agg.kpis, Kpis::default());
        assert!(agg.top_customers.is_empty());
        assert!(agg.sales_by_region.is_empty());
        assert!(agg.monthly_sales.is_empty());
        assert!(agg.discount_profit.is_empty());
        assert!(agg.sales_by_state.is_empty());
    }

    #[test]
    fn recompute_is_deterministic() {
        let mut data = Vec::new();
        for i in 0..20 {
            let mut r = record(if i % 2 == 0 { "East" } else { "West" }, i as f64, 1.0);
            r.customer_name = Some(format!("C{}", i % 7));
            r.state = Some("Texas".into());
            data.push(r);
        }
        assert_eq!(compute(&data), compute(&data));
    }
}
