use chrono::NaiveDate;
use serde::Serialize;
use tabled::Tabled;

/// Header names the core understands. Files may carry any number of extra
/// columns; those are preserved through cleaning and export but never read.
pub mod col {
    pub const REGION: &str = "Region";
    pub const CATEGORY: &str = "Category";
    pub const SUB_CATEGORY: &str = "Sub-Category";
    pub const STATE: &str = "State";
    pub const CUSTOMER_NAME: &str = "Customer Name";
    pub const PRODUCT_NAME: &str = "Product Name";
    pub const ORDER_ID: &str = "Order ID";
    pub const ORDER_DATE: &str = "Order Date";
    pub const SHIP_DATE: &str = "Ship Date";
    pub const SALES: &str = "Sales";
    pub const PROFIT: &str = "Profit";
    pub const DISCOUNT: &str = "Discount";
    pub const POSTAL_CODE: &str = "Postal Code";
}

/// A loaded file as-is: one header row plus string cells, before any typing.
/// Every row is padded (or truncated) to the header width by the loader, so
/// indexing by column is always in bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }
}

/// One typed order row. Core fields are `Option` so a dataset missing a
/// column (or a single empty cell) degrades the dependent features instead
/// of failing the whole pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    /// Index of the backing row in the cleaned `RawTable`, used to
    /// re-serialize the filtered dataset with all original columns.
    pub row: usize,
    pub region: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub state: Option<String>,
    pub customer_name: Option<String>,
    pub product_name: Option<String>,
    pub order_id: Option<String>,
    pub order_date: Option<NaiveDate>,
    pub ship_date: Option<NaiveDate>,
    pub sales: Option<f64>,
    pub profit: Option<f64>,
    pub discount: Option<f64>,
    pub postal_code: i64,
}

/// The four headline metrics. `profit_margin` is a percentage and is forced
/// to `0.0` whenever `total_sales` is zero so no NaN/Inf reaches display.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Kpis {
    pub total_sales: f64,
    pub total_profit: f64,
    pub total_orders: usize,
    pub profit_margin: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct RankedSalesRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Sales")]
    #[tabled(rename = "Sales")]
    pub sales: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct RegionSalesRow {
    #[serde(rename = "Region")]
    #[tabled(rename = "Region")]
    pub region: String,
    #[serde(rename = "Sales")]
    #[tabled(rename = "Sales")]
    pub sales: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CategoryProfitRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Profit")]
    #[tabled(rename = "Profit")]
    pub profit: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct SubCategorySalesRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "SubCategory")]
    #[tabled(rename = "SubCategory")]
    pub sub_category: String,
    #[serde(rename = "Sales")]
    #[tabled(rename = "Sales")]
    pub sales: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct MonthlySalesRow {
    /// Calendar month as `YYYY-MM`; months with no orders are absent.
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "Sales")]
    #[tabled(rename = "Sales")]
    pub sales: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct DiscountBucketRow {
    #[serde(rename = "Bucket")]
    #[tabled(rename = "Bucket")]
    pub bucket: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
    #[serde(rename = "MeanProfit")]
    #[tabled(rename = "MeanProfit")]
    pub mean: f64,
    #[serde(rename = "MedianProfit")]
    #[tabled(rename = "MedianProfit")]
    pub median: f64,
    #[serde(rename = "StdProfit")]
    #[tabled(rename = "StdProfit")]
    pub std: f64,
    #[serde(rename = "MinProfit")]
    #[tabled(rename = "MinProfit")]
    pub min: f64,
    #[serde(rename = "MaxProfit")]
    #[tabled(rename = "MaxProfit")]
    pub max: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct StateSalesRow {
    #[serde(rename = "State")]
    #[tabled(rename = "State")]
    pub state: String,
    #[serde(rename = "Abbr")]
    #[tabled(rename = "Abbr")]
    pub abbr: String,
    #[serde(rename = "Lat")]
    #[tabled(rename = "Lat")]
    pub lat: f64,
    #[serde(rename = "Lon")]
    #[tabled(rename = "Lon")]
    pub lon: f64,
    #[serde(rename = "Sales")]
    #[tabled(rename = "Sales")]
    pub sales: f64,
}
