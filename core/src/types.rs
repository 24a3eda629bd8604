//! Response shapes and per-endpoint query parameters for the admin API.
//!
//! # Design
//! The aggregate shapes (`TodayStats`, `ProjectSummary`) wrap the raw body
//! and expose typed accessors, so a slot holds exactly what the server sent.
//! Listing items and single entities are raw JSON (`Record`) too, since the
//! dashboard renders whatever the server sends.
//!
//! Query structs have only optional fields. Paging defaults (page 1, size 10)
//! are filled in by the builders, not here.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

/// One listing item or entity exactly as the server sent it.
pub type Record = Value;

pub const DEFAULT_PAGE_NUMBER: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Paginated listing response.
///
/// The pagination flags are whatever the server asserted; they are never
/// recomputed from `page_number` and `total_pages`. Missing or `null` fields
/// read as the defaults of an empty first page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub items: Vec<T>,
    #[serde(default = "first_page", deserialize_with = "null_as_first_page")]
    pub page_number: u32,
    #[serde(default = "first_page", deserialize_with = "null_as_first_page")]
    pub total_pages: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_previous_page: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_next_page: bool,
}

fn first_page() -> u32 {
    DEFAULT_PAGE_NUMBER
}

fn null_as_default<'de, D, V>(deserializer: D) -> Result<V, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de> + Default,
{
    Ok(Option::<V>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_first_page<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(DEFAULT_PAGE_NUMBER))
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page_number: DEFAULT_PAGE_NUMBER,
            total_pages: DEFAULT_PAGE_NUMBER,
            has_previous_page: false,
            has_next_page: false,
        }
    }
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn counter(body: &Value, key: &str) -> Option<u64> {
    body.get(key).and_then(Value::as_u64)
}

fn amount(body: &Value, key: &str) -> Option<f64> {
    body.get(key).and_then(Value::as_f64)
}

/// Counters shown on the dashboard landing view.
///
/// Holds the body as sent, so a `null` counter or an integer revenue comes
/// back out unchanged. The accessors return `None` for absent, `null` or
/// non-numeric fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodayStats(Record);

impl Default for TodayStats {
    fn default() -> Self {
        Self(json!({
            "newUsersCount": 0,
            "ordersCount": 0,
            "revenueToday": 0,
            "vendorsCount": 0,
        }))
    }
}

impl TodayStats {
    pub fn new_users_count(&self) -> Option<u64> {
        counter(&self.0, "newUsersCount")
    }

    pub fn orders_count(&self) -> Option<u64> {
        counter(&self.0, "ordersCount")
    }

    pub fn revenue_today(&self) -> Option<f64> {
        amount(&self.0, "revenueToday")
    }

    pub fn vendors_count(&self) -> Option<u64> {
        counter(&self.0, "vendorsCount")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for TodayStats {
    fn from(body: Value) -> Self {
        Self(body)
    }
}

/// Platform-wide totals, held as sent like `TodayStats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectSummary(Record);

impl Default for ProjectSummary {
    fn default() -> Self {
        Self(json!({
            "totalUsersCount": 0,
            "totalVendorsCount": 0,
            "totalRevenue": 0,
        }))
    }
}

impl ProjectSummary {
    pub fn total_users_count(&self) -> Option<u64> {
        counter(&self.0, "totalUsersCount")
    }

    pub fn total_vendors_count(&self) -> Option<u64> {
        counter(&self.0, "totalVendorsCount")
    }

    pub fn total_revenue(&self) -> Option<f64> {
        amount(&self.0, "totalRevenue")
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for ProjectSummary {
    fn from(body: Value) -> Self {
        Self(body)
    }
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Paging, search and sort keys shared by every listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub search_value: Option<String>,
    pub sort_column: Option<String>,
    pub sort_direction: Option<String>,
}

impl PageQuery {
    pub fn page(page_number: u32) -> Self {
        Self {
            page_number: Some(page_number),
            ..Self::default()
        }
    }

    pub fn effective_page_number(&self) -> u32 {
        self.page_number.unwrap_or(DEFAULT_PAGE_NUMBER)
    }

    pub fn effective_page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UsersQuery {
    #[serde(flatten)]
    pub paging: PageQuery,
    pub date_filter: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionsQuery {
    #[serde(flatten)]
    pub paging: PageQuery,
    pub date_filter: Option<String>,
    pub statuses: Vec<String>,
    pub payment_methods: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewsQuery {
    #[serde(flatten)]
    pub paging: PageQuery,
    pub business_types: Vec<String>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub status: Option<String>,
    pub statuses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrdersQuery {
    #[serde(flatten)]
    pub paging: PageQuery,
    pub business_types: Vec<String>,
    pub date_filter: Option<String>,
    pub statuses: Vec<String>,
}

/// Filters shared by the vendor-ratings and user-transactions listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RatingFilters {
    pub business_types: Vec<String>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub date_filter: Option<String>,
    pub status: Option<String>,
    pub statuses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VendorRatingsQuery {
    /// Sent as the `vendorId` query key, not as a path segment.
    pub vendor_id: Option<String>,
    #[serde(flatten)]
    pub paging: PageQuery,
    #[serde(flatten)]
    pub filters: RatingFilters,
}

impl VendorRatingsQuery {
    pub fn for_vendor(vendor_id: impl Into<String>, page_number: u32) -> Self {
        Self {
            vendor_id: Some(vendor_id.into()),
            paging: PageQuery::page(page_number),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserTransactionsQuery {
    /// Path segment of `/Admin/users/{user_id}/all-transactions`. Must not
    /// be empty; the default `""` builds `/Admin/users//all-transactions`.
    pub user_id: String,
    #[serde(flatten)]
    pub paging: PageQuery,
    #[serde(flatten)]
    pub filters: RatingFilters,
}

impl UserTransactionsQuery {
    pub fn for_user(user_id: impl Into<String>, page_number: u32) -> Self {
        Self {
            user_id: user_id.into(),
            paging: PageQuery::page(page_number),
            ..Self::default()
        }
    }
}
