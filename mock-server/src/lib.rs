//! In-memory stand-in for the admin dashboard API.
//!
//! Serves every endpoint the sync layer reads under `/api`, backed by
//! `Fixtures::seeded()`. All routes require `Authorization: Bearer <token>`;
//! a missing token or the literal `Bearer null` gets a 401 with a JSON body.

pub mod fixtures;

use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub use fixtures::Fixtures;

pub type Db = Arc<Fixtures>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBody<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub total_pages: u32,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

pub fn app() -> Router {
    app_with(Fixtures::seeded())
}

pub fn app_with(fixtures: Fixtures) -> Router {
    let db: Db = Arc::new(fixtures);
    let api = Router::new()
        .route("/Admin/today-stats", get(today_stats))
        .route("/Admin/top-vendors", get(top_vendors))
        .route("/Admin/project-summary", get(project_summary))
        .route("/Admin/all-users", get(all_users))
        .route("/Admin/all-transactions", get(all_transactions))
        .route("/Admin/users/{id}/all-transactions", get(user_transactions))
        .route("/Admin/transaction-stats", get(transaction_stats))
        .route("/Reviews/user-vendor-reviews", get(user_vendor_reviews))
        .route("/Orders/all-orders", get(all_orders))
        .route("/Orders/{id}", get(order_by_id))
        .route("/Vendors/BusinessTypes", get(business_types))
        .route("/Vendors/vendors-rating", get(vendor_ratings))
        .route("/Vendors/{id}", get(vendor_by_id))
        .route("/Vendors/{id}/menu", get(vendor_menu))
        .layer(middleware::from_fn(require_bearer))
        .with_state(db);
    Router::new().nest("/api", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_bearer(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.is_empty() && token != "null" && token != "undefined");

    tracing::debug!(uri = %request.uri(), authorized, "request");
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthorized" })),
        )
            .into_response();
    }
    next.run(request).await
}

// ---------------------------------------------------------------------------
// Query handling
// ---------------------------------------------------------------------------

/// Raw query pairs; repeated keys are kept in order.
struct ListQuery {
    pairs: Vec<(String, String)>,
}

impl ListQuery {
    fn parse(raw: Option<String>) -> Result<Self, Response> {
        let pairs = match raw {
            Some(raw) => serde_urlencoded::from_str(&raw).map_err(|e| {
                bad_request(format!("malformed query: {e}"))
            })?,
            None => Vec::new(),
        };
        Ok(Self { pairs })
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    fn number<N: std::str::FromStr>(&self, key: &str) -> Result<Option<N>, Response> {
        self.get(key)
            .map(|v| {
                v.parse()
                    .map_err(|_| bad_request(format!("{key} must be a number, got {v:?}")))
            })
            .transpose()
    }

    fn search(&self) -> Option<String> {
        self.get("SearchValue")
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Paginate `items` using `PageNumer` (sic) and `PageSize`.
    fn page<T>(&self, items: Vec<T>) -> Result<PageBody<T>, Response> {
        let page_number = self.number::<u32>("PageNumer")?.unwrap_or(1).max(1);
        let page_size = self.number::<u32>("PageSize")?.unwrap_or(10).max(1);
        let total_pages = (items.len() as u32).div_ceil(page_size).max(1);
        let start = (page_number - 1).saturating_mul(page_size) as usize;
        let items = items
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();
        Ok(PageBody {
            items,
            page_number,
            total_pages,
            has_previous_page: page_number > 1,
            has_next_page: page_number < total_pages,
        })
    }
}

/// Empty filter lists match everything.
fn matches_any(allowed: &[&str], value: &str) -> bool {
    allowed.is_empty() || allowed.contains(&value)
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
}

fn not_found(message: String) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

async fn today_stats(State(db): State<Db>) -> Json<Value> {
    Json(json!({
        "newUsersCount": db.users.len() / 4,
        "ordersCount": db.orders.len(),
        "revenueToday": db.revenue(),
        "vendorsCount": db.vendors.len(),
    }))
}

async fn top_vendors(State(db): State<Db>) -> Json<Vec<fixtures::Vendor>> {
    let mut vendors = db.vendors.clone();
    vendors.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    vendors.truncate(3);
    Json(vendors)
}

async fn project_summary(State(db): State<Db>) -> Json<Value> {
    Json(json!({
        "totalUsersCount": db.users.len(),
        "totalVendorsCount": db.vendors.len(),
        "totalRevenue": db.revenue(),
    }))
}

async fn transaction_stats(State(db): State<Db>) -> Json<Value> {
    let count = |status: &str| db.transactions.iter().filter(|t| t.status == status).count();
    Json(json!({
        "completed": count("Completed"),
        "refunded": count("Refunded"),
        "failed": count("Failed"),
    }))
}

async fn business_types() -> Json<Vec<Value>> {
    Json(
        fixtures::BUSINESS_TYPES
            .iter()
            .enumerate()
            .map(|(id, name)| json!({ "id": id + 1, "name": name }))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

type Listing<T> = Result<Json<PageBody<T>>, Response>;

async fn all_users(State(db): State<Db>, RawQuery(raw): RawQuery) -> Listing<fixtures::User> {
    let q = ListQuery::parse(raw)?;
    let search = q.search();
    let status = q.get("Status");
    let users: Vec<fixtures::User> = db
        .users
        .iter()
        .filter(|u| search.as_ref().is_none_or(|s| u.name.contains(s.as_str())))
        .filter(|u| status.is_none_or(|s| u.status == s))
        .cloned()
        .collect();
    Ok(Json(q.page(users)?))
}

async fn all_transactions(
    State(db): State<Db>,
    RawQuery(raw): RawQuery,
) -> Listing<fixtures::Transaction> {
    let q = ListQuery::parse(raw)?;
    let statuses = q.all("Statuses");
    let methods = q.all("PaymentMethods");
    let items: Vec<fixtures::Transaction> = db
        .transactions
        .iter()
        .filter(|t| matches_any(&statuses, &t.status))
        .filter(|t| matches_any(&methods, &t.payment_method))
        .cloned()
        .collect();
    Ok(Json(q.page(items)?))
}

async fn user_transactions(
    State(db): State<Db>,
    Path(user_id): Path<u32>,
    RawQuery(raw): RawQuery,
) -> Listing<fixtures::Transaction> {
    let q = ListQuery::parse(raw)?;
    let statuses = q.all("Statuses");
    let items: Vec<fixtures::Transaction> = db
        .transactions
        .iter()
        .filter(|t| t.user_id == user_id)
        .filter(|t| matches_any(&statuses, &t.status))
        .cloned()
        .collect();
    Ok(Json(q.page(items)?))
}

async fn all_orders(State(db): State<Db>, RawQuery(raw): RawQuery) -> Listing<fixtures::Order> {
    let q = ListQuery::parse(raw)?;
    let search = q.search();
    let statuses = q.all("Statuses");
    let types = q.all("BusinessTypes");
    let items: Vec<fixtures::Order> = db
        .orders
        .iter()
        .filter(|o| search.as_ref().is_none_or(|s| o.customer.contains(s.as_str())))
        .filter(|o| matches_any(&statuses, &o.status))
        .filter(|o| matches_any(&types, &o.business_type))
        .cloned()
        .collect();
    Ok(Json(q.page(items)?))
}

fn filter_reviews(db: &Fixtures, q: &ListQuery) -> Result<Vec<fixtures::Review>, Response> {
    let vendor_id = q.number::<u32>("vendorId")?;
    let min = q.number::<f64>("MinRating")?;
    let max = q.number::<f64>("MaxRating")?;
    let types = q.all("BusinessTypes");
    let statuses = q.all("Statuses");
    Ok(db
        .reviews
        .iter()
        .filter(|r| vendor_id.is_none_or(|id| r.vendor_id == id))
        .filter(|r| min.is_none_or(|m| r.rating >= m))
        .filter(|r| max.is_none_or(|m| r.rating <= m))
        .filter(|r| matches_any(&types, &r.business_type))
        .filter(|r| matches_any(&statuses, &r.status))
        .cloned()
        .collect())
}

async fn user_vendor_reviews(
    State(db): State<Db>,
    RawQuery(raw): RawQuery,
) -> Listing<fixtures::Review> {
    let q = ListQuery::parse(raw)?;
    let items = filter_reviews(&db, &q)?;
    Ok(Json(q.page(items)?))
}

async fn vendor_ratings(State(db): State<Db>, RawQuery(raw): RawQuery) -> Listing<fixtures::Review> {
    let q = ListQuery::parse(raw)?;
    let items = filter_reviews(&db, &q)?;
    Ok(Json(q.page(items)?))
}

// ---------------------------------------------------------------------------
// Single entities
// ---------------------------------------------------------------------------

async fn vendor_by_id(
    State(db): State<Db>,
    Path(id): Path<u32>,
) -> Result<Json<fixtures::Vendor>, Response> {
    db.vendor(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(format!("Vendor {id} not found")))
}

async fn vendor_menu(
    State(db): State<Db>,
    Path(id): Path<u32>,
) -> Result<Json<Vec<fixtures::MenuItem>>, Response> {
    if db.vendor(id).is_none() {
        return Err(not_found(format!("Vendor {id} not found")));
    }
    Ok(Json(
        db.menu.iter().filter(|m| m.vendor_id == id).cloned().collect(),
    ))
}

async fn order_by_id(
    State(db): State<Db>,
    Path(id): Path<u32>,
) -> Result<Json<fixtures::Order>, Response> {
    db.order(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(format!("Order {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(raw: &str) -> ListQuery {
        ListQuery::parse(Some(raw.to_string())).unwrap()
    }

    #[test]
    fn repeated_keys_are_all_kept() {
        let q = query("Statuses=Pending&Statuses=Paid&PageNumer=2");
        assert_eq!(q.all("Statuses"), vec!["Pending", "Paid"]);
        assert_eq!(q.get("PageNumer"), Some("2"));
    }

    #[test]
    fn page_flags_follow_position() {
        let q = query("PageNumer=2&PageSize=3");
        let page = q.page((1..=7).collect::<Vec<u32>>()).unwrap();
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous_page);
        assert!(page.has_next_page);
    }

    #[test]
    fn empty_listing_is_one_empty_page() {
        let q = query("");
        let page = q.page(Vec::<u32>::new()).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.page_number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next_page);
    }

    #[test]
    fn non_numeric_page_is_rejected() {
        let q = query("PageNumer=two");
        assert!(q.page(vec![1u32]).is_err());
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(matches_any(&[], "Paid"));
        assert!(matches_any(&["Paid"], "Paid"));
        assert!(!matches_any(&["Pending"], "Paid"));
    }
}
