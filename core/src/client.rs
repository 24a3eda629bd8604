//! Stateless request builder and response parser for the admin API.
//!
//! # Design
//! `AdminClient` holds only a `base_url`. Each resource kind has a `build_*`
//! method producing an `HttpRequest`; every response goes through the one
//! generic `parse`. The caller (a `Transport`) executes the round-trip in
//! between, so this module stays deterministic and free of I/O.
//!
//! The bearer token is attached as-is. A missing token is sent as the
//! literal `Bearer null` and left for the server to reject.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::query::{encode_object, non_empty, with_query, QueryBuilder};
use crate::resource::Resource;
use crate::types::{
    OrdersQuery, PageQuery, RatingFilters, ReviewsQuery, TransactionsQuery, UserTransactionsQuery,
    UsersQuery, VendorRatingsQuery,
};

/// Stateless builder for admin API requests.
#[derive(Debug, Clone)]
pub struct AdminClient {
    base_url: String,
}

impl AdminClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_today_stats(&self, token: Option<&str>) -> HttpRequest {
        self.request(Resource::TodayStats, None, "", token)
    }

    pub fn build_top_vendors(&self, token: Option<&str>) -> HttpRequest {
        self.request(Resource::TopVendors, None, "", token)
    }

    pub fn build_project_summary(&self, token: Option<&str>) -> HttpRequest {
        self.request(Resource::ProjectSummary, None, "", token)
    }

    /// Users listing, object-params style.
    pub fn build_all_users(
        &self,
        params: &UsersQuery,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let wire = UsersWire {
            page_number: params.paging.effective_page_number(),
            page_size: params.paging.effective_page_size(),
            search_value: non_empty(&params.paging.search_value),
            sort_column: non_empty(&params.paging.sort_column),
            sort_direction: non_empty(&params.paging.sort_direction),
            date_filter: non_empty(&params.date_filter),
            status: non_empty(&params.status),
        };
        let query =
            encode_object(&wire).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.request(Resource::Users, None, &query, token))
    }

    pub fn build_all_transactions(
        &self,
        params: &TransactionsQuery,
        token: Option<&str>,
    ) -> HttpRequest {
        let query = paging(QueryBuilder::new(), &params.paging)
            .push_text("DateFilter", non_empty(&params.date_filter))
            .push_all("Statuses", &params.statuses)
            .push_all("PaymentMethods", &params.payment_methods)
            .finish();
        self.request(Resource::Transactions, None, &query, token)
    }

    pub fn build_user_vendor_reviews(
        &self,
        params: &ReviewsQuery,
        token: Option<&str>,
    ) -> HttpRequest {
        let query = paging(QueryBuilder::new(), &params.paging)
            .push_all("BusinessTypes", &params.business_types)
            .push_opt("MinRating", params.min_rating)
            .push_opt("MaxRating", params.max_rating)
            .push_text("Status", non_empty(&params.status))
            .push_all("Statuses", &params.statuses)
            .finish();
        self.request(Resource::Reviews, None, &query, token)
    }

    pub fn build_all_orders(&self, params: &OrdersQuery, token: Option<&str>) -> HttpRequest {
        let query = paging(QueryBuilder::new(), &params.paging)
            .push_all("BusinessTypes", &params.business_types)
            .push_text("DateFilter", non_empty(&params.date_filter))
            .push_all("Statuses", &params.statuses)
            .finish();
        self.request(Resource::Orders, None, &query, token)
    }

    pub fn build_vendor_by_id(&self, vendor_id: &str, token: Option<&str>) -> HttpRequest {
        self.request(Resource::VendorDetails, Some(vendor_id), "", token)
    }

    pub fn build_vendor_menu(&self, vendor_id: &str, token: Option<&str>) -> HttpRequest {
        self.request(Resource::VendorMenu, Some(vendor_id), "", token)
    }

    pub fn build_business_types(&self, token: Option<&str>) -> HttpRequest {
        self.request(Resource::BusinessTypes, None, "", token)
    }

    pub fn build_vendor_ratings(
        &self,
        params: &VendorRatingsQuery,
        token: Option<&str>,
    ) -> HttpRequest {
        let query = QueryBuilder::new().push_text("vendorId", non_empty(&params.vendor_id));
        let query = rating_filters(paging(query, &params.paging), &params.filters).finish();
        self.request(Resource::VendorRatings, None, &query, token)
    }

    pub fn build_user_transactions(
        &self,
        params: &UserTransactionsQuery,
        token: Option<&str>,
    ) -> HttpRequest {
        let query = rating_filters(paging(QueryBuilder::new(), &params.paging), &params.filters)
            .finish();
        self.request(
            Resource::UserTransactions,
            Some(&params.user_id),
            &query,
            token,
        )
    }

    pub fn build_order_by_id(&self, order_id: &str, token: Option<&str>) -> HttpRequest {
        self.request(Resource::OrderDetails, Some(order_id), "", token)
    }

    pub fn build_transaction_status(&self, token: Option<&str>) -> HttpRequest {
        self.request(Resource::TransactionStatus, None, "", token)
    }

    /// Decode a 2xx body into `T`; any other status is an `HttpError`.
    pub fn parse<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    fn request(
        &self,
        resource: Resource,
        id: Option<&str>,
        query: &str,
        token: Option<&str>,
    ) -> HttpRequest {
        let descriptor = resource.descriptor();
        let path = match id {
            Some(id) => descriptor
                .path
                .replace("{id}", &urlencoding::encode(id)),
            None => descriptor.path.to_string(),
        };
        let url = with_query(&format!("{}{path}", self.base_url), query);

        let mut headers = Vec::with_capacity(2);
        if let Some(accept) = descriptor.accept {
            headers.push(("accept".to_string(), accept.to_string()));
        }
        headers.push((
            "Authorization".to_string(),
            format!("Bearer {}", token.unwrap_or("null")),
        ));
        HttpRequest { url, headers }
    }
}

#[derive(Serialize)]
struct UsersWire<'a> {
    #[serde(rename = "PageNumer")]
    page_number: u32,
    #[serde(rename = "PageSize")]
    page_size: u32,
    #[serde(rename = "SearchValue", skip_serializing_if = "Option::is_none")]
    search_value: Option<&'a str>,
    #[serde(rename = "SortColumn", skip_serializing_if = "Option::is_none")]
    sort_column: Option<&'a str>,
    #[serde(rename = "SortDirection", skip_serializing_if = "Option::is_none")]
    sort_direction: Option<&'a str>,
    #[serde(rename = "DateFilter", skip_serializing_if = "Option::is_none")]
    date_filter: Option<&'a str>,
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
}

/// Paging keys in wire order. `PageNumer` is the server's spelling.
fn paging(query: QueryBuilder, params: &PageQuery) -> QueryBuilder {
    query
        .push("PageNumer", params.effective_page_number())
        .push("PageSize", params.effective_page_size())
        .push_text("SearchValue", non_empty(&params.search_value))
        .push_text("SortColumn", non_empty(&params.sort_column))
        .push_text("SortDirection", non_empty(&params.sort_direction))
}

fn rating_filters(query: QueryBuilder, filters: &RatingFilters) -> QueryBuilder {
    query
        .push_all("BusinessTypes", &filters.business_types)
        .push_opt("MinRating", filters.min_rating)
        .push_opt("MaxRating", filters.max_rating)
        .push_text("DateFilter", non_empty(&filters.date_filter))
        .push_text("Status", non_empty(&filters.status))
        .push_all("Statuses", &filters.statuses)
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
