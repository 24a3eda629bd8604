//! Drives fetches through the three-phase slot lifecycle.
//!
//! # Design
//! Every `fetch_*` method applies the pending transition *before* returning,
//! then hands back a `'static` future that performs the request and applies
//! exactly one settlement to the same slot. The future can be awaited in
//! place or spawned; nothing it does reaches any other slot.
//!
//! All fourteen fetches share `dispatch`, which is parameterized by the
//! `Resource` descriptor (for logging and the fallback message) and a
//! `SlotAccess` picking the slot to write.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, debug_span, warn, Instrument};

use crate::client::AdminClient;
use crate::config::{ClientConfig, SettlePolicy};
use crate::error::{ApiError, ErrorValue};
use crate::http::HttpRequest;
use crate::resource::Resource;
use crate::store::{SlotAccess, Store};
use crate::transport::{TokenSource, Transport};
use crate::types::{
    OrdersQuery, Page, ProjectSummary, Record, ReviewsQuery, TodayStats, TransactionsQuery,
    UserTransactionsQuery, UsersQuery, VendorRatingsQuery,
};

/// Result of one fetch: the decoded body or the value stored in the slot.
pub type FetchResult<T> = Result<T, ErrorValue>;

pub type DashboardResult = (
    FetchResult<TodayStats>,
    FetchResult<Vec<Record>>,
    FetchResult<ProjectSummary>,
);

/// Runs fetches against the admin API and records them in a `Store`.
///
/// # Pending before polling
/// Every `fetch_*` marks its slot pending as soon as it is called, but the
/// request is only sent once the returned future is first polled. A future
/// that is dropped or never awaited leaves the slot `loading` with nothing
/// in flight until the next fetch for that slot settles. Under
/// `SettlePolicy::LatestIssued` it also counts as the latest fetch, so
/// settlements of older fetches for that slot are discarded. Await the
/// future or hand it to `tokio::spawn`.
pub struct Synchronizer {
    client: AdminClient,
    store: Store,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenSource>,
    policy: SettlePolicy,
}

impl Synchronizer {
    pub fn new(
        config: &ClientConfig,
        store: Store,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            client: AdminClient::from_config(config),
            store,
            transport,
            tokens,
            policy: config.settle_policy,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn client(&self) -> &AdminClient {
        &self.client
    }

    pub fn settle_policy(&self) -> SettlePolicy {
        self.policy
    }

    /// Marks `today_stats` pending; the request is sent on first poll.
    pub fn fetch_today_stats(&self) -> impl Future<Output = FetchResult<TodayStats>> + Send {
        let req = self.client.build_today_stats(self.token().as_deref());
        self.dispatch(Resource::TodayStats, Ok(req), |s| &mut s.today_stats)
    }

    pub fn fetch_top_vendors(&self) -> impl Future<Output = FetchResult<Vec<Record>>> + Send {
        let req = self.client.build_top_vendors(self.token().as_deref());
        self.dispatch(Resource::TopVendors, Ok(req), |s| &mut s.top_vendors)
    }

    pub fn fetch_project_summary(
        &self,
    ) -> impl Future<Output = FetchResult<ProjectSummary>> + Send {
        let req = self.client.build_project_summary(self.token().as_deref());
        self.dispatch(Resource::ProjectSummary, Ok(req), |s| &mut s.project_summary)
    }

    /// Marks `users` pending; the request is sent on first poll.
    pub fn fetch_all_users(
        &self,
        params: &UsersQuery,
    ) -> impl Future<Output = FetchResult<Page<Record>>> + Send {
        let req = self.client.build_all_users(params, self.token().as_deref());
        self.dispatch(Resource::Users, req, |s| &mut s.users)
    }

    pub fn fetch_all_transactions(
        &self,
        params: &TransactionsQuery,
    ) -> impl Future<Output = FetchResult<Page<Record>>> + Send {
        let req = self
            .client
            .build_all_transactions(params, self.token().as_deref());
        self.dispatch(Resource::Transactions, Ok(req), |s| &mut s.transactions)
    }

    /// Marks `reviews` pending; the request is sent on first poll.
    pub fn fetch_user_vendor_reviews(
        &self,
        params: &ReviewsQuery,
    ) -> impl Future<Output = FetchResult<Page<Record>>> + Send {
        let req = self
            .client
            .build_user_vendor_reviews(params, self.token().as_deref());
        self.dispatch(Resource::Reviews, Ok(req), |s| &mut s.reviews)
    }

    pub fn fetch_all_orders(
        &self,
        params: &OrdersQuery,
    ) -> impl Future<Output = FetchResult<Page<Record>>> + Send {
        let req = self.client.build_all_orders(params, self.token().as_deref());
        self.dispatch(Resource::Orders, Ok(req), |s| &mut s.orders)
    }

    pub fn fetch_vendor_by_id(
        &self,
        vendor_id: &str,
    ) -> impl Future<Output = FetchResult<Option<Record>>> + Send {
        let req = self
            .client
            .build_vendor_by_id(vendor_id, self.token().as_deref());
        self.dispatch(Resource::VendorDetails, Ok(req), |s| &mut s.vendor_details)
    }

    pub fn fetch_vendor_menu(
        &self,
        vendor_id: &str,
    ) -> impl Future<Output = FetchResult<Vec<Record>>> + Send {
        let req = self
            .client
            .build_vendor_menu(vendor_id, self.token().as_deref());
        self.dispatch(Resource::VendorMenu, Ok(req), |s| &mut s.vendor_menu)
    }

    pub fn fetch_business_types(&self) -> impl Future<Output = FetchResult<Vec<Record>>> + Send {
        let req = self.client.build_business_types(self.token().as_deref());
        self.dispatch(Resource::BusinessTypes, Ok(req), |s| &mut s.business_types)
    }

    /// Marks `vendor_ratings` pending. A settled page replaces the previous one.
    pub fn fetch_vendor_ratings(
        &self,
        params: &VendorRatingsQuery,
    ) -> impl Future<Output = FetchResult<Page<Record>>> + Send {
        let req = self
            .client
            .build_vendor_ratings(params, self.token().as_deref());
        self.dispatch(Resource::VendorRatings, Ok(req), |s| &mut s.vendor_ratings)
    }

    /// Marks `user_transactions` pending. `params.user_id` must not be empty.
    pub fn fetch_user_transactions(
        &self,
        params: &UserTransactionsQuery,
    ) -> impl Future<Output = FetchResult<Page<Record>>> + Send {
        let req = self
            .client
            .build_user_transactions(params, self.token().as_deref());
        self.dispatch(Resource::UserTransactions, Ok(req), |s| {
            &mut s.user_transactions
        })
    }

    pub fn fetch_order_by_id(
        &self,
        order_id: &str,
    ) -> impl Future<Output = FetchResult<Option<Record>>> + Send {
        let req = self
            .client
            .build_order_by_id(order_id, self.token().as_deref());
        self.dispatch(Resource::OrderDetails, Ok(req), |s| &mut s.order_details)
    }

    /// Marks `transaction_status` pending; the request is sent on first poll.
    pub fn fetch_transaction_status(&self) -> impl Future<Output = FetchResult<Record>> + Send {
        let req = self.client.build_transaction_status(self.token().as_deref());
        self.dispatch(Resource::TransactionStatus, Ok(req), |s| {
            &mut s.transaction_status
        })
    }

    /// Today's stats, top vendors and the project summary, concurrently.
    pub fn fetch_dashboard(&self) -> impl Future<Output = DashboardResult> + Send {
        let stats = self.fetch_today_stats();
        let vendors = self.fetch_top_vendors();
        let summary = self.fetch_project_summary();
        async move { tokio::join!(stats, vendors, summary) }
    }

    fn token(&self) -> Option<String> {
        self.tokens.auth_token()
    }

    fn dispatch<T>(
        &self,
        resource: Resource,
        request: Result<HttpRequest, ApiError>,
        slot: SlotAccess<T>,
    ) -> impl Future<Output = FetchResult<T>> + Send + 'static
    where
        T: DeserializeOwned + Clone + Send + 'static,
    {
        let ticket = self.store.begin(slot);
        let span = debug_span!("fetch", %resource, seq = ticket.seq());
        span.in_scope(|| debug!("pending"));

        let store = self.store.clone();
        let client = self.client.clone();
        let transport = Arc::clone(&self.transport);
        let policy = self.policy;

        async move {
            let outcome = match request {
                Ok(request) => perform::<T>(&client, transport.as_ref(), &request).await,
                Err(e) => Err(e),
            };
            let outcome = outcome.map_err(|e| {
                warn!(error = %e, "fetch failed");
                e.into_error_value(resource.fallback())
            });

            if store.settle(slot, ticket, policy, outcome.clone()) {
                debug!(ok = outcome.is_ok(), "settled");
            } else {
                debug!("superseded by a newer fetch, settlement dropped");
            }
            outcome
        }
        .instrument(span)
    }
}

async fn perform<T: DeserializeOwned>(
    client: &AdminClient,
    transport: &dyn Transport,
    request: &HttpRequest,
) -> Result<T, ApiError> {
    let response = transport.perform_get(request).await?;
    client.parse(response)
}
