//! Client-side sync layer for the admin dashboard API.
//!
//! # Overview
//! Builds authenticated `GET` requests for every resource the dashboard
//! reads, executes them through a pluggable `Transport`, and projects each
//! response into its own slot of a shared `Store`, with a per-slot
//! pending/fulfilled/rejected lifecycle.
//!
//! # Design
//! - `AdminClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse` consumes an `HttpResponse`. No I/O happens here.
//! - `Store` owns all slots; `Synchronizer` is the only writer apart from
//!   the explicit `clear_*` calls.
//! - Slots never share `loading`/`error` fields, so one resource's failure
//!   or pending state is invisible to every other.
//! - Each slot numbers its fetches; see `SettlePolicy` for what happens
//!   when two fetches for the same slot overlap.
//!
//! ```no_run
//! use std::sync::Arc;
//! use admin_sync_core::{ClientConfig, OrdersQuery, SharedToken, Store, Synchronizer, UreqTransport};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let store = Store::new();
//! let sync = Synchronizer::new(
//!     &config,
//!     store.clone(),
//!     Arc::new(UreqTransport::new()),
//!     Arc::new(SharedToken::new(Some("token".to_string()))),
//! );
//!
//! let orders = sync.fetch_all_orders(&OrdersQuery::default());
//! assert!(store.select(|s| s.orders.loading()));
//! let _ = orders.await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod query;
pub mod resource;
pub mod store;
pub mod sync;
pub mod transport;
pub mod types;

pub use client::AdminClient;
pub use config::{ClientConfig, SettlePolicy};
pub use error::{ApiError, ConfigError, ErrorValue, TransportError};
pub use http::{HttpRequest, HttpResponse};
pub use query::QueryBuilder;
pub use resource::Resource;
pub use store::{AdminState, Slot, SlotStatus, Store, Ticket};
pub use sync::{DashboardResult, FetchResult, Synchronizer};
pub use transport::{SharedToken, TokenSource, Transport};
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
pub use types::{
    OrdersQuery, Page, PageQuery, ProjectSummary, RatingFilters, Record, ReviewsQuery,
    TodayStats, TransactionsQuery, UserTransactionsQuery, UsersQuery, VendorRatingsQuery,
};
