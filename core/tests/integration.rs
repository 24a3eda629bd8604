//! End-to-end dashboard flow against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the synchronizer over
//! real HTTP with `UreqTransport`. Validates that request building, status
//! handling and error folding agree with an actual server.

use std::net::SocketAddr;
use std::sync::Arc;

use admin_sync_core::{
    ClientConfig, ErrorValue, OrdersQuery, PageQuery, SharedToken, SlotStatus, Store,
    Synchronizer, UreqTransport, UsersQuery, VendorRatingsQuery,
};
use serde_json::json;

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn synchronizer(addr: SocketAddr, token: Option<&str>) -> Synchronizer {
    let config = ClientConfig::new(&format!("http://{addr}/api")).unwrap();
    Synchronizer::new(
        &config,
        Store::new(),
        Arc::new(UreqTransport::new()),
        Arc::new(SharedToken::new(token.map(str::to_string))),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn dashboard_session() {
    let sync = synchronizer(start_server(), Some("integration-token"));

    // Step 1: landing view.
    let (stats, vendors, summary) = sync.fetch_dashboard().await;
    assert_eq!(stats.unwrap().orders_count(), Some(30));
    assert_eq!(vendors.unwrap().len(), 3);
    assert_eq!(summary.unwrap().total_vendors_count(), Some(5));

    // Step 2: users, default paging.
    let users = sync.fetch_all_users(&UsersQuery::default()).await.unwrap();
    assert_eq!(users.len(), 10);
    assert_eq!(users.total_pages, 3);
    assert!(users.has_next_page);

    // Step 3: orders filtered by two statuses.
    let orders = sync
        .fetch_all_orders(&OrdersQuery {
            paging: PageQuery {
                page_size: Some(50),
                ..PageQuery::default()
            },
            statuses: vec!["Pending".into(), "Paid".into()],
            ..OrdersQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(orders.len(), 15);

    // Step 4: vendor 42, its menu and two pages of ratings.
    let vendor = sync.fetch_vendor_by_id("42").await.unwrap();
    assert_eq!(vendor.unwrap()["name"], "vendor-42");
    assert_eq!(sync.fetch_vendor_menu("42").await.unwrap().len(), 3);

    let mut query = VendorRatingsQuery::for_vendor("42", 1);
    query.paging.page_size = Some(3);
    let first = sync.fetch_vendor_ratings(&query).await.unwrap();
    assert!(!first.has_previous_page);

    query.paging.page_number = Some(2);
    let second = sync.fetch_vendor_ratings(&query).await.unwrap();
    assert_eq!(second.page_number, 2);
    assert!(second.has_previous_page);
    sync.store().select(|s| {
        let stored = s.vendor_ratings.data();
        assert_eq!(stored, &second);
        assert!(stored.items.iter().all(|r| !first.items.contains(r)));
    });

    // Step 5: leaving the vendor page.
    sync.store().clear_vendor_details();
    sync.store().clear_vendor_menu();
    sync.store().clear_vendor_ratings();
    sync.store().select(|s| {
        assert!(s.vendor_details.data().is_none());
        assert!(s.vendor_menu.data().is_empty());
        assert!(s.vendor_ratings.data().is_empty());
    });

    // Step 6: the remaining endpoints.
    assert_eq!(sync.fetch_business_types().await.unwrap().len(), 3);
    let status = sync.fetch_transaction_status().await.unwrap();
    assert_eq!(status["completed"], 10);
    assert_eq!(sync.fetch_order_by_id("5").await.unwrap().unwrap()["id"], 5);
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_vendor_keeps_server_message() {
    let sync = synchronizer(start_server(), Some("integration-token"));

    sync.fetch_vendor_by_id("42").await.unwrap();
    let err = sync.fetch_vendor_by_id("7").await.unwrap_err();

    assert_eq!(err, ErrorValue::Remote(json!({ "message": "Vendor 7 not found" })));
    assert_eq!(err.to_string(), "Vendor 7 not found");
    sync.store().select(|s| {
        // previous vendor survives the failure
        assert_eq!(s.vendor_details.data().as_ref().unwrap()["id"], 42);
        assert_eq!(s.vendor_details.status(), SlotStatus::Rejected);
    });

    sync.store().clear_error();
    assert!(sync.store().select(|s| s.vendor_details.error().is_none()));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_token_is_rejected_by_server() {
    let sync = synchronizer(start_server(), None);

    let err = sync.fetch_today_stats().await.unwrap_err();
    assert_eq!(err, ErrorValue::Remote(json!({ "message": "Unauthorized" })));
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_uses_fallback() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let sync = synchronizer(addr, Some("integration-token"));

    let err = sync.fetch_all_transactions(&Default::default()).await.unwrap_err();
    assert_eq!(err, ErrorValue::message("Failed to fetch transactions"));
    sync.store().select(|s| {
        assert!(!s.transactions.loading());
        assert!(s.transactions.data().is_empty());
    });
}
