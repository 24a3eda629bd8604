//! Shared dashboard state: one `Slot` per resource kind.
//!
//! # Design
//! `Store` is a cheap handle around a single `AdminState`. A composition
//! root creates one and hands clones to whoever needs it; nothing is global,
//! so every test builds its own.
//!
//! Each slot runs the same small state machine:
//!
//! ```text
//!   Idle ──begin──▶ Pending ──settle(Ok)──▶ Fulfilled
//!                      ▲    └─settle(Err)─▶ Rejected
//!                      └────────begin───────────┘
//! ```
//!
//! `begin` hands out a `Ticket` carrying the slot's next sequence number.
//! Under `SettlePolicy::LatestIssued` a settlement whose ticket is not the
//! slot's latest is dropped, so a slow, superseded request can never
//! overwrite a newer one. Every transition holds the write lock once and
//! either applies fully or not at all.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::watch;

use crate::config::SettlePolicy;
use crate::error::ErrorValue;
use crate::types::{Page, ProjectSummary, Record, TodayStats};

/// Lifecycle phase of a slot's most recent fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotStatus {
    #[default]
    Idle,
    Pending,
    Fulfilled,
    Rejected,
}

/// Sequence number handed out by `Slot::begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Data, loading flag and last error of one resource kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot<T> {
    data: T,
    loading: bool,
    error: Option<ErrorValue>,
    status: SlotStatus,
    #[serde(skip)]
    issued: u64,
}

impl<T> Slot<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            loading: false,
            error: None,
            status: SlotStatus::Idle,
            issued: 0,
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&ErrorValue> {
        self.error.as_ref()
    }

    pub fn status(&self) -> SlotStatus {
        self.status
    }

    /// Sequence number of the most recently issued fetch (0 before any).
    pub fn latest_seq(&self) -> u64 {
        self.issued
    }

    pub(crate) fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.loading = true;
        self.error = None;
        self.status = SlotStatus::Pending;
        Ticket(self.issued)
    }

    /// Apply a settlement. Returns `false` when it was dropped as stale.
    pub(crate) fn settle(
        &mut self,
        ticket: Ticket,
        policy: SettlePolicy,
        outcome: Result<T, ErrorValue>,
    ) -> bool {
        if policy == SettlePolicy::LatestIssued && ticket.0 != self.issued {
            return false;
        }
        self.loading = false;
        match outcome {
            Ok(data) => {
                self.data = data;
                self.status = SlotStatus::Fulfilled;
            }
            Err(error) => {
                self.error = Some(error);
                self.status = SlotStatus::Rejected;
            }
        }
        true
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }
}

impl<T: Default> Slot<T> {
    /// Back to default data with no error; `loading` is left alone.
    pub(crate) fn reset(&mut self) {
        self.data = T::default();
        self.error = None;
    }
}

/// Every slot the dashboard reads from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminState {
    pub today_stats: Slot<TodayStats>,
    pub top_vendors: Slot<Vec<Record>>,
    pub project_summary: Slot<ProjectSummary>,
    pub users: Slot<Page<Record>>,
    pub transactions: Slot<Page<Record>>,
    pub reviews: Slot<Page<Record>>,
    pub orders: Slot<Page<Record>>,
    pub vendor_details: Slot<Option<Record>>,
    pub vendor_menu: Slot<Vec<Record>>,
    pub business_types: Slot<Vec<Record>>,
    pub vendor_ratings: Slot<Page<Record>>,
    pub user_transactions: Slot<Page<Record>>,
    pub order_details: Slot<Option<Record>>,
    pub transaction_status: Slot<Record>,
}

impl Default for AdminState {
    fn default() -> Self {
        Self {
            today_stats: Slot::default(),
            top_vendors: Slot::default(),
            project_summary: Slot::default(),
            users: Slot::default(),
            transactions: Slot::default(),
            reviews: Slot::default(),
            orders: Slot::default(),
            vendor_details: Slot::default(),
            vendor_menu: Slot::default(),
            business_types: Slot::default(),
            vendor_ratings: Slot::default(),
            user_transactions: Slot::default(),
            order_details: Slot::default(),
            transaction_status: Slot::new(Value::Object(Map::new())),
        }
    }
}

/// Picks one slot out of the state.
pub type SlotAccess<T> = for<'a> fn(&'a mut AdminState) -> &'a mut Slot<T>;

/// Shared handle to the dashboard state.
#[derive(Debug, Clone)]
pub struct Store {
    state: Arc<RwLock<AdminState>>,
    revision: Arc<watch::Sender<u64>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: Arc::new(RwLock::new(AdminState::default())),
            revision: Arc::new(revision),
        }
    }

    /// Read-only projection of the current state.
    ///
    /// `f` runs under the state's read lock, which is not reentrant: calling
    /// a `clear_*` method (or starting a fetch) from inside `f` deadlocks.
    /// Decide inside, act outside:
    ///
    /// ```
    /// use admin_sync_core::Store;
    ///
    /// let store = Store::new();
    /// let stale = store.select(|s| s.vendor_menu.error().is_some());
    /// if stale {
    ///     store.clear_vendor_menu();
    /// }
    /// assert!(store.select(|s| s.vendor_menu.error().is_none()));
    /// ```
    pub fn select<R>(&self, f: impl FnOnce(&AdminState) -> R) -> R {
        f(&*self.state.read())
    }

    pub fn snapshot(&self) -> AdminState {
        self.state.read().clone()
    }

    /// Receiver that changes whenever a transition or clear is applied.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub(crate) fn begin<T>(&self, slot: SlotAccess<T>) -> Ticket {
        self.update(|state| slot(state).begin())
    }

    pub(crate) fn settle<T>(
        &self,
        slot: SlotAccess<T>,
        ticket: Ticket,
        policy: SettlePolicy,
        outcome: Result<T, ErrorValue>,
    ) -> bool {
        let applied = slot(&mut *self.state.write()).settle(ticket, policy, outcome);
        if applied {
            self.bump();
        }
        applied
    }

    pub fn clear_vendor_details(&self) {
        self.update(|state| state.vendor_details.reset());
    }

    pub fn clear_vendor_menu(&self) {
        self.update(|state| state.vendor_menu.reset());
    }

    pub fn clear_vendor_ratings(&self) {
        self.update(|state| state.vendor_ratings.reset());
    }

    pub fn clear_user_transactions(&self) {
        self.update(|state| state.user_transactions.reset());
    }

    pub fn clear_order_details(&self) {
        self.update(|state| state.order_details.reset());
    }

    /// Clear the error of every dashboard slot plus vendor details and menu.
    pub fn clear_error(&self) {
        self.update(|state| {
            state.today_stats.clear_error();
            state.top_vendors.clear_error();
            state.project_summary.clear_error();
            state.users.clear_error();
            state.transactions.clear_error();
            state.reviews.clear_error();
            state.orders.clear_error();
            state.business_types.clear_error();
            state.transaction_status.clear_error();
            state.vendor_details.clear_error();
            state.vendor_menu.clear_error();
        });
    }

    fn update<R>(&self, f: impl FnOnce(&mut AdminState) -> R) -> R {
        let out = f(&mut *self.state.write());
        self.bump();
        out
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(n: u32, total: u32, ids: &[u64]) -> Page<Record> {
        Page {
            items: ids.iter().map(|id| json!({ "id": id })).collect(),
            page_number: n,
            total_pages: total,
            has_previous_page: n > 1,
            has_next_page: n < total,
        }
    }

    #[test]
    fn begin_sets_loading_and_clears_error() {
        let mut slot = Slot::new(0u32);
        let t = slot.begin();
        assert!(slot.settle(t, SettlePolicy::LatestIssued, Err(ErrorValue::message("x"))));
        assert!(slot.error().is_some());

        slot.begin();
        assert!(slot.loading());
        assert!(slot.error().is_none());
        assert_eq!(slot.status(), SlotStatus::Pending);
    }

    #[test]
    fn fulfil_replaces_data() {
        let mut slot = Slot::new(page(1, 3, &[1, 2, 3]));
        let t = slot.begin();
        assert!(slot.settle(t, SettlePolicy::LatestIssued, Ok(page(2, 3, &[4, 5]))));
        assert_eq!(slot.data(), &page(2, 3, &[4, 5]));
        assert!(!slot.loading());
        assert_eq!(slot.status(), SlotStatus::Fulfilled);
    }

    #[test]
    fn reject_keeps_previous_data() {
        let mut slot = Slot::new(page(1, 1, &[1]));
        let t = slot.begin();
        slot.settle(t, SettlePolicy::LatestIssued, Err(ErrorValue::message("down")));
        assert_eq!(slot.data(), &page(1, 1, &[1]));
        assert_eq!(slot.error(), Some(&ErrorValue::message("down")));
        assert!(!slot.loading());
        assert_eq!(slot.status(), SlotStatus::Rejected);
    }

    #[test]
    fn latest_issued_drops_superseded_settlements() {
        let mut slot = Slot::new(0u32);
        let first = slot.begin();
        let second = slot.begin();

        assert!(slot.settle(second, SettlePolicy::LatestIssued, Ok(2)));
        assert!(!slot.settle(first, SettlePolicy::LatestIssued, Ok(1)));
        assert_eq!(*slot.data(), 2);
    }

    #[test]
    fn superseded_settlement_leaves_slot_loading() {
        let mut slot = Slot::new(0u32);
        let first = slot.begin();
        let second = slot.begin();

        assert!(!slot.settle(first, SettlePolicy::LatestIssued, Ok(1)));
        assert!(slot.loading());
        assert!(slot.settle(second, SettlePolicy::LatestIssued, Ok(2)));
        assert!(!slot.loading());
    }

    #[test]
    fn last_settled_lets_stale_response_win() {
        let mut slot = Slot::new(0u32);
        let first = slot.begin();
        let second = slot.begin();

        assert!(slot.settle(second, SettlePolicy::LastSettled, Ok(2)));
        assert!(slot.settle(first, SettlePolicy::LastSettled, Ok(1)));
        assert_eq!(*slot.data(), 1, "older request overwrote the newer page");
    }

    #[test]
    fn reset_keeps_loading() {
        let mut slot = Slot::new(page(2, 3, &[7]));
        slot.begin();
        slot.reset();
        assert!(slot.loading());
        assert_eq!(slot.data(), &Page::default());
        assert!(slot.error().is_none());
    }

    #[test]
    fn default_state_matches_module_load_values() {
        let state = AdminState::default();
        assert_eq!(state.today_stats.data(), &TodayStats::default());
        assert_eq!(state.transaction_status.data(), &json!({}));
        assert_eq!(state.vendor_details.data(), &None);
        assert!(state.business_types.data().is_empty());
        assert_eq!(state.users.data(), &Page::default());
        assert!(!state.users.loading());
    }

    #[test]
    fn clear_vendor_ratings_is_idempotent_and_isolated() {
        let store = Store::new();
        let t = store.begin::<Page<Record>>(|s| &mut s.vendor_ratings);
        store.settle(
            |s| &mut s.vendor_ratings,
            t,
            SettlePolicy::LatestIssued,
            Err(ErrorValue::message("Failed to fetch vendor ratings")),
        );
        store.begin::<Page<Record>>(|s| &mut s.orders);

        store.clear_vendor_ratings();
        store.clear_vendor_ratings();

        store.select(|s| {
            assert_eq!(s.vendor_ratings.data(), &Page::default());
            assert!(s.vendor_ratings.error().is_none());
            assert!(!s.vendor_ratings.loading());
            assert!(s.orders.loading());
        });
    }

    fn fail<T>(store: &Store, slot: SlotAccess<T>) {
        let t = store.begin(slot);
        store.settle(slot, t, SettlePolicy::LatestIssued, Err(ErrorValue::message("e")));
    }

    #[test]
    fn clear_error_touches_only_errors() {
        let store = Store::new();
        fail(&store, |s| &mut s.vendor_menu);
        fail(&store, |s| &mut s.business_types);
        let t = store.begin::<Page<Record>>(|s| &mut s.vendor_ratings);
        store.settle(
            |s| &mut s.vendor_ratings,
            t,
            SettlePolicy::LatestIssued,
            Err(ErrorValue::message("kept")),
        );

        store.clear_error();

        store.select(|s| {
            assert!(s.vendor_menu.error().is_none());
            assert!(s.business_types.error().is_none());
            assert_eq!(s.vendor_ratings.error(), Some(&ErrorValue::message("kept")));
        });
    }

    #[test]
    fn revision_moves_on_applied_changes_only() {
        let store = Store::new();
        let rx = store.subscribe();
        let first = store.begin::<TodayStats>(|s| &mut s.today_stats);
        let _second = store.begin::<TodayStats>(|s| &mut s.today_stats);
        let before = store.revision();

        let applied = store.settle(
            |s| &mut s.today_stats,
            first,
            SettlePolicy::LatestIssued,
            Ok(TodayStats::default()),
        );
        assert!(!applied);
        assert_eq!(store.revision(), before);
        assert_eq!(*rx.borrow(), before);
    }

    #[test]
    fn state_serializes_camel_case() {
        let json = serde_json::to_value(AdminState::default()).unwrap();
        assert_eq!(json["vendorRatings"]["data"]["pageNumber"], 1);
        assert_eq!(json["todayStats"]["loading"], false);
        assert_eq!(json["orderDetails"]["data"], Value::Null);
        assert_eq!(json["users"]["status"], "idle");
    }
}
