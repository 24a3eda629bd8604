//! Descriptor table for every resource kind the dashboard reads.
//!
//! All fourteen request/response flows differ only in the data here: the
//! path, the `accept` header, how the query is serialized, and the fallback
//! error text. The builders and the synchronizer are generic over it.

use std::fmt;

/// How a resource's parameters reach the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStyle {
    /// No query string at all.
    None,
    /// Flat struct of scalars encoded by `serde_urlencoded`.
    Object,
    /// `QueryBuilder` with repeated keys for array values.
    Manual,
}

#[derive(Debug)]
pub struct Descriptor {
    pub name: &'static str,
    /// Path under the API root; `{id}` is replaced by the entity id.
    pub path: &'static str,
    pub accept: Option<&'static str>,
    pub style: QueryStyle,
    pub paginated: bool,
    pub fallback: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    TodayStats,
    TopVendors,
    ProjectSummary,
    Users,
    Transactions,
    Reviews,
    Orders,
    VendorDetails,
    VendorMenu,
    BusinessTypes,
    VendorRatings,
    UserTransactions,
    OrderDetails,
    TransactionStatus,
}

const ANY: Option<&str> = Some("*/*");
const TEXT: Option<&str> = Some("text/plain");

static TODAY_STATS: Descriptor = Descriptor {
    name: "today-stats",
    path: "/Admin/today-stats",
    accept: ANY,
    style: QueryStyle::None,
    paginated: false,
    fallback: "Failed to fetch today stats",
};

static TOP_VENDORS: Descriptor = Descriptor {
    name: "top-vendors",
    path: "/Admin/top-vendors",
    accept: ANY,
    style: QueryStyle::None,
    paginated: false,
    fallback: "Failed to fetch top vendors",
};

static PROJECT_SUMMARY: Descriptor = Descriptor {
    name: "project-summary",
    path: "/Admin/project-summary",
    accept: ANY,
    style: QueryStyle::None,
    paginated: false,
    fallback: "Failed to fetch project summary",
};

static USERS: Descriptor = Descriptor {
    name: "users",
    path: "/Admin/all-users",
    accept: TEXT,
    style: QueryStyle::Object,
    paginated: true,
    fallback: "Failed to fetch users",
};

static TRANSACTIONS: Descriptor = Descriptor {
    name: "transactions",
    path: "/Admin/all-transactions",
    accept: TEXT,
    style: QueryStyle::Manual,
    paginated: true,
    fallback: "Failed to fetch transactions",
};

static REVIEWS: Descriptor = Descriptor {
    name: "reviews",
    path: "/Reviews/user-vendor-reviews",
    accept: TEXT,
    style: QueryStyle::Manual,
    paginated: true,
    fallback: "Failed to fetch user-vendor reviews",
};

static ORDERS: Descriptor = Descriptor {
    name: "orders",
    path: "/Orders/all-orders",
    accept: TEXT,
    style: QueryStyle::Manual,
    paginated: true,
    fallback: "Failed to fetch orders",
};

static VENDOR_DETAILS: Descriptor = Descriptor {
    name: "vendor-by-id",
    path: "/Vendors/{id}",
    accept: TEXT,
    style: QueryStyle::None,
    paginated: false,
    fallback: "Failed to fetch vendor details",
};

static VENDOR_MENU: Descriptor = Descriptor {
    name: "vendor-menu",
    path: "/Vendors/{id}/menu",
    accept: TEXT,
    style: QueryStyle::None,
    paginated: false,
    fallback: "Failed to fetch vendor menu",
};

static BUSINESS_TYPES: Descriptor = Descriptor {
    name: "business-types",
    path: "/Vendors/BusinessTypes",
    accept: None,
    style: QueryStyle::None,
    paginated: false,
    fallback: "Failed to fetch BusinessTypes",
};

static VENDOR_RATINGS: Descriptor = Descriptor {
    name: "vendor-ratings",
    path: "/Vendors/vendors-rating",
    accept: TEXT,
    style: QueryStyle::Manual,
    paginated: true,
    fallback: "Failed to fetch vendor ratings",
};

static USER_TRANSACTIONS: Descriptor = Descriptor {
    name: "user-transactions",
    path: "/Admin/users/{id}/all-transactions",
    accept: TEXT,
    style: QueryStyle::Manual,
    paginated: true,
    fallback: "Failed to fetch user transactions",
};

static ORDER_DETAILS: Descriptor = Descriptor {
    name: "order-by-id",
    path: "/Orders/{id}",
    accept: TEXT,
    style: QueryStyle::None,
    paginated: false,
    fallback: "Failed to fetch order details",
};

static TRANSACTION_STATUS: Descriptor = Descriptor {
    name: "transaction-status",
    path: "/Admin/transaction-stats",
    accept: TEXT,
    style: QueryStyle::None,
    paginated: false,
    fallback: "Failed to fetch transaction status",
};

impl Resource {
    pub const ALL: [Resource; 14] = [
        Resource::TodayStats,
        Resource::TopVendors,
        Resource::ProjectSummary,
        Resource::Users,
        Resource::Transactions,
        Resource::Reviews,
        Resource::Orders,
        Resource::VendorDetails,
        Resource::VendorMenu,
        Resource::BusinessTypes,
        Resource::VendorRatings,
        Resource::UserTransactions,
        Resource::OrderDetails,
        Resource::TransactionStatus,
    ];

    pub fn descriptor(self) -> &'static Descriptor {
        match self {
            Resource::TodayStats => &TODAY_STATS,
            Resource::TopVendors => &TOP_VENDORS,
            Resource::ProjectSummary => &PROJECT_SUMMARY,
            Resource::Users => &USERS,
            Resource::Transactions => &TRANSACTIONS,
            Resource::Reviews => &REVIEWS,
            Resource::Orders => &ORDERS,
            Resource::VendorDetails => &VENDOR_DETAILS,
            Resource::VendorMenu => &VENDOR_MENU,
            Resource::BusinessTypes => &BUSINESS_TYPES,
            Resource::VendorRatings => &VENDOR_RATINGS,
            Resource::UserTransactions => &USER_TRANSACTIONS,
            Resource::OrderDetails => &ORDER_DETAILS,
            Resource::TransactionStatus => &TRANSACTION_STATUS,
        }
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn fallback(self) -> &'static str {
        self.descriptor().fallback
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_and_fallbacks_are_unique() {
        let names: HashSet<_> = Resource::ALL.iter().map(|r| r.name()).collect();
        let fallbacks: HashSet<_> = Resource::ALL.iter().map(|r| r.fallback()).collect();
        assert_eq!(names.len(), Resource::ALL.len());
        assert_eq!(fallbacks.len(), Resource::ALL.len());
    }

    #[test]
    fn from_name_inverts_name() {
        for resource in Resource::ALL {
            assert_eq!(Resource::from_name(resource.name()), Some(resource));
        }
        assert_eq!(Resource::from_name("nope"), None);
    }

    #[test]
    fn only_listings_are_paginated() {
        let paginated: Vec<_> = Resource::ALL
            .into_iter()
            .filter(|r| r.descriptor().paginated)
            .collect();
        assert_eq!(
            paginated,
            vec![
                Resource::Users,
                Resource::Transactions,
                Resource::Reviews,
                Resource::Orders,
                Resource::VendorRatings,
                Resource::UserTransactions,
            ]
        );
    }
}
