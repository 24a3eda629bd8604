//! Seeded, deterministic data served by the mock admin API.

use serde::Serialize;

pub const BUSINESS_TYPES: [&str; 3] = ["Restaurant", "Cafe", "Grocery"];
const ORDER_STATUSES: [&str; 4] = ["Pending", "Paid", "Delivered", "Cancelled"];
const TRANSACTION_STATUSES: [&str; 3] = ["Completed", "Refunded", "Failed"];
const PAYMENT_METHODS: [&str; 2] = ["Cash", "Card"];

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub status: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: u32,
    pub name: String,
    pub business_type: String,
    pub rating: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: u32,
    pub vendor_id: u32,
    pub name: String,
    pub price: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: u32,
    pub vendor_id: u32,
    pub customer: String,
    pub business_type: String,
    pub status: String,
    pub total: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: u32,
    pub user_id: u32,
    pub order_id: u32,
    pub amount: f64,
    pub status: String,
    pub payment_method: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: u32,
    pub user_id: u32,
    pub vendor_id: u32,
    pub vendor_name: String,
    pub business_type: String,
    pub rating: f64,
    pub comment: String,
    pub status: String,
}

#[derive(Clone, Debug)]
pub struct Fixtures {
    pub users: Vec<User>,
    pub vendors: Vec<Vendor>,
    pub menu: Vec<MenuItem>,
    pub orders: Vec<Order>,
    pub transactions: Vec<Transaction>,
    pub reviews: Vec<Review>,
}

impl Fixtures {
    /// 23 users, vendors 40..=44, 30 orders and transactions, 9 reviews per
    /// vendor.
    pub fn seeded() -> Self {
        let users: Vec<User> = (1..=23)
            .map(|id| User {
                id,
                name: format!("user-{id}"),
                email: format!("user{id}@example.com"),
                status: if id % 3 == 0 { "Blocked" } else { "Active" }.to_string(),
            })
            .collect();

        let vendors: Vec<Vendor> = (40..=44)
            .map(|id| Vendor {
                id,
                name: format!("vendor-{id}"),
                business_type: BUSINESS_TYPES[id as usize % BUSINESS_TYPES.len()].to_string(),
                rating: 3.0 + f64::from(id % 5) * 0.5,
            })
            .collect();

        let menu = vendors
            .iter()
            .flat_map(|v| {
                (1..=3).map(move |n| MenuItem {
                    id: v.id * 100 + n,
                    vendor_id: v.id,
                    name: format!("dish-{n}"),
                    price: 5.0 * f64::from(n),
                })
            })
            .collect();

        let orders: Vec<Order> = (1..=30)
            .map(|id| {
                let vendor = &vendors[id as usize % vendors.len()];
                Order {
                    id,
                    vendor_id: vendor.id,
                    customer: users[id as usize % users.len()].name.clone(),
                    business_type: vendor.business_type.clone(),
                    status: ORDER_STATUSES[id as usize % ORDER_STATUSES.len()].to_string(),
                    total: 10.0 + f64::from(id),
                }
            })
            .collect();

        let transactions = orders
            .iter()
            .map(|order| Transaction {
                id: 1000 + order.id,
                user_id: 1 + order.id % 23,
                order_id: order.id,
                amount: order.total,
                status: TRANSACTION_STATUSES[order.id as usize % TRANSACTION_STATUSES.len()]
                    .to_string(),
                payment_method: PAYMENT_METHODS[order.id as usize % PAYMENT_METHODS.len()]
                    .to_string(),
            })
            .collect();

        let reviews = (1..=45u32)
            .map(|id| {
                let vendor = &vendors[id as usize % vendors.len()];
                Review {
                    id,
                    user_id: 1 + id % 23,
                    vendor_id: vendor.id,
                    vendor_name: vendor.name.clone(),
                    business_type: vendor.business_type.clone(),
                    rating: f64::from(1 + id % 5),
                    comment: format!("review {id}"),
                    status: if id % 4 == 0 { "Hidden" } else { "Visible" }.to_string(),
                }
            })
            .collect();

        Self {
            users,
            vendors,
            menu,
            orders,
            transactions,
            reviews,
        }
    }

    pub fn vendor(&self, id: u32) -> Option<&Vendor> {
        self.vendors.iter().find(|v| v.id == id)
    }

    pub fn order(&self, id: u32) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn revenue(&self) -> f64 {
        self.transactions
            .iter()
            .filter(|t| t.status == "Completed")
            .map(|t| t.amount)
            .sum()
    }
}
