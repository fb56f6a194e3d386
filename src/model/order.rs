use chrono::{DateTime, Utc};

use rust_decimal::Decimal;

use serde::{Deserialize, Serialize};

use crate::domain::{CustomerInfo, Totals};

/// Stored order record.
///
/// Customer fields and totals are snapshots taken at submission and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i32,
    /// Human readable, unique order number
    pub order_number: String,
    /// Local user that placed the order, if they were signed in
    pub user_id: Option<i32>,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub payment_intent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Stored order line, priced at the time of purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub course_id: i32,
    pub price: Decimal,
}

/// New order request, written together with its items
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub user_id: Option<i32>,
    pub customer: CustomerInfo,
    pub totals: Totals,
    pub payment_intent_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub course_id: i32,
    pub price: Decimal,
}
