use rust_decimal::Decimal;

use serde::{Deserialize, Serialize};

use crate::domain::round_currency;

/// Dashboard figures over every user and order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub user_count: i64,
    pub order_count: i64,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
}

impl Analytics {
    pub fn new(user_count: i64, order_count: i64, total_revenue: Decimal) -> Self {
        let average_order_value = if order_count > 0 {
            round_currency(total_revenue / Decimal::from(order_count))
        } else {
            Decimal::ZERO
        };

        Self {
            user_count,
            order_count,
            total_revenue,
            average_order_value,
        }
    }
}
