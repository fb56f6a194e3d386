use rust_decimal::Decimal;

use serde::{Deserialize, Serialize};

use crate::domain::CustomerInfoForm;

use super::{Order, OrderItem};

/// Checkout submission sent by the payment step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    /// One course id per unit purchased
    pub items: Vec<i32>,
    pub customer_info: CustomerInfoForm,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Response to a successful order submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub order_id: i32,
    pub order_number: String,
    /// Client secret of the gateway payment intent
    pub payment_client_handle: Option<String>,
}

/// An order with its lines and the gateway's view of the payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub payment_status: Option<String>,
}

/// Contact form, unvalidated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactReceipt {
    pub message: String,
    pub contact_id: i32,
}
