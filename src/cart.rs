use rust_decimal::Decimal;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::domain::{CustomerInfo, PaymentInfo, Totals};
use crate::model::Course;

mod storage;

pub use storage::{FileStorage, LocalStorage, MemoryStorage};

/// Storage key holding the persisted cart lines
pub const CART_STORAGE_KEY: &str = "cart";

/// Largest quantity a single cart line may hold
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Cart totals, unrounded until `rounded()` is called for display
pub type CartTotal = Totals;

/// One persisted cart line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub course_id: i32,
    pub quantity: u32,
}

/// A cart line joined with its catalog course
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    pub course: &'a Course,
    pub quantity: u32,
}

impl CartLine<'_> {
    pub fn line_total(&self) -> Decimal {
        self.course.price * Decimal::from(self.quantity)
    }
}

/// Cart state: course lines plus the customer and payment details collected during checkout.
///
/// Every change to the lines is written through to `storage`; storage failures are
/// logged and never surface to the caller.
#[derive(Debug)]
pub struct CartStore<S: LocalStorage> {
    storage: S,
    tax_rate: Decimal,
    items: Vec<CartItem>,
    customer_info: Option<CustomerInfo>,
    payment_info: Option<PaymentInfo>,
}

impl<S: LocalStorage> CartStore<S> {
    /// Restore the cart held in `storage`, starting empty if it can't be read
    pub fn load(storage: S, tax_rate: Decimal) -> Self {
        let items = match storage.get_item(CART_STORAGE_KEY) {
            Ok(Some(value)) => match serde_json::from_str::<Vec<CartItem>>(&value) {
                Ok(items) => normalize(items),
                Err(error) => {
                    tracing::error!(error.cause_chain = ?error, "Failed to parse stored cart, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                tracing::error!(error.cause_chain = ?error, "Failed to read stored cart, starting empty");
                Vec::new()
            }
        };

        Self {
            storage,
            tax_rate,
            items,
            customer_info: None,
            payment_info: None,
        }
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.items)
            .map_err(anyhow::Error::from)
            .and_then(|value| self.storage.set_item(CART_STORAGE_KEY, &value));

        if let Err(error) = result {
            tracing::error!(error.cause_chain = ?error, "Failed to persist cart");
        }
    }

    /// Add one unit of a course, creating the line if needed
    pub fn add_to_cart(&mut self, course_id: i32) {
        match self.items.iter_mut().find(|item| item.course_id == course_id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1).min(MAX_LINE_QUANTITY),
            None => self.items.push(CartItem {
                course_id,
                quantity: 1,
            }),
        }
        self.persist();
    }

    /// Drop the whole line for a course
    pub fn remove_from_cart(&mut self, course_id: i32) {
        let before = self.items.len();
        self.items.retain(|item| item.course_id != course_id);
        if self.items.len() != before {
            self.persist();
        }
    }

    /// Empty the cart together with any held customer and payment details
    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.customer_info = None;
        self.payment_info = None;
        self.persist();
    }

    pub fn cart_item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity))
    }

    /// Unrounded totals; lines with no catalog course count as zero
    pub fn cart_total(&self, catalog: &Catalog) -> CartTotal {
        let lines = self.items.iter().map(|item| {
            let price = catalog.price(item.course_id).unwrap_or(Decimal::ZERO);
            (item.quantity, price)
        });
        Totals::from_lines(lines, self.tax_rate)
    }

    pub fn is_item_in_cart(&self, course_id: i32) -> bool {
        self.items.iter().any(|item| item.course_id == course_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Lines whose course exists in the catalog
    pub fn lines<'a>(&self, catalog: &'a Catalog) -> Vec<CartLine<'a>> {
        self.items
            .iter()
            .filter_map(|item| {
                catalog.course(item.course_id).map(|course| CartLine {
                    course,
                    quantity: item.quantity,
                })
            })
            .collect()
    }

    /// Course ids to submit, one per unit purchased
    pub fn order_items(&self, catalog: &Catalog) -> Vec<i32> {
        self.lines(catalog)
            .iter()
            .flat_map(|line| std::iter::repeat(line.course.id).take(line.quantity as usize))
            .collect()
    }

    pub fn customer_info(&self) -> Option<&CustomerInfo> {
        self.customer_info.as_ref()
    }

    pub fn set_customer_info(&mut self, info: CustomerInfo) {
        self.customer_info = Some(info);
    }

    pub fn payment_info(&self) -> Option<&PaymentInfo> {
        self.payment_info.as_ref()
    }

    pub fn set_payment_info(&mut self, info: PaymentInfo) {
        self.payment_info = Some(info);
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

/// Drop empty or oversized lines and merge duplicate course ids, keeping first-seen order
fn normalize(items: Vec<CartItem>) -> Vec<CartItem> {
    let mut normalized: Vec<CartItem> = Vec::with_capacity(items.len());
    for item in items.into_iter().filter(|item| item.quantity >= 1) {
        if item.quantity > MAX_LINE_QUANTITY {
            tracing::warn!(
                course_id = item.course_id,
                quantity = item.quantity,
                "Skipping stored cart line with an oversized quantity"
            );
            continue;
        }
        match normalized.iter_mut().find(|line| line.course_id == item.course_id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(item.quantity).min(MAX_LINE_QUANTITY)
            }
            None => normalized.push(item),
        }
    }
    normalized
}
