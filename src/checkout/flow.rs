use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::cart::{CartStore, LocalStorage};
use crate::catalog::Catalog;
use crate::client::{ApiClientError, StorefrontClient};
use crate::domain::{
    CustomerInfo, CustomerInfoForm, PaymentForm, PaymentInfo, Totals, ValidationErrors,
};
use crate::model::{OrderSubmission, PlacedOrder};

use super::CheckoutStep;

/// How long the confirmation summary stays readable before the cart is cleared
pub const CONFIRMATION_CLEAR_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Invalid checkout details: {0}")]
    Validation(#[from] ValidationErrors),
    /// A step precondition failed; the flow now sits on the returned step
    #[error("Redirected to the {0} step")]
    Redirected(CheckoutStep),
    #[error("Failed to submit order")]
    Submission(#[from] ApiClientError),
    #[error("Checkout is on the {0} step, not confirmation")]
    NotConfirmed(CheckoutStep),
}

/// Snapshot shown on the confirmation step
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationSummary {
    pub order_number: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub item_count: u32,
    pub totals: Totals,
    pub order_date: DateTime<Utc>,
}

/// Sequences the checkout routes over a cart.
///
/// Each step is guarded on entry; a failing guard redirects backward until a step accepts.
#[derive(Debug)]
pub struct CheckoutFlow {
    current: CheckoutStep,
    placed_order: Option<PlacedOrder>,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self {
            current: CheckoutStep::Cart,
            placed_order: None,
        }
    }

    pub fn current(&self) -> CheckoutStep {
        self.current
    }

    pub fn placed_order(&self) -> Option<&PlacedOrder> {
        self.placed_order.as_ref()
    }

    /// Where entering `step` redirects to, if its precondition fails
    pub fn guard<S: LocalStorage>(step: CheckoutStep, cart: &CartStore<S>) -> Option<CheckoutStep> {
        let has_customer = cart.customer_info().is_some();
        match step {
            CheckoutStep::Cart => None,
            CheckoutStep::Information if cart.is_empty() => Some(CheckoutStep::Cart),
            CheckoutStep::Information => None,
            CheckoutStep::Review | CheckoutStep::Payment if cart.is_empty() => {
                Some(CheckoutStep::Cart)
            }
            CheckoutStep::Review | CheckoutStep::Payment if !has_customer => {
                Some(CheckoutStep::Information)
            }
            CheckoutStep::Review | CheckoutStep::Payment => None,
            CheckoutStep::Confirmation if !has_customer => Some(CheckoutStep::Cart),
            CheckoutStep::Confirmation => None,
        }
    }

    /// Enter `step`, following redirects until a step accepts. Returns the landing step.
    pub fn navigate<S: LocalStorage>(&mut self, step: CheckoutStep, cart: &CartStore<S>) -> CheckoutStep {
        let mut step = step;
        while let Some(redirect) = Self::guard(step, cart) {
            tracing::debug!(from = %step, to = %redirect, "Checkout step redirected");
            step = redirect;
        }
        self.current = step;
        step
    }

    /// Enter `step`, failing if any guard redirected
    fn enter<S: LocalStorage>(&mut self, step: CheckoutStep, cart: &CartStore<S>) -> Result<(), CheckoutError> {
        match self.navigate(step, cart) {
            landed if landed == step => Ok(()),
            landed => Err(CheckoutError::Redirected(landed)),
        }
    }

    /// Leave the cart for the information step
    pub fn begin<S: LocalStorage>(&mut self, cart: &CartStore<S>) -> CheckoutStep {
        self.navigate(CheckoutStep::Information, cart)
    }

    /// Validate and hold customer details, then move to review
    pub fn submit_information<S: LocalStorage>(
        &mut self,
        cart: &mut CartStore<S>,
        form: CustomerInfoForm,
    ) -> Result<CheckoutStep, CheckoutError> {
        self.enter(CheckoutStep::Information, cart)?;

        let info = CustomerInfo::try_from(form)?;
        cart.set_customer_info(info);

        Ok(self.navigate(CheckoutStep::Review, cart))
    }

    pub fn continue_to_payment<S: LocalStorage>(
        &mut self,
        cart: &CartStore<S>,
    ) -> Result<CheckoutStep, CheckoutError> {
        self.enter(CheckoutStep::Review, cart)?;

        Ok(self.navigate(CheckoutStep::Payment, cart))
    }

    /// Validate payment details and submit the order, landing on confirmation.
    ///
    /// Card details never leave the client; only the masked payment info is kept.
    #[tracing::instrument(name = "Submit checkout payment", skip_all)]
    pub async fn submit_payment<S: LocalStorage>(
        &mut self,
        cart: &mut CartStore<S>,
        catalog: &Catalog,
        client: &StorefrontClient,
        form: PaymentForm,
    ) -> Result<PlacedOrder, CheckoutError> {
        self.enter(CheckoutStep::Payment, cart)?;

        let payment = PaymentInfo::try_from(form)?;
        let customer = cart
            .customer_info()
            .map(CustomerInfoForm::from)
            .ok_or(CheckoutError::Redirected(CheckoutStep::Information))?;
        let totals = cart.cart_total(catalog).rounded();

        let submission = OrderSubmission {
            items: cart.order_items(catalog),
            customer_info: customer,
            subtotal: totals.subtotal,
            tax: totals.tax,
            total: totals.total,
        };
        let placed = client.submit_order(&submission).await?;
        tracing::info!(order_number = %placed.order_number, "Order placed");

        cart.set_payment_info(payment);
        self.placed_order = Some(placed.clone());
        self.navigate(CheckoutStep::Confirmation, cart);

        Ok(placed)
    }

    /// Re-enter the step before the current one
    pub fn back<S: LocalStorage>(&mut self, cart: &CartStore<S>) -> CheckoutStep {
        match self.current.previous() {
            Some(step) => self.navigate(step, cart),
            None => self.current,
        }
    }

    /// Summary for the confirmation step, read before the cart is cleared
    pub fn confirmation<S: LocalStorage>(
        &self,
        cart: &CartStore<S>,
        catalog: &Catalog,
    ) -> Option<ConfirmationSummary> {
        if self.current != CheckoutStep::Confirmation {
            return None;
        }
        let customer = cart.customer_info()?;

        Some(ConfirmationSummary {
            order_number: self
                .placed_order
                .as_ref()
                .map(|order| order.order_number.clone()),
            customer_name: format!("{} {}", customer.first_name, customer.last_name),
            customer_email: customer.email.to_string(),
            item_count: cart.cart_item_count(),
            totals: cart.cart_total(catalog).rounded(),
            order_date: Utc::now(),
        })
    }

    /// Clear the cart once the confirmation has been shown for `delay`, then start over
    pub async fn finish<S: LocalStorage>(
        &mut self,
        cart: &mut CartStore<S>,
        delay: Duration,
    ) -> Result<(), CheckoutError> {
        if self.current != CheckoutStep::Confirmation {
            return Err(CheckoutError::NotConfirmed(self.current));
        }

        tokio::time::sleep(delay).await;
        cart.clear_cart();
        self.current = CheckoutStep::Cart;
        self.placed_order = None;
        tracing::info!("Checkout complete, cart cleared");

        Ok(())
    }
}
