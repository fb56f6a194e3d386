mod flow;
mod step;

pub use flow::{CheckoutError, CheckoutFlow, ConfirmationSummary, CONFIRMATION_CLEAR_DELAY};
pub use step::CheckoutStep;
