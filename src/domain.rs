mod customer_info;
mod email_address;
mod message;
mod payment_info;
mod person_name;
mod phone_number;
mod totals;
mod validation;

pub use customer_info::{CustomerInfo, CustomerInfoForm};
pub use email_address::EmailAddress;
pub use message::{MessageBody, Subject};
pub use payment_info::{mask_card_number, BillingAddress, PaymentForm, PaymentInfo, PaymentMethod};
pub use person_name::PersonName;
pub use phone_number::PhoneNumber;
pub use totals::{round_currency, to_minor_units, Totals, CURRENCY_DP};
pub use validation::{FieldError, ValidationErrors};
