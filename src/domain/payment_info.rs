use regex::Regex;

use serde::{Deserialize, Serialize};

use super::ValidationErrors;

/// How the customer intends to pay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "creditCard" => Ok(Self::CreditCard),
            "paypal" => Ok(Self::Paypal),
            other => Err(format!("{} is not a supported payment method", other)),
        }
    }
}

/// Payment step form, unvalidated. Card fields only matter for card payments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    pub payment_method: Option<String>,
    pub card_number: Option<String>,
    pub expiry_date: Option<String>,
    pub cvv: Option<String>,
    pub name_on_card: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddress {
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub state: String,
    pub country: String,
}

/// Payment details safe to hold in client state.
///
/// The card number is reduced to a masked placeholder; expiry and CVV are never kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub payment_method: PaymentMethod,
    pub masked_card: Option<String>,
    pub name_on_card: Option<String>,
    pub billing_address: BillingAddress,
}

impl TryFrom<PaymentForm> for PaymentInfo {
    type Error = ValidationErrors;

    fn try_from(form: PaymentForm) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let payment_method: Option<PaymentMethod> =
            errors.require("paymentMethod", form.payment_method.as_deref());

        let (masked_card, name_on_card) = match payment_method {
            Some(PaymentMethod::CreditCard) => validate_card(&mut errors, &form),
            _ => (None, None),
        };

        let address = min_len(&mut errors, "address", form.address.as_deref(), 5);
        let city = min_len(&mut errors, "city", form.city.as_deref(), 2);
        let zip_code = min_len(&mut errors, "zipCode", form.zip_code.as_deref(), 4);
        let state = min_len(&mut errors, "state", form.state.as_deref(), 2);
        let country = min_len(&mut errors, "country", form.country.as_deref(), 2);

        errors.finish(|| {
            Some(Self {
                payment_method: payment_method?,
                masked_card,
                name_on_card,
                billing_address: BillingAddress {
                    address: address?,
                    city: city?,
                    zip_code: zip_code?,
                    state: state?,
                    country: country?,
                },
            })
        })
    }
}

/// Mask all but the last four digits of a card number
pub fn mask_card_number(digits: &str) -> String {
    let last_four: String = digits
        .chars()
        .skip(digits.chars().count().saturating_sub(4))
        .collect();
    format!("**** **** **** {}", last_four)
}

fn validate_card(errors: &mut ValidationErrors, form: &PaymentForm) -> (Option<String>, Option<String>) {
    lazy_static::lazy_static! {
        static ref EXPIRY_REGEX: Regex = Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$").unwrap();
    }

    let digits: Option<String> = match form.card_number.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push("cardNumber", "Credit card details are required");
            None
        }
        Some(number) => {
            let digits: String = number.chars().filter(|c| !matches!(c, ' ' | '-')).collect();
            if digits.len() < 13 || digits.len() > 19 || !digits.chars().all(|c| c.is_ascii_digit()) {
                errors.push("cardNumber", "Card number must be at least 13 digits");
                None
            } else {
                Some(digits)
            }
        }
    };

    match form.expiry_date.as_deref().map(str::trim) {
        Some(expiry) if EXPIRY_REGEX.is_match(expiry) => {}
        _ => errors.push("expiryDate", "Expiry date must be in MM/YY format"),
    }

    match form.cvv.as_deref().map(str::trim) {
        Some(cvv) if (3..=4).contains(&cvv.len()) && cvv.chars().all(|c| c.is_ascii_digit()) => {}
        _ => errors.push("cvv", "CVV must be at least 3 digits"),
    }

    let name_on_card = min_len(errors, "nameOnCard", form.name_on_card.as_deref(), 2);

    (digits.as_deref().map(mask_card_number), name_on_card)
}

fn min_len(errors: &mut ValidationErrors, field: &str, value: Option<&str>, min: usize) -> Option<String> {
    match value.map(str::trim) {
        Some(value) if value.chars().count() >= min => Some(value.to_string()),
        Some(_) => {
            errors.push(field, format!("{} must be at least {} characters", field, min));
            None
        }
        None => {
            errors.push(field, format!("{} is required", field));
            None
        }
    }
}
