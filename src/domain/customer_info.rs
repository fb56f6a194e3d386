use serde::{Deserialize, Serialize};

use super::{EmailAddress, PersonName, PhoneNumber, ValidationErrors};

const MIN_NAME_LEN: usize = 2;

/// Customer details as submitted by the information step, unvalidated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfoForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Validated customer details, required before the review step
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerInfo {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
}

impl TryFrom<CustomerInfoForm> for CustomerInfo {
    type Error = ValidationErrors;

    fn try_from(form: CustomerInfoForm) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let first_name = parse_name(&mut errors, "firstName", form.first_name.as_deref());
        let last_name = parse_name(&mut errors, "lastName", form.last_name.as_deref());
        let email = errors.require("email", form.email.as_deref());
        let phone = errors.require("phone", form.phone.as_deref());

        errors.finish(|| {
            Some(Self {
                first_name: first_name?,
                last_name: last_name?,
                email: email?,
                phone: phone?,
            })
        })
    }
}

impl From<&CustomerInfo> for CustomerInfoForm {
    fn from(info: &CustomerInfo) -> Self {
        Self {
            first_name: Some(info.first_name.to_string()),
            last_name: Some(info.last_name.to_string()),
            email: Some(info.email.to_string()),
            phone: Some(info.phone.to_string()),
        }
    }
}

fn parse_name(errors: &mut ValidationErrors, field: &str, value: Option<&str>) -> Option<PersonName> {
    match value {
        None => {
            errors.push(field, format!("{} is required", field));
            None
        }
        Some(value) => PersonName::parse_with_min(value, MIN_NAME_LEN)
            .map_err(|message| errors.push(field, message))
            .ok(),
    }
}
