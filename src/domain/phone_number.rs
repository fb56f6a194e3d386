use std::fmt;
use std::str::FromStr;

const MIN_DIGITS: usize = 7;
const MAX_LEN: usize = 32;

/// A customer contact phone number, kept as entered
#[derive(Debug, Clone, PartialEq)]
pub struct PhoneNumber(String);

impl FromStr for PhoneNumber {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        if value.is_empty() {
            return Err("Phone number cannot be empty".into());
        }
        if value.chars().count() > MAX_LEN {
            return Err("Phone number too long".into());
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'))
        {
            return Err("Phone number contains invalid characters".into());
        }
        if value.chars().filter(char::is_ascii_digit).count() < MIN_DIGITS {
            return Err("Please enter a valid phone number".into());
        }

        Ok(Self(value.to_string()))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
