use std::fmt;
use std::str::FromStr;

use unicode_segmentation::UnicodeSegmentation;

const SUBJECT_MAX_LEN: usize = 256;
const MESSAGE_MAX_LEN: usize = 5000;

fn bounded(value: &str, max_len: usize, what: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("{} cannot be empty", what));
    }
    if value.graphemes(true).count() > max_len {
        return Err(format!("{} too long", what));
    }
    Ok(value.to_string())
}

/// Subject line of a contact message
#[derive(Debug, Clone, PartialEq)]
pub struct Subject(String);

impl FromStr for Subject {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        bounded(value, SUBJECT_MAX_LEN, "Subject").map(Self)
    }
}

impl AsRef<str> for Subject {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Free-text body of a contact message
#[derive(Debug, Clone, PartialEq)]
pub struct MessageBody(String);

impl FromStr for MessageBody {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        bounded(value, MESSAGE_MAX_LEN, "Message").map(Self)
    }
}

impl AsRef<str> for MessageBody {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
