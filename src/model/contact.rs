use chrono::{DateTime, Utc};

use serde::{Deserialize, Serialize};

use crate::domain::{EmailAddress, MessageBody, PersonName, Subject};

/// Validated contact form submission
#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: PersonName,
    pub email: EmailAddress,
    pub subject: Subject,
    pub message: MessageBody,
}

/// Stored contact message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
