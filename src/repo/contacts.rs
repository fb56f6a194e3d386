use sqlx::PgExecutor;

use crate::model::{Contact, NewContact};

/// Repository for contact form messages
pub struct ContactsRepo;

impl ContactsRepo {
    #[tracing::instrument(name = "Insert contact message", skip(executor, new_contact))]
    pub async fn insert<'con>(
        executor: impl PgExecutor<'con>,
        new_contact: &NewContact,
    ) -> sqlx::Result<Contact> {
        sqlx::query_as::<_, Contact>(
            "insert into contacts(name, email, subject, message) values ($1, $2, $3, $4) returning *",
        )
        .bind(new_contact.name.as_ref())
        .bind(new_contact.email.as_ref())
        .bind(new_contact.subject.as_ref())
        .bind(new_contact.message.as_ref())
        .fetch_one(executor)
        .await
    }

    #[tracing::instrument(name = "Fetch all contact messages", skip(executor))]
    pub async fn fetch_all<'con>(executor: impl PgExecutor<'con>) -> sqlx::Result<Vec<Contact>> {
        sqlx::query_as::<_, Contact>("select * from contacts order by created_at desc, id desc")
            .fetch_all(executor)
            .await
    }
}
