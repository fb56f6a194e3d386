use std::sync::Arc;

use actix_web::dev::HttpServiceFactory;
use actix_web::{post, web, HttpResponse, Responder};

use tracing::Instrument;

use crate::client::{Email, EmailClient};
use crate::domain::{EmailAddress, MessageBody, PersonName, Subject, ValidationErrors};
use crate::error::RestResult;
use crate::model::{Contact, ContactForm, ContactReceipt, NewContact};
use crate::store::Store;

/// Site owner's inbox that contact messages are relayed to
#[derive(Debug, Clone)]
pub struct ContactRecipient(pub EmailAddress);

impl TryFrom<ContactForm> for NewContact {
    type Error = ValidationErrors;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let name: Option<PersonName> = errors.require("name", form.name.as_deref());
        let email: Option<EmailAddress> = errors.require("email", form.email.as_deref());
        let subject: Option<Subject> = errors.require("subject", form.subject.as_deref());
        let message: Option<MessageBody> = errors.require("message", form.message.as_deref());

        errors.finish(|| {
            Some(Self {
                name: name?,
                email: email?,
                subject: subject?,
                message: message?,
            })
        })
    }
}

/// Build the email relaying a contact message to the site owner
fn build_contact_email(recipient: EmailAddress, contact: &Contact) -> RestResult<Email> {
    let reply_to: EmailAddress = contact
        .email
        .parse()
        .map_err(|e: String| anyhow::anyhow!("Stored contact email is invalid: {}", e))?;

    let subject = format!("Contact form: {}", contact.subject);
    let html_body = format!(
        "<h2>New contact form submission</h2><p><strong>From:</strong> {} ({})</p><p><strong>Subject:</strong> {}</p><p>{}</p>",
        contact.name, contact.email, contact.subject, contact.message
    );
    let text_body = format!(
        "New contact form submission\n\nFrom: {} ({})\nSubject: {}\n\n{}",
        contact.name, contact.email, contact.subject, contact.message
    );

    Ok(Email {
        recipient,
        subject,
        html_body,
        text_body,
        reply_to: Some(reply_to),
    })
}

/// Store a contact message and relay it to the site owner
#[tracing::instrument(name = "Submit a contact message", skip(form, store, email_client, recipient))]
#[post("")]
async fn submit(
    form: web::Json<ContactForm>,
    store: web::Data<dyn Store>,
    email_client: web::Data<EmailClient>,
    recipient: web::Data<ContactRecipient>,
) -> RestResult<impl Responder> {
    let new_contact: NewContact = form.into_inner().try_into()?;

    let contact = store.create_contact(new_contact).await?;
    let email = build_contact_email(recipient.0.clone(), &contact)?;

    // Relay is best effort, the message is already stored
    let email_client: Arc<EmailClient> = email_client.into_inner();
    tokio::spawn(
        async move {
            if let Err(error) = email_client.send(&email).await {
                tracing::error!(error.cause_chain = ?error, "Failed to relay contact message");
            }
        }
        .instrument(tracing::info_span!("Relay contact message", contact_id = contact.id)),
    );

    Ok(HttpResponse::Created().json(ContactReceipt {
        message: "Message received".into(),
        contact_id: contact.id,
    }))
}

/// Contact API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/contact").service(submit)
}
