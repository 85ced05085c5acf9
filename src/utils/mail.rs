use lettre::{
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
    transport::smtp::authentication::Credentials,
};

use crate::Error;
use crate::config::SmtpConfig;
use crate::models::{Listing, User};

#[derive(Clone, Debug)]
pub struct Mailer {
    pub from: String,
    pub to: String,
    pub mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl Mailer {
    pub fn new(smtp: &SmtpConfig) -> Result<Self, Error> {
        let creds = Credentials::new(smtp.username.clone(), smtp.password.clone());
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)?.credentials(creds);
        if let Some(port) = smtp.port {
            builder = builder.port(port);
        }
        Ok(Mailer {
            from: smtp.username.clone(),
            to: smtp.recipient.clone(),
            mailer: builder.build(),
        })
    }

    pub async fn send_email(&self, subject: &str, body: &str) -> Result<(), Error> {
        let email = lettre::Message::builder()
            .from(self.from.parse()?)
            .to(self.to.parse()?)
            .subject(subject)
            .body(body.to_string())?;

        self.mailer.send(email).await?;
        Ok(())
    }

    /// Best-effort alert for a new submission. Callers spawn this and never
    /// wait on it; a lost email must not fail the submission.
    pub async fn notify_submission(&self, listing: &Listing, submitter: &User) -> Result<(), Error> {
        let subject = format!("New server submission: {}", listing.name);
        let body = format!(
            "{} ({})\n\n{}\n\nSubmitted by user {}",
            listing.name, listing.url, listing.description, submitter.id
        );
        self.send_email(&subject, &body).await
    }
}
