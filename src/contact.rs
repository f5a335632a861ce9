//! Contact form submission. The form service owns delivery; we send once and
//! report the outcome.

use std::time::Duration;

use serde::Serialize;

use crate::error::ContactError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), ContactError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(ContactError::MissingField(field));
            }
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((user, domain)) if !user.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(ContactError::InvalidEmail(email.to_string())),
        }
    }
}

pub struct ContactClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl ContactClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ContactError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// POSTs the form as JSON. No retries.
    pub fn submit(&self, form: &ContactForm) -> Result<(), ContactError> {
        form.validate()?;
        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(form)
            .send()?;
        let status = response.status();
        if status.is_success() {
            log::info!("contact form accepted ({status})");
            Ok(())
        } else {
            log::warn!("contact form rejected ({status})");
            Err(ContactError::Rejected(status))
        }
    }
}
