use validator::validate_email;

#[derive(thiserror::Error, Debug)]
pub enum MailMessageError {
    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),
    #[error("Mail subject cannot be empty.")]
    EmptySubject,
    #[error("Mail body cannot be empty.")]
    EmptyBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MailAddress(String);

impl MailAddress {
    pub fn parse(s: String) -> Result<MailAddress, MailMessageError> {
        if validate_email(&s) {
            Ok(Self(s))
        } else {
            Err(MailMessageError::InvalidAddress(format!(
                "{} is not a valid email",
                s
            )))
        }
    }
}

impl AsRef<str> for MailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    subject: String,
    body: String,
}

impl MailMessage {
    pub fn new(subject: &str, body: &str) -> Result<MailMessage, MailMessageError> {
        if subject.trim().is_empty() {
            return Err(MailMessageError::EmptySubject);
        }
        if body.trim().is_empty() {
            return Err(MailMessageError::EmptyBody);
        }
        Ok(Self {
            subject: subject.to_string(),
            body: body.to_string(),
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}
