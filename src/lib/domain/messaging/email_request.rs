//! Outbound email requests

/// A single outbound message addressed to one recipient.
///
/// A fresh request is built for every recipient and is not modified after it
/// has been handed to a [`DeliveryClient`](super::DeliveryClient).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailRequest {
    /// The recipient
    pub to: String,

    /// The sender
    pub from: String,

    /// The subject line
    pub subject: String,

    /// The plain text body
    pub text_body: String,

    /// The HTML body
    pub html_body: String,

    /// Optional reply-to address
    pub reply_to: Option<String>,

    /// Optional campaign identifier
    pub campaign_id: Option<String>,

    /// Whether the API should accept the message without delivering it
    pub test_mode: bool,
}

/// Parses the textual test mode flag.
///
/// Only `"true"`, in any case, turns test mode on.
pub fn parse_test_mode(value: Option<&str>) -> bool {
    value.is_some_and(|flag| flag.eq_ignore_ascii_case("true"))
}

/// The parts of a message shared by every recipient of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageTemplate {
    from: String,
    subject: String,
    text_body: String,
    html_body: String,
    reply_to: Option<String>,
    campaign_id: Option<String>,
    test_mode: bool,
}

impl MessageTemplate {
    /// Creates a template with the required fields.
    ///
    /// # Arguments
    /// * `from` - The sender, either the `-f` override or the configured default.
    /// * `subject` - The subject line.
    /// * `text_body` - The plain text body.
    /// * `html_body` - The HTML body.
    pub fn new(
        from: impl Into<String>,
        subject: impl Into<String>,
        text_body: impl Into<String>,
        html_body: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            subject: subject.into(),
            text_body: text_body.into(),
            html_body: html_body.into(),
            ..Default::default()
        }
    }

    /// Sets the reply-to address
    pub fn reply_to(mut self, reply_to: Option<String>) -> Self {
        self.reply_to = reply_to;
        self
    }

    /// Sets the campaign identifier
    pub fn campaign_id(mut self, campaign_id: Option<String>) -> Self {
        self.campaign_id = campaign_id;
        self
    }

    /// Sets test mode from its textual flag, see [`parse_test_mode`]
    pub fn test_mode(mut self, flag: Option<&str>) -> Self {
        self.test_mode = parse_test_mode(flag);
        self
    }

    /// The sender every request will carry
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Builds the request for one recipient.
    pub fn build(&self, to: &str) -> EmailRequest {
        EmailRequest {
            to: to.to_string(),
            from: self.from.clone(),
            subject: self.subject.clone(),
            text_body: self.text_body.clone(),
            html_body: self.html_body.clone(),
            reply_to: self.reply_to.clone(),
            campaign_id: self.campaign_id.clone(),
            test_mode: self.test_mode,
        }
    }
}
