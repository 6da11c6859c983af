//! Mailgun HTTP API client

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, error};

use crate::{
    domain::messaging::{
        errors::{DeliveryError, MailingListError},
        DeliveryClient, EmailRequest, ListInfo, MailingListDirectory,
    },
    infrastructure::config::MailgunAccount,
};

const API_USER: &str = "api";
const LIST_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Default, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    id: Option<String>,

    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListPage {
    #[serde(default)]
    items: Vec<ListInfo>,

    #[serde(default)]
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    #[serde(default)]
    next: Option<String>,
}

/// Mailgun API client
#[derive(Debug)]
pub struct MailgunClient {
    http: Client,
    account: MailgunAccount,
}

impl MailgunClient {
    /// Creates a client for `account`
    pub fn new(account: MailgunAccount) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(account.timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { http, account })
    }

    fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.account.api_root(), self.account.domain)
    }

    fn lists_url(&self) -> String {
        format!(
            "{}/lists/pages?limit={LIST_PAGE_LIMIT}",
            self.account.api_root()
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(API_USER, Some(self.account.private_api_key.expose_secret()))
    }
}

/// The form fields Mailgun expects for a message
fn message_form(request: &EmailRequest) -> Vec<(&'static str, &str)> {
    let mut form = vec![
        ("from", request.from.as_str()),
        ("to", request.to.as_str()),
        ("subject", request.subject.as_str()),
        ("text", request.text_body.as_str()),
        ("html", request.html_body.as_str()),
    ];

    if let Some(reply_to) = &request.reply_to {
        form.push(("h:Reply-To", reply_to.as_str()));
    }

    if let Some(campaign_id) = &request.campaign_id {
        form.push(("o:campaign", campaign_id.as_str()));
    }

    if request.test_mode {
        form.push(("o:testmode", "yes"));
    }

    form
}

async fn api_message(response: Response) -> String {
    let status = response.status();

    match response.text().await {
        Ok(body) => serde_json::from_str::<ApiResponse>(&body)
            .ok()
            .and_then(|parsed| parsed.message)
            .unwrap_or(body),
        Err(_) => status.to_string(),
    }
}

#[async_trait]
impl DeliveryClient for MailgunClient {
    async fn send_message(&self, request: &EmailRequest) -> Result<bool, DeliveryError> {
        let response = self
            .authorized(self.http.post(self.messages_url()))
            .form(&message_form(request))
            .send()
            .await
            .map_err(|err| DeliveryError::SendFailed(err.into()))?;

        let status = response.status();

        if status.is_success() {
            let body = match response.json::<ApiResponse>().await {
                Ok(body) => body,
                Err(err) => {
                    debug!("Could not decode Mailgun response: {err}");
                    ApiResponse::default()
                }
            };
            debug!(
                id = body.id.as_deref().unwrap_or_default(),
                "{}",
                body.message.as_deref().unwrap_or("Queued")
            );

            Ok(true)
        } else {
            let message = api_message(response).await;
            error!(status = status.as_u16(), "Mailgun rejected the message: {message}");

            Ok(false)
        }
    }
}

#[async_trait]
impl MailingListDirectory for MailgunClient {
    async fn mailing_lists(&self) -> Result<Vec<ListInfo>, MailingListError> {
        let mut lists = Vec::new();
        let mut url = self.lists_url();

        loop {
            debug!("GET {url}");

            let response = self
                .authorized(self.http.get(&url))
                .send()
                .await
                .context("failed to fetch mailing lists")?;

            let status = response.status();
            if !status.is_success() {
                return Err(MailingListError::Rejected {
                    status: status.as_u16(),
                    message: api_message(response).await,
                });
            }

            let page: ListPage = response
                .json()
                .await
                .context("failed to decode mailing lists")?;

            if page.items.is_empty() {
                break;
            }

            lists.extend(page.items);

            match page.paging.and_then(|paging| paging.next) {
                Some(next) if next != url => url = next,
                _ => break,
            }
        }

        Ok(lists)
    }
}
